//! Tests against a live PostgreSQL server.
//!
//! They share one database, so every test is `#[serial]`.

mod common;

use assert_matches::assert_matches;
use evenue_common::{AttendeeStatus, Error};
use evenue_db::queries::showcase::{self, QueryResult, ShowcaseQuery};
use evenue_db::queries::{activity, attendance, maintenance, parties, users, venues};
use evenue_db::schema::{missing_objects, structure_database, TABLES};
use evenue_db::seed::{seed_database, CELEBRITY_PARTY, RAVE};
use serial_test::serial;

#[test]
#[serial]
fn structure_creates_every_object() {
    let Some(mut conn) = common::empty_database() else {
        return;
    };

    assert!(missing_objects(&mut *conn).unwrap().is_empty());
    let tables = maintenance::list_tables(&mut *conn).unwrap();
    for table in TABLES {
        assert!(tables.iter().any(|t| t == table), "missing {}", table);
    }
}

#[test]
#[serial]
fn structure_is_repeatable_and_drops_rows() {
    let Some((mut conn, _, _)) = common::seeded_database() else {
        return;
    };

    structure_database(&mut *conn).unwrap();
    assert_eq!(users::count_users(&mut *conn).unwrap(), 0);
    assert!(missing_objects(&mut *conn).unwrap().is_empty());
}

#[test]
#[serial]
fn seed_writes_expected_rows() {
    let Some((mut conn, _, summary)) = common::seeded_database() else {
        return;
    };

    assert_eq!(summary.users, 16);
    assert_eq!(summary.logins, 16);
    assert_eq!(summary.user_reports, 4);
    assert_eq!(summary.parties, 2);
    assert_eq!(summary.favourites, 12);
    assert_eq!(summary.schedules, 2);
    assert_eq!(summary.venues, 2);
    assert_eq!(summary.attendees, 9);
    assert_eq!(summary.party_reports, 5);
    assert_eq!(summary.activity_rows, 16);

    let counts: std::collections::HashMap<String, i64> =
        maintenance::row_counts(&mut *conn).unwrap().into_iter().collect();
    assert_eq!(counts["user_info"], 16);
    assert_eq!(counts["party_attendees"], 9);
    assert_eq!(counts["zip_code"], 2);
    assert_eq!(counts["party_reports"], 5);
}

#[test]
#[serial]
fn seeding_twice_fails_and_leaves_first_load() {
    let Some((mut conn, plan, _)) = common::seeded_database() else {
        return;
    };

    let err = seed_database(&mut *conn, &plan).unwrap_err();
    assert_matches!(err, Error::Constraint { .. });
    assert_eq!(users::count_users(&mut *conn).unwrap(), 16);
}

#[test]
#[serial]
fn passwords_are_hashed_and_verified() {
    let Some((mut conn, _, _)) = common::seeded_database() else {
        return;
    };

    assert!(users::verify_password(&mut *conn, "adele@gmail.com", "RollingInTheDeep").unwrap());
    assert!(!users::verify_password(&mut *conn, "adele@gmail.com", "rollinginthedeep").unwrap());
    assert!(!users::verify_password(&mut *conn, "nobody@gmail.com", "RollingInTheDeep").unwrap());

    let stored: String = conn
        .query_one(
            "SELECT password FROM user_login WHERE email = 'adele@gmail.com'",
            &[],
        )
        .unwrap()
        .get(0);
    assert_ne!(stored, "RollingInTheDeep");
    assert!(stored.starts_with("$2"));
}

#[test]
#[serial]
fn truncate_empties_all_tables() {
    let Some((mut conn, _, _)) = common::seeded_database() else {
        return;
    };

    let truncated = maintenance::truncate_tables(&mut *conn).unwrap();
    assert_eq!(truncated.len(), TABLES.len());
    for (table, count) in maintenance::row_counts(&mut *conn).unwrap() {
        assert_eq!(count, 0, "{} not empty", table);
    }
}

#[test]
#[serial]
fn venue_round_trips() {
    let Some((mut conn, _, _)) = common::seeded_database() else {
        return;
    };

    let rave = parties::require_party_by_title(&mut *conn, RAVE).unwrap();
    let venue = venues::venue_of(&mut *conn, rave.party_id).unwrap().unwrap();
    assert_eq!(venue.zip_code, "40489");
    assert_eq!(venue.city, "Düsseldorf");
    assert_eq!(venue.country.as_str(), "DE");
    assert!((venue.longitude - 6.840363).abs() < 1e-9);
    assert!((venue.latitude - 51.232688).abs() < 1e-9);
}

#[test]
#[serial]
fn activity_lists_hosted_and_going_parties() {
    let Some((mut conn, _, _)) = common::seeded_database() else {
        return;
    };

    let rave = parties::require_party_by_title(&mut *conn, RAVE).unwrap();
    let celebrity = parties::require_party_by_title(&mut *conn, CELEBRITY_PARTY).unwrap();

    let gaga = activity::activity_of(&mut *conn, "lady.gaga@gmail.com").unwrap().unwrap();
    assert_eq!(gaga.parties_hosted, vec![rave.party_id]);
    assert!(gaga.parties_attended.is_empty());

    let mut dwayne = activity::activity_of(&mut *conn, "dwayne.johnson@gmail.com")
        .unwrap()
        .unwrap();
    dwayne.parties_attended.sort();
    let mut expected = vec![rave.party_id, celebrity.party_id];
    expected.sort();
    assert_eq!(dwayne.parties_attended, expected);

    let tom = activity::activity_of(&mut *conn, "tom.hanks@gmail.com").unwrap().unwrap();
    assert!(tom.parties_attended.is_empty());
}

#[test]
#[serial]
fn unknown_attendee_is_a_constraint_error() {
    let Some((mut conn, _, _)) = common::seeded_database() else {
        return;
    };

    let rave = parties::require_party_by_title(&mut *conn, RAVE).unwrap();
    let err = attendance::add_attendee(
        &mut *conn,
        rave.party_id,
        "nobody@gmail.com",
        AttendeeStatus::Attending,
    )
    .unwrap_err();
    assert!(err.is_rejection());
    assert_matches!(err, Error::Constraint { .. });
}

#[test]
#[serial]
fn schema_rejects_underage_users() {
    let Some(mut conn) = common::empty_database() else {
        return;
    };

    let err = conn
        .execute(
            "INSERT INTO user_info (email, first_name, last_name, age, country)
             VALUES ('kid@gmail.com', 'Kid', 'Kid', 17, 'DE')",
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.code(),
        Some(&postgres::error::SqlState::CHECK_VIOLATION)
    );
}

#[test]
#[serial]
fn missing_party_title_is_not_found() {
    let Some(mut conn) = common::empty_database() else {
        return;
    };

    assert_matches!(
        parties::require_party_by_title(&mut *conn, "No Such Party"),
        Err(Error::NotFound(_))
    );
}

#[test]
#[serial]
fn favourites_and_reports_are_counted() {
    let Some((mut conn, _, _)) = common::seeded_database() else {
        return;
    };

    let counts = parties::favourite_counts(&mut *conn).unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0].title, RAVE);
    assert_eq!(counts[0].favourites, 8);
    assert_eq!(counts[1].favourites, 4);

    assert_eq!(
        evenue_db::queries::reports::reports_against_user(&mut *conn, "kim.kardashian@gmail.com")
            .unwrap(),
        2
    );

    let rave = parties::require_party_by_title(&mut *conn, RAVE).unwrap();
    let going: Vec<_> = attendance::attendees_of(&mut *conn, rave.party_id)
        .unwrap()
        .into_iter()
        .filter(|a| a.status.is_going())
        .map(|a| a.attendee_email)
        .collect();
    assert_eq!(
        going,
        vec![
            "dwayne.johnson@gmail.com",
            "ed.sheeran@gmail.com",
            "justin.bieber@gmail.com"
        ]
    );
    assert_eq!(parties::schedules_of(&mut *conn, rave.party_id).unwrap().len(), 1);
}

#[test]
#[serial]
fn showcase_queries_match_sample() {
    let Some((mut conn, plan, _)) = common::seeded_database() else {
        return;
    };

    let outcomes = showcase::run_all(&mut *conn, &plan.showcase_params());
    assert_eq!(outcomes.len(), 10);
    for outcome in &outcomes {
        assert!(outcome.result.is_ok(), "query {} failed: {:?}", outcome.number, outcome.result);
    }
    let result = |n: usize| outcomes[n - 1].result.as_ref().unwrap();

    assert_matches!(result(1), QueryResult::Count(2));

    assert_matches!(result(2), QueryResult::Users(hosts) => {
        let emails: Vec<_> = hosts.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, ["kim.kardashian@gmail.com", "lady.gaga@gmail.com"]);
    });

    let rave = parties::require_party_by_title(&mut *conn, RAVE).unwrap();
    assert_matches!(result(3), QueryResult::Schedules(schedules) => {
        assert_eq!(schedules.len(), 1);
        let schedule = &schedules[0];
        assert_eq!(schedule.party_id, rave.party_id);
        assert_eq!(schedule.start_date, plan.anchor);
        assert_eq!(schedule.start_time.to_string(), "20:00:00+02:00");
        assert_eq!(schedule.end_time.to_string(), "06:00:00+02:00");
    });

    assert_matches!(result(4), QueryResult::Average(Some(avg)) => {
        assert_eq!(avg.to_string(), "43.8750000000000000");
    });

    assert_matches!(result(5), QueryResult::Countries(countries) => {
        let codes: Vec<_> = countries.iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, ["CA", "GB", "US"]);
    });

    assert_matches!(result(6), QueryResult::PartyAttendances(rows) => {
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].party.title, CELEBRITY_PARTY);
        assert_eq!(rows[1].party.title, RAVE);
        assert!(rows.iter().all(|r| r.attendance.attendee_email == "dwayne.johnson@gmail.com"));
    });

    assert_matches!(result(7), QueryResult::Guests(guests) => {
        let last_names: Vec<_> = guests.iter().map(|p| p.last_name.as_str()).collect();
        assert_eq!(last_names, ["Adkins", "Bieber", "Hanks", "Johnson", "Jolie", "Sheeran"]);
    });

    assert_matches!(result(8), QueryResult::Headcounts(counts) => {
        let counts: Vec<_> = counts.iter().map(|c| (c.title.as_str(), c.attendees)).collect();
        assert_eq!(counts, [(RAVE, 6), (CELEBRITY_PARTY, 3)]);
    });

    assert_matches!(result(9), QueryResult::People(people) => {
        let emails: Vec<_> = people.iter().map(|p| p.email.as_str()).collect();
        assert_eq!(
            emails,
            [
                "adele@gmail.com",
                "angelina.jolie@gmail.com",
                "dwayne.johnson@gmail.com",
                "ed.sheeran@gmail.com",
                "justin.bieber@gmail.com",
                "tom.hanks@gmail.com",
            ]
        );
    });

    assert_matches!(result(10), QueryResult::HostCounts(hosts) => {
        let hosts: Vec<_> = hosts.iter().map(|h| (h.email.as_str(), h.parties_hosted)).collect();
        assert_eq!(hosts, [("kim.kardashian@gmail.com", 1), ("lady.gaga@gmail.com", 1)]);
    });
}

#[test]
#[serial]
fn unreadable_value_fails_only_its_query() {
    let Some((mut conn, plan, _)) = common::seeded_database() else {
        return;
    };

    conn.execute("UPDATE party_datetime SET end_time_tz = '24:00:00+02'", &[])
        .unwrap();

    let outcomes = showcase::run_all(&mut *conn, &plan.showcase_params());
    assert_eq!(outcomes.len(), 10);
    for outcome in &outcomes {
        if outcome.query == ShowcaseQuery::PartiesStartingBetween {
            let message = outcome.result.as_ref().unwrap_err();
            assert!(message.contains("24:00:00"), "{}", message);
        } else {
            assert!(outcome.result.is_ok(), "query {} failed", outcome.number);
        }
    }

    let rave = parties::require_party_by_title(&mut *conn, RAVE).unwrap();
    let err = parties::schedules_of(&mut *conn, rave.party_id).unwrap_err();
    assert_matches!(err, Error::Database(_));
}

#[test]
#[serial]
fn schedule_round_trips_through_timetz() {
    let Some((mut conn, plan, _)) = common::seeded_database() else {
        return;
    };

    let celebrity = parties::require_party_by_title(&mut *conn, CELEBRITY_PARTY).unwrap();
    let schedules = parties::schedules_of(&mut *conn, celebrity.party_id).unwrap();
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0].start_time.to_string(), "18:00:00+01:00");
    assert_eq!(schedules[0].end_time.to_string(), "02:00:00+01:00");
    assert_eq!(
        schedules[0].end_date,
        plan.anchor.checked_add_days(chrono::Days::new(5)).unwrap()
    );

    let found = parties::get_party(&mut *conn, celebrity.party_id).unwrap().unwrap();
    assert_eq!(found, celebrity);
    assert!(parties::get_party(&mut *conn, evenue_common::PartyId::new())
        .unwrap()
        .is_none());
}

#[test]
#[serial]
fn server_clock_decides_schedule_dates() {
    let Some(mut conn) = common::empty_database() else {
        return;
    };

    let now = parties::server_now(&mut *conn).unwrap();
    let today: chrono::NaiveDate = conn.query_one("SELECT CURRENT_DATE", &[]).unwrap().get(0);
    assert_eq!(now.date_naive(), today);
}
