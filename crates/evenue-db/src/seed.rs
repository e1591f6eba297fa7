//! Sample data for the party database.
//!
//! The sample is fixed apart from the party dates: every schedule is placed
//! relative to an anchor date so the rows keep passing the "not in the past"
//! checks of `party_datetime`. Everything is validated before the first
//! statement is sent, and the whole load runs in one transaction.

use std::collections::HashMap;

use chrono::{DateTime, Days, FixedOffset, NaiveDate};
use evenue_common::{AttendeeStatus, CountryCode, Error, PartyId, PartyType, Result, TimeTz};
use postgres::GenericClient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    NewLogin, NewParty, NewPartyReport, NewPartySchedule, NewUser, NewUserReport, Venue,
};
use crate::pg_error::db_err;
use crate::queries::showcase::ShowcaseParams;
use crate::queries::{activity, attendance, parties, reports, users, venues};

/// Title of the first sample party.
pub const RAVE: &str = "Musician Rave";
/// Title of the second sample party.
pub const CELEBRITY_PARTY: &str = "Celebrity Media Informatics Party!!!";

/// email, first name, last name, age, country, password
const USERS: [(&str, &str, &str, i16, &str, &str); 16] = [
    ("lady.gaga@gmail.com", "Lady", "Gaga", 35, "US", "FamousForAMeatDress126"),
    ("kim.kardashian@gmail.com", "Kim", "Kardashian", 40, "US", "iamkimkardashian"),
    ("kanye.west@gmail.com", "Kanye", "West", 44, "US", "iloveMyselfMoreThanKanye"),
    ("brad.pitt@gmail.com", "Brad", "Pitt", 57, "US", "BradsterBrad"),
    ("angelina.jolie@gmail.com", "Angelina", "Jolie", 45, "US", "TombRaiderJolie"),
    ("leonardo.dicaprio@gmail.com", "Leonardo", "DiCaprio", 46, "US", "FloatingDoor"),
    ("tom.hanks@gmail.com", "Tom", "Hanks", 64, "US", "Tommybro07"),
    ("meryl.streep@gmail.com", "Meryl", "Streep", 71, "US", "MerylStreepPass"),
    ("dwayne.johnson@gmail.com", "Dwayne", "Johnson", 48, "US", "TheRealRock"),
    ("ryan.reynolds@gmail.com", "Ryan", "Reynolds", 44, "CA", "Ilovetwitter"),
    ("michael.jackson@gmail.com", "Michael", "Jackson", 50, "US", "Shamona198"),
    ("taylor.swift@gmail.com", "Taylor", "Swift", 31, "US", "Blondehairgalxoxo"),
    ("adele@gmail.com", "Adele", "Adkins", 32, "GB", "RollingInTheDeep"),
    ("ed.sheeran@gmail.com", "Ed", "Sheeran", 30, "GB", "CheekyGinger187"),
    ("justin.bieber@gmail.com", "Justin", "Bieber", 26, "CA", "DrewCEOJB"),
    ("beyonce@gmail.com", "Beyoncé", "Knowles", 39, "US", "JayZsWife1942"),
];

/// reporter, reported, time (`None` for now), reason
const USER_REPORTS: [(&str, &str, Option<&str>, &str); 4] = [
    ("lady.gaga@gmail.com", "kim.kardashian@gmail.com", None, "Spamming"),
    (
        "lady.gaga@gmail.com",
        "kim.kardashian@gmail.com",
        Some("2022-12-18 12:34:56+02:00"),
        "Being obnoxious",
    ),
    (
        "adele@gmail.com",
        "ed.sheeran@gmail.com",
        Some("2022-09-03 08:23:57+01:00"),
        "Trolling during karaoke",
    ),
    (
        "beyonce@gmail.com",
        "ryan.reynolds@gmail.com",
        Some("2022-10-18 10:24:46+01:00"),
        "Cyberbullying",
    ),
];

/// email, party title
const FAVOURITES: [(&str, &str); 12] = [
    ("leonardo.dicaprio@gmail.com", RAVE),
    ("michael.jackson@gmail.com", RAVE),
    ("justin.bieber@gmail.com", RAVE),
    ("leonardo.dicaprio@gmail.com", CELEBRITY_PARTY),
    ("michael.jackson@gmail.com", CELEBRITY_PARTY),
    ("dwayne.johnson@gmail.com", RAVE),
    ("dwayne.johnson@gmail.com", CELEBRITY_PARTY),
    ("ed.sheeran@gmail.com", RAVE),
    ("leonardo.dicaprio@gmail.com", CELEBRITY_PARTY),
    ("kanye.west@gmail.com", RAVE),
    ("beyonce@gmail.com", RAVE),
    ("angelina.jolie@gmail.com", RAVE),
];

/// party title, email, status
const ATTENDEES: [(&str, &str, AttendeeStatus); 9] = [
    (RAVE, "dwayne.johnson@gmail.com", AttendeeStatus::Accepted),
    (CELEBRITY_PARTY, "dwayne.johnson@gmail.com", AttendeeStatus::Accepted),
    (CELEBRITY_PARTY, "kanye.west@gmail.com", AttendeeStatus::Declined),
    (RAVE, "angelina.jolie@gmail.com", AttendeeStatus::Declined),
    (RAVE, "adele@gmail.com", AttendeeStatus::Declined),
    (RAVE, "ed.sheeran@gmail.com", AttendeeStatus::Accepted),
    (RAVE, "justin.bieber@gmail.com", AttendeeStatus::Accepted),
    (RAVE, "tom.hanks@gmail.com", AttendeeStatus::Declined),
    (CELEBRITY_PARTY, "tom.hanks@gmail.com", AttendeeStatus::Declined),
];

/// party title, reporter, time, reason
const PARTY_REPORTS: [(&str, &str, &str, &str); 5] = [
    (
        RAVE,
        "dwayne.johnson@gmail.com",
        "2022-12-20 11:34:36+01:00",
        "Too few rocks lol.",
    ),
    (
        RAVE,
        "dwayne.johnson@gmail.com",
        "2022-12-20 11:35:54+01:00",
        "Apparently people named Dwayne are not welcome which is as discriminatory as it gets",
    ),
    (
        RAVE,
        "justin.bieber@gmail.com",
        "2022-12-22 06:28:42+02:00",
        "Way too many groupies allowed to attend.",
    ),
    (
        CELEBRITY_PARTY,
        "kanye.west@gmail.com",
        "2022-11-07 21:15:13+05:00",
        "The host cursed at me for no reason and then kicked me out.",
    ),
    (
        CELEBRITY_PARTY,
        "beyonce@gmail.com",
        "2022-11-04 15:15:04+01:00",
        "Highly offensive music was being played!.",
    ),
];

const REPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// Where the sample schedules are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPlan {
    /// Start date of the first party. The second starts four days later.
    pub anchor: NaiveDate,
}

impl SeedPlan {
    pub fn starting(anchor: NaiveDate) -> Self {
        Self { anchor }
    }

    /// Anchor the sample `lead_days` after `today`.
    pub fn from_today(today: NaiveDate, lead_days: u64) -> Self {
        Self {
            anchor: today.checked_add_days(Days::new(lead_days)).unwrap_or(today),
        }
    }

    /// Showcase parameters that match this sample.
    pub fn showcase_params(&self) -> ShowcaseParams {
        ShowcaseParams::for_anchor(self.anchor)
    }

    fn day(&self, offset: u64) -> Result<NaiveDate> {
        self.anchor
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| Error::invalid_input(format!("Anchor date {} is out of range", self.anchor)))
    }
}

/// Rows written by [`seed_database`], per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSummary {
    pub users: usize,
    pub logins: usize,
    pub user_reports: usize,
    pub parties: usize,
    pub favourites: usize,
    pub schedules: usize,
    pub venues: usize,
    pub attendees: usize,
    pub party_reports: usize,
    pub activity_rows: u64,
}

impl SeedSummary {
    /// Total rows, counting each venue once.
    pub fn total(&self) -> u64 {
        (self.users
            + self.logins
            + self.user_reports
            + self.parties
            + self.favourites
            + self.schedules
            + self.venues
            + self.attendees
            + self.party_reports) as u64
            + self.activity_rows
    }
}

/// The sample users.
pub fn sample_users() -> Result<Vec<NewUser>> {
    USERS
        .iter()
        .map(|&(email, first_name, last_name, age, country, _)| -> Result<NewUser> {
            Ok(NewUser {
                email: email.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                age,
                country: CountryCode::new(country).map_err(Error::invalid_input)?,
            })
        })
        .collect()
}

/// One login per sample user.
pub fn sample_logins() -> Vec<NewLogin> {
    USERS
        .iter()
        .map(|&(email, _, _, _, _, password)| NewLogin {
            email: email.to_string(),
            password: password.to_string(),
        })
        .collect()
}

/// The two sample parties, the rave first.
pub fn sample_parties() -> Vec<NewParty> {
    vec![
        NewParty {
            title: RAVE.to_string(),
            party_type: PartyType::Rave,
            party_description: "THE MOST TURNT UP RAVE IN GERMANY BRING ALL YOUR FRIENDS AND \
                                FRIENDS OF FRIENDS AND HAVE FUN"
                .to_string(),
            guest_description: "Everybody is welcome and accepted".to_string(),
            max_guests: 100,
            host: "lady.gaga@gmail.com".to_string(),
            attendance_fee: Decimal::ZERO,
        },
        NewParty {
            title: CELEBRITY_PARTY.to_string(),
            party_type: PartyType::Rooftopparty,
            party_description: "Im throwing a party for celebrities on top of the tallest \
                                flatroof bulding in regensburg. A lot of fun will be had for \
                                sure. xoxo"
                .to_string(),
            guest_description: "A list celebrities only!!! Must be tech savvy!!!".to_string(),
            max_guests: 30,
            host: "kim.kardashian@gmail.com".to_string(),
            attendance_fee: Decimal::new(1_200_099, 2),
        },
    ]
}

/// Schedules keyed by party title.
pub fn sample_schedules(plan: &SeedPlan) -> Result<Vec<(&'static str, NewPartySchedule)>> {
    let at = |hour, minute, offset| {
        TimeTz::from_hm(hour, minute, offset)
            .ok_or_else(|| Error::internal(format!("Invalid sample time {}:{}", hour, minute)))
    };

    Ok(vec![
        (
            RAVE,
            NewPartySchedule {
                start_date: plan.day(0)?,
                start_time: at(20, 0, 2)?,
                end_date: plan.day(1)?,
                end_time: at(6, 0, 2)?,
            },
        ),
        (
            CELEBRITY_PARTY,
            NewPartySchedule {
                start_date: plan.day(4)?,
                start_time: at(18, 0, 1)?,
                end_date: plan.day(5)?,
                end_time: at(2, 0, 1)?,
            },
        ),
    ])
}

/// Venues keyed by party title.
pub fn sample_venues() -> Result<Vec<(&'static str, Venue)>> {
    let germany = CountryCode::new("de").map_err(Error::invalid_input)?;
    Ok(vec![
        (
            RAVE,
            Venue {
                longitude: 6.840363,
                latitude: 51.232688,
                street_name: "Agnesstraße".to_string(),
                street_number: "17".to_string(),
                zip_code: "40489".to_string(),
                city: "Düsseldorf".to_string(),
                state: "North Rhine-Westphalia".to_string(),
                country: germany.clone(),
            },
        ),
        (
            CELEBRITY_PARTY,
            Venue {
                longitude: 12.357954,
                latitude: 51.340177,
                street_name: "Adlershelmstraße".to_string(),
                street_number: "20".to_string(),
                zip_code: "04318".to_string(),
                city: "Leipzig".to_string(),
                state: "Saxony".to_string(),
                country: germany,
            },
        ),
    ])
}

fn report_time(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, REPORT_TIME_FORMAT)
        .map_err(|e| Error::internal(format!("Invalid sample timestamp {:?}: {}", value, e)))
}

/// The sample reports against users.
pub fn sample_user_reports() -> Result<Vec<NewUserReport>> {
    USER_REPORTS
        .iter()
        .map(|&(reporter, reported, time, reason)| -> Result<NewUserReport> {
            Ok(NewUserReport {
                reporter: reporter.to_string(),
                reported: reported.to_string(),
                reported_at: time.map(report_time).transpose()?,
                reason: reason.to_string(),
            })
        })
        .collect()
}

/// Everything needed for one load, built and validated up front.
struct Sample {
    users: Vec<NewUser>,
    logins: Vec<NewLogin>,
    user_reports: Vec<NewUserReport>,
    parties: Vec<NewParty>,
    schedules: Vec<(&'static str, NewPartySchedule)>,
    venues: Vec<(&'static str, Venue)>,
    party_reports: Vec<(&'static str, &'static str, DateTime<FixedOffset>, &'static str)>,
}

impl Sample {
    fn build(plan: &SeedPlan) -> Result<Self> {
        let sample = Self {
            users: sample_users()?,
            logins: sample_logins(),
            user_reports: sample_user_reports()?,
            parties: sample_parties(),
            schedules: sample_schedules(plan)?,
            venues: sample_venues()?,
            party_reports: PARTY_REPORTS
                .iter()
                .map(|&(title, reporter, time, reason)| {
                    report_time(time).map(|at| (title, reporter, at, reason))
                })
                .collect::<Result<_>>()?,
        };

        for user in &sample.users {
            user.validate()?;
        }
        for login in &sample.logins {
            login.validate()?;
        }
        for report in &sample.user_reports {
            report.validate()?;
        }
        for party in &sample.parties {
            party.validate()?;
        }
        for (_, venue) in &sample.venues {
            venue.validate()?;
        }

        Ok(sample)
    }
}

fn party_id(ids: &HashMap<&str, PartyId>, title: &str) -> Result<PartyId> {
    ids.get(title)
        .copied()
        .ok_or_else(|| Error::not_found(format!("sample party '{}'", title)))
}

/// Load the sample into empty tables.
///
/// Runs in one transaction: either every row is written or none is.
///
/// # Returns
///
/// * `Ok(SeedSummary)` - Rows written per table
/// * `Err(Error)` - The first failure; the transaction is rolled back
pub fn seed_database(client: &mut impl GenericClient, plan: &SeedPlan) -> Result<SeedSummary> {
    let sample = Sample::build(plan)?;
    let mut summary = SeedSummary::default();
    let mut tx = client.transaction().map_err(db_err)?;

    for user in &sample.users {
        users::insert_user(&mut tx, user)?;
        summary.users += 1;
    }
    for login in &sample.logins {
        users::set_password(&mut tx, login)?;
        summary.logins += 1;
    }
    for report in &sample.user_reports {
        reports::report_user(&mut tx, report)?;
        summary.user_reports += 1;
    }

    let mut ids = HashMap::new();
    for party in &sample.parties {
        let id = parties::insert_party(&mut tx, party)?;
        ids.insert(party.title.as_str(), id);
        summary.parties += 1;
    }

    for &(email, title) in FAVOURITES.iter() {
        parties::add_favourite(&mut tx, email, party_id(&ids, title)?)?;
        summary.favourites += 1;
    }
    for (title, schedule) in &sample.schedules {
        parties::insert_schedule(&mut tx, party_id(&ids, title)?, schedule)?;
        summary.schedules += 1;
    }
    for (title, venue) in &sample.venues {
        venues::insert_venue(&mut tx, party_id(&ids, title)?, venue)?;
        summary.venues += 1;
    }
    for &(title, email, status) in ATTENDEES.iter() {
        attendance::add_attendee(&mut tx, party_id(&ids, title)?, email, status)?;
        summary.attendees += 1;
    }
    for &(title, reporter, time, reason) in &sample.party_reports {
        reports::report_party(
            &mut tx,
            &NewPartyReport {
                party_id: party_id(&ids, title)?,
                reporter: reporter.to_string(),
                reported_at: Some(time),
                reason: reason.to_string(),
            },
        )?;
        summary.party_reports += 1;
    }

    summary.activity_rows = activity::rebuild_user_activity(&mut tx)?;

    tx.commit().map_err(db_err)?;

    tracing::info!(
        "Seeded {} users and {} parties starting {}",
        summary.users,
        summary.parties,
        plan.anchor
    );
    Ok(summary)
}
