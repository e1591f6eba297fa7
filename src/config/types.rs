use chrono::NaiveDate;
use evenue_db::pool::DbSettings;
use evenue_db::queries::showcase::ShowcaseParams;
use evenue_db::seed::SeedPlan;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DbSettings,

    #[serde(default)]
    pub seed: SeedConfig,

    #[serde(default)]
    pub showcase: ShowcaseConfig,
}

impl Config {
    /// Where the sample parties are placed, given today's date.
    pub fn seed_plan(&self, today: NaiveDate) -> SeedPlan {
        match self.seed.party_start_date {
            Some(date) => SeedPlan::starting(date),
            None => SeedPlan::from_today(today, self.seed.lead_days),
        }
    }

    /// Showcase parameters for data seeded with `plan`.
    ///
    /// An explicit window replaces the one derived from the plan; each bound
    /// can be set on its own.
    pub fn showcase_params(&self, plan: &SeedPlan) -> ShowcaseParams {
        let derived = plan.showcase_params();
        ShowcaseParams {
            country: self.showcase.country.clone(),
            window_start: self.showcase.window_start.unwrap_or(derived.window_start),
            window_end: self.showcase.window_end.unwrap_or(derived.window_end),
            attendee_email: self.showcase.attendee_email.clone(),
            party_title: self.showcase.party_title.clone(),
            zip_code: self.showcase.zip_code.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedConfig {
    /// Fixed start date of the first sample party
    #[serde(default)]
    pub party_start_date: Option<NaiveDate>,

    /// Days from today to the first sample party when no date is fixed
    #[serde(default = "default_lead_days")]
    pub lead_days: u64,
}

fn default_lead_days() -> u64 {
    30
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            party_start_date: None,
            lead_days: default_lead_days(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShowcaseConfig {
    /// Two-letter country code for query 1
    #[serde(default = "default_country")]
    pub country: String,

    /// Attendee whose parties query 6 lists
    #[serde(default = "default_attendee_email")]
    pub attendee_email: String,

    /// Party whose guests query 7 lists
    #[serde(default = "default_party_title")]
    pub party_title: String,

    /// Venue zip code for query 9
    #[serde(default = "default_zip_code")]
    pub zip_code: String,

    /// Start of the query 3 window (default: 26 days before the first party)
    #[serde(default)]
    pub window_start: Option<NaiveDate>,

    /// End of the query 3 window (default: the day after the first party)
    #[serde(default)]
    pub window_end: Option<NaiveDate>,
}

fn default_country() -> String {
    "DE".to_string()
}
fn default_attendee_email() -> String {
    "dwayne.johnson@gmail.com".to_string()
}
fn default_party_title() -> String {
    "Musician Rave".to_string()
}
fn default_zip_code() -> String {
    "40489".to_string()
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            attendee_email: default_attendee_email(),
            party_title: default_party_title(),
            zip_code: default_zip_code(),
            window_start: None,
            window_end: None,
        }
    }
}
