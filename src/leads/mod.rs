mod data;
mod extractor;

pub use data::{LeadData, LeadTable};
pub use extractor::Extractor;

use crate::utils;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNKNOWN_NAME: &str = "unknown";
pub const DEFAULT_SOURCE: &str = "linkedin-search";

/// One discovered profile. `profile_url` is the identity of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(default = "unknown_name")]
    pub name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    pub profile_url: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<FixedOffset>>,
}

fn unknown_name() -> String {
    UNKNOWN_NAME.to_string()
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

/// Splits "Founder at Acme Corp" into ("Founder", "Acme Corp"). Text without the
/// separator is kept whole as the job title.
pub fn split_title(text: &str) -> (String, String) {
    match text.split_once(" at ") {
        Some((title, company)) => (title.trim().to_string(), company.trim().to_string()),
        None => (text.trim().to_string(), String::new()),
    }
}

/// Puts records read from a snapshot file on canonical profile URLs. Records
/// whose URL is empty, relative or unparsable are dropped.
pub fn canonicalize(records: Vec<ProfileRecord>) -> Vec<ProfileRecord> {
    records
        .into_iter()
        .filter_map(|mut record| match utils::canonical_profile_url(&record.profile_url, None) {
            Some(url) => {
                record.profile_url = url;
                Some(record)
            }
            None => {
                tracing::warn!("Skip lead without a usable profile URL: {:?}", record.profile_url);
                None
            }
        })
        .collect()
}

impl fmt::Display for ProfileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name        : {}", self.name)?;
        writeln!(f, "Job Title   : {}", self.job_title)?;
        writeln!(f, "Company     : {}", self.company)?;
        writeln!(f, "Location    : {}", self.location)?;
        writeln!(f, "Profile     : {}", self.profile_url)?;
        writeln!(f, "Source      : {}", self.source)?;
        if let Some(d) = self.date_added.as_ref() {
            writeln!(f, "Date Added  : {}", d)?;
        } else {
            writeln!(f, "Date Added  : None")?;
        };

        Ok(())
    }
}
