use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration_value;
use crate::error::ValidationError;

/// Options read from `harstorm.toml` / `harstorm.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub trace: Option<String>,
    #[serde(alias = "virtual_user")]
    pub virtual_users: Option<usize>,
    pub tests: Option<u64>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub max_sockets: Option<usize>,
    pub max_random_wait: Option<DurationValue>,
    pub redirect: Option<u32>,
    pub insecure: Option<bool>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

/// Either a number of milliseconds or a string with a unit (`"2s"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Millis(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Millis(ms) => Ok(Duration::from_millis(*ms)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
