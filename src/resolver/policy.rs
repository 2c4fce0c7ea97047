//! Race policies.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the race treats a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RacePolicy {
    /// The first completion of any kind ends the race.
    #[default]
    FailFast,
    /// Failures are held back while another provider may still succeed.
    FirstSuccess,
}

impl RacePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RacePolicy::FailFast => "fail_fast",
            RacePolicy::FirstSuccess => "first_success",
        }
    }
}

impl std::fmt::Display for RacePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RacePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "fail_fast" => Ok(RacePolicy::FailFast),
            "first_success" => Ok(RacePolicy::FirstSuccess),
            other => Err(format!(
                "unknown race policy '{}' (expected fail_fast or first_success)",
                other
            )),
        }
    }
}
