use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Call category with a fixed preset deadline.
///
/// - `Query`: read/query calls against the backend.
/// - `Auth`: calls into the hosted authentication API.
/// - `Insert`: write/insert calls.
///
/// On the command line the same aliases as [`FromStr`] are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[value(alias = "read")]
    Query,
    #[value(alias = "authentication")]
    Auth,
    #[value(alias = "write")]
    Insert,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Query, Category::Auth, Category::Insert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Query => "query",
            Category::Auth => "auth",
            Category::Insert => "insert",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "query" | "read" => Ok(Category::Query),
            "auth" | "authentication" => Ok(Category::Auth),
            "insert" | "write" => Ok(Category::Insert),
            other => Err(format!(
                "invalid category: {other} (expected \"query\", \"auth\" or \"insert\")"
            )),
        }
    }
}

/// How often a progress tracker repeats its slow-operation warning.
///
/// - `Every`: warn on every check once past the threshold (default).
/// - `Once`: warn on the first check past the threshold only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarnPolicy {
    #[default]
    Every,
    Once,
}

impl FromStr for WarnPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "every" => Ok(WarnPolicy::Every),
            "once" => Ok(WarnPolicy::Once),
            other => Err(format!(
                "invalid warn_policy: {other} (expected \"every\" or \"once\")"
            )),
        }
    }
}
