//! Build metadata for `/version` and the startup log line.
//!
//! Commit and build date come from the `XEROPHAGON_COMMIT` and
//! `XEROPHAGON_BUILD_DATE` environment variables at compile time and are
//! omitted when the build did not set them.

use std::fmt;

use serde::Serialize;

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_date: Option<&'static str>,
}

impl BuildInfo {
    /// Metadata of the running binary.
    pub const fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            commit: non_empty(option_env!("XEROPHAGON_COMMIT")),
            build_date: non_empty(option_env!("XEROPHAGON_BUILD_DATE")),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)?;
        match (self.commit, self.build_date) {
            (Some(commit), Some(date)) => write!(f, " ({commit}, built {date})"),
            (Some(commit), None) => write!(f, " ({commit})"),
            (None, Some(date)) => write!(f, " (built {date})"),
            (None, None) => Ok(()),
        }
    }
}

const fn non_empty(value: Option<&'static str>) -> Option<&'static str> {
    match value {
        Some(v) if !v.is_empty() => Some(v),
        _ => None,
    }
}
