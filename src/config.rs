//! Registrar configuration.
//!
//! Options are built in code, read from `AUTOWIRE_*` environment variables,
//! or, with the `config` feature, parsed from JSON.

use std::env;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::{DiError, DiResult};

/// Environment variable selecting the [`DuplicateNamePolicy`].
pub const ENV_DUPLICATE_NAMES: &str = "AUTOWIRE_DUPLICATE_NAMES";
/// Environment variable toggling [`RegistrarOptions::register_self`].
pub const ENV_REGISTER_SELF: &str = "AUTOWIRE_REGISTER_SELF";

/// What a scan does when a name is already taken for an abstraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum DuplicateNamePolicy {
    /// Append anyway; lookups return the earliest entry
    #[default]
    FirstWins,
    /// Fail the scan with `DiError::DuplicateName` before registering anything
    Reject,
}

impl DuplicateNamePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateNamePolicy::FirstWins => "first-wins",
            DuplicateNamePolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for DuplicateNamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicateNamePolicy {
    type Err = DiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-wins" | "first_wins" | "firstwins" => Ok(DuplicateNamePolicy::FirstWins),
            "reject" => Ok(DuplicateNamePolicy::Reject),
            other => Err(DiError::Config(format!(
                "unknown duplicate name policy '{}', expected 'first-wins' or 'reject'",
                other
            ))),
        }
    }
}

/// Knobs for [`Registrar`](crate::Registrar).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default, rename_all = "snake_case"))]
pub struct RegistrarOptions {
    pub duplicate_names: DuplicateNamePolicy,
    /// Also bind each concrete type to itself and list it by name
    pub register_self: bool,
}

impl RegistrarOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duplicate_names(mut self, policy: DuplicateNamePolicy) -> Self {
        self.duplicate_names = policy;
        self
    }

    pub fn register_self(mut self, enabled: bool) -> Self {
        self.register_self = enabled;
        self
    }

    /// Defaults overridden by whichever `AUTOWIRE_*` variables are set.
    ///
    /// A set but malformed variable is an error, not a silent default.
    pub fn from_env() -> DiResult<Self> {
        let mut options = Self::default();
        if let Ok(value) = env::var(ENV_DUPLICATE_NAMES) {
            options.duplicate_names = value.parse()?;
        }
        if let Ok(value) = env::var(ENV_REGISTER_SELF) {
            options.register_self = parse_bool(ENV_REGISTER_SELF, &value)?;
        }
        Ok(options)
    }

    /// Parses options from a JSON object; missing fields keep their defaults.
    ///
    /// ```rust
    /// use ferrous_autowire::{DuplicateNamePolicy, RegistrarOptions};
    ///
    /// let options = RegistrarOptions::from_json(r#"{ "duplicate_names": "reject" }"#).unwrap();
    /// assert_eq!(options.duplicate_names, DuplicateNamePolicy::Reject);
    /// assert!(!options.register_self);
    /// ```
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> DiResult<Self> {
        serde_json::from_str(json).map_err(|e| DiError::Config(format!("invalid registrar options: {}", e)))
    }
}

fn parse_bool(variable: &str, value: &str) -> DiResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(DiError::Config(format!("{} must be a boolean, got '{}'", variable, other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_both_spellings() {
        assert_eq!("first-wins".parse::<DuplicateNamePolicy>().unwrap(), DuplicateNamePolicy::FirstWins);
        assert_eq!("First_Wins".parse::<DuplicateNamePolicy>().unwrap(), DuplicateNamePolicy::FirstWins);
        assert_eq!(" reject ".parse::<DuplicateNamePolicy>().unwrap(), DuplicateNamePolicy::Reject);
    }

    #[test]
    fn unknown_policy_is_a_config_error() {
        let err = "strict".parse::<DuplicateNamePolicy>().unwrap_err();
        assert!(matches!(err, DiError::Config(msg) if msg.contains("strict")));
    }

    #[test]
    fn bools_accept_common_forms() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(parse_bool("X", "1").unwrap());
        assert!(!parse_bool("X", "off").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn builder_sets_fields() {
        let options = RegistrarOptions::new()
            .duplicate_names(DuplicateNamePolicy::Reject)
            .register_self(true);
        assert_eq!(options.duplicate_names, DuplicateNamePolicy::Reject);
        assert!(options.register_self);
        assert_eq!(options.duplicate_names.to_string(), "reject");
    }
}
