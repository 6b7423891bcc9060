//! Error taxonomy for the interaction core.
//!
//! None of these halt the tick loop. Registration warnings and load
//! failures are logged and degrade interaction to "nothing resolves";
//! unresolved actions are silent no-ops.

use crate::id::EntityId;
use thiserror::Error;

/// A configured interactive id that is missing from the loaded graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("interactive id `{id}` is not present in the loaded scene")]
pub struct RegistrationWarning {
    pub id: EntityId,
}

/// The asset loader could not produce a scene graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("scene failed to load: {reason}")]
pub struct LoadFailure {
    pub reason: String,
}

impl LoadFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LoadFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("malformed scene snapshot: {err}"))
    }
}

/// Failures on the click → action path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    /// The clicked entity has no configured action.
    #[error("no action configured for `{id}`")]
    UnresolvedAction { id: EntityId },

    /// The configured address cannot be turned into a link.
    #[error("invalid address `{address}`: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The navigation host refused or failed the request.
    #[error("host error: {0}")]
    Host(String),
}

/// Rejected static configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid range for `{field}`: min {min} > max {max}")]
    InvalidRange { field: String, min: f32, max: f32 },

    #[error("invalid value for `{field}`: {value}")]
    InvalidValue { field: String, value: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_entity() {
        let w = RegistrationWarning {
            id: EntityId::intern("Headphones"),
        };
        assert!(w.to_string().contains("`Headphones`"));

        let e = InteractionError::UnresolvedAction {
            id: EntityId::intern("Stars_01"),
        };
        assert_eq!(e.to_string(), "no action configured for `Stars_01`");
    }

    #[test]
    fn load_failure_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let failure = LoadFailure::from(err);
        assert!(failure.reason.starts_with("malformed scene snapshot"));
    }
}
