/*!
 * Throw Configuration
 *
 * Runtime configuration for the notification bus and raising operations
 */

use super::errors::{ConfigError, ThrowResult};
use crate::signals::format::ThrowFields;

/// Selects the advisory rendering preset
pub const ENV_ADVISORY_FIELDS: &str = "THROW_ADVISORY_FIELDS";
/// Enables backtrace capture on every raise
pub const ENV_BACKTRACE: &str = "THROW_BACKTRACE";
/// Enables a `trace!` line per publish
pub const ENV_TRACE_PUBLISH: &str = "THROW_TRACE_PUBLISH";

/// Bus configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrowConfig {
    /// Fields rendered when an unhandled advisory reaches the diagnostic sink
    pub advisory_fields: ThrowFields,
    /// Capture a backtrace for each signal (honours `RUST_BACKTRACE` semantics)
    pub capture_backtrace: bool,
    /// Emit a trace event for every publish
    pub trace_publish: bool,
}

impl Default for ThrowConfig {
    fn default() -> Self {
        Self {
            advisory_fields: ThrowFields::BASIC,
            capture_backtrace: false,
            trace_publish: false,
        }
    }
}

impl ThrowConfig {
    /// Minimal overhead: basic advisories, no backtraces, no publish tracing
    pub const fn quiet() -> Self {
        Self {
            advisory_fields: ThrowFields::BASIC,
            capture_backtrace: false,
            trace_publish: false,
        }
    }

    /// Everything recorded: forensic advisories, backtraces, publish tracing
    pub const fn forensic() -> Self {
        Self {
            advisory_fields: ThrowFields::FORENSIC,
            capture_backtrace: true,
            trace_publish: true,
        }
    }

    /// Build from the process environment, falling back to defaults
    ///
    /// Environment variables:
    /// - THROW_ADVISORY_FIELDS: basic | test | forensic (default: basic)
    /// - THROW_BACKTRACE: capture backtraces (default: false)
    /// - THROW_TRACE_PUBLISH: trace each publish (default: false)
    pub fn from_env() -> ThrowResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> ThrowResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(preset) = lookup(ENV_ADVISORY_FIELDS) {
            config.advisory_fields = ThrowFields::parse(&preset)?;
        }
        if let Some(value) = lookup(ENV_BACKTRACE) {
            config.capture_backtrace = parse_flag(ENV_BACKTRACE, &value)?;
        }
        if let Some(value) = lookup(ENV_TRACE_PUBLISH) {
            config.trace_publish = parse_flag(ENV_TRACE_PUBLISH, &value)?;
        }

        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> ThrowResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
