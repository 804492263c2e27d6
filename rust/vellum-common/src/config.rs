//! Validation settings shared by the buffer and vector layers.

use std::collections::HashMap;

/// Environment variable overriding the null/bounds validation setting.
pub const NULL_CHECKS_ENV_VAR: &str = "VELLUM_VECTOR_NULL_CHECKS";

/// Configuration property overriding the null/bounds validation setting.
/// Consulted only when the environment variable is absent.
pub const NULL_CHECKS_PROPERTY: &str = "vellum.vector.null-checks";

/// Controls the optional stricter validation performed by vector readers.
///
/// The configuration is resolved once at startup and handed to every vector
/// constructor; there is no process-wide mutable state behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    /// When set, typed reads verify that the row index lies within the written
    /// extent and that the row is not null.
    pub null_checks: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { null_checks: true }
    }
}

impl ValidationConfig {
    /// A configuration with all optional validation disabled.
    pub fn unchecked() -> ValidationConfig {
        ValidationConfig { null_checks: false }
    }

    /// Resolves the configuration from the process environment only.
    pub fn from_env() -> ValidationConfig {
        Self::resolve(&HashMap::new())
    }

    /// Resolves the configuration in priority order: the
    /// [`NULL_CHECKS_ENV_VAR`] environment variable, then the
    /// [`NULL_CHECKS_PROPERTY`] entry of `properties`, then the default (enabled).
    pub fn resolve(properties: &HashMap<String, String>) -> ValidationConfig {
        let env_value = std::env::var(NULL_CHECKS_ENV_VAR).ok();
        Self::resolve_from(env_value.as_deref(), properties)
    }

    /// Same as [`ValidationConfig::resolve`], with the environment value supplied
    /// by the caller.
    pub fn resolve_from(
        env_value: Option<&str>,
        properties: &HashMap<String, String>,
    ) -> ValidationConfig {
        let null_checks = env_value
            .or_else(|| properties.get(NULL_CHECKS_PROPERTY).map(String::as_str))
            .map(parse_bool)
            .unwrap_or(true);
        log::debug!("vector null checks resolved to {null_checks}");
        ValidationConfig { null_checks }
    }
}

/// Only a case-insensitive `"true"` enables the flag; any other value disables it.
fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
