//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// Only the braced form is expanded; a bare `$VAR` is left as written. An
/// unset variable without a default is an error naming `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, Unset> {
        std::env::var(var).map(Some).map_err(|_| Unset(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

struct Unset(String);
