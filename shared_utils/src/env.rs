use thiserror::Error;

/// An environment variable the caller asked for is not set (or not valid unicode).
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// Empty values count as missing, so `KBAR_LOG=` behaves like an unset variable.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(MissingEnvVarError(name.to_string())),
    }
}

/// Reads an environment variable, falling back to `default` when it is missing.
pub fn get_env_var_or(name: &str, default: &str) -> String {
    get_env_var(name).unwrap_or_else(|_| default.to_string())
}
