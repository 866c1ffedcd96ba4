use std::{env, str::FromStr, time::Duration};

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Reads a boolean flag from the environment variable `name`, falling back to `default` if it is unset or unreadable.
pub fn env_flag(name: &str, default: bool) -> bool {
    parse_boolean_flag(env::var(name).ok(), default)
}

/// Reads a millisecond duration from the environment variable `name`. Returns `None` if the variable is not set or
/// is not a valid integer.
pub fn env_millis(name: &str) -> Option<Duration> {
    env::var(name).ok().and_then(|s| u64::from_str(s.trim()).ok()).map(Duration::from_millis)
}
