use std::str::FromStr;

use thiserror::Error;

/// An environment variable is set but its value cannot be parsed.
#[derive(Debug, Error)]
#[error("Invalid value for environment variable {name}: {value:?} ({reason})")]
pub struct InvalidEnvVarError {
    pub name: String,
    pub value: String,
    pub reason: String,
}

/// Reads an optional environment variable. Unset and blank values are `None`.
pub fn get_env_var_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reads and parses an optional environment variable.
///
/// Returns `Ok(None)` when the variable is unset or blank and an
/// [`InvalidEnvVarError`] when it is set to something `T` cannot parse.
pub fn parse_env_var<T>(name: &str) -> Result<Option<T>, InvalidEnvVarError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_var_opt(name) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|e| InvalidEnvVarError {
            name: name.to_string(),
            value: raw,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn unset_var_parses_to_none() {
        unsafe { std::env::remove_var("SHARED_UTILS_TEST_MISSING") };
        assert_eq!(get_env_var_opt("SHARED_UTILS_TEST_MISSING"), None);
        let v: Option<u64> = parse_env_var("SHARED_UTILS_TEST_MISSING").unwrap();
        assert_eq!(v, None);
    }

    #[test]
    #[serial]
    fn blank_optional_var_is_none() {
        unsafe { std::env::set_var("SHARED_UTILS_TEST_BLANK", "   ") };
        assert_eq!(get_env_var_opt("SHARED_UTILS_TEST_BLANK"), None);
        unsafe { std::env::remove_var("SHARED_UTILS_TEST_BLANK") };
    }

    #[test]
    #[serial]
    fn parses_numeric_var() {
        unsafe { std::env::set_var("SHARED_UTILS_TEST_NUM", " 42 ") };
        let v: Option<u64> = parse_env_var("SHARED_UTILS_TEST_NUM").unwrap();
        assert_eq!(v, Some(42));

        unsafe { std::env::set_var("SHARED_UTILS_TEST_NUM", "forty-two") };
        let err = parse_env_var::<u64>("SHARED_UTILS_TEST_NUM").unwrap_err();
        assert_eq!(err.name, "SHARED_UTILS_TEST_NUM");
        assert_eq!(err.value, "forty-two");
        unsafe { std::env::remove_var("SHARED_UTILS_TEST_NUM") };
    }
}
