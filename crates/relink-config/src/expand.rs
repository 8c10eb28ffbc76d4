//! Environment variable expansion for configuration strings.
//!
//! - `${VAR}` expands to the value of VAR, errors if unset
//! - `${VAR:-default}` expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Bare `$VAR` is left alone so URLs containing `$` survive unchanged.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Expand an optional field in place.
pub(crate) fn expand_optional(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(inner) = value.as_deref() {
        *value = Some(expand_env(inner, field)?);
    }
    Ok(())
}

/// Name of a variable that was referenced but not set.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_site_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("RELINK_TEST_SITE_HOST", "my-blog.com");
        }
        let result = expand_env("https://${RELINK_TEST_SITE_HOST}/", "site.url").unwrap();
        assert_eq!(result, "https://my-blog.com/");
        unsafe {
            std::env::remove_var("RELINK_TEST_SITE_HOST");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("RELINK_TEST_UNSET_CDN");
        }
        let result = expand_env("${RELINK_TEST_UNSET_CDN:-https://cdn.example}", "assets.media_base_url")
            .unwrap();
        assert_eq!(result, "https://cdn.example");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("RELINK_TEST_MISSING");
        }
        let err = expand_env("${RELINK_TEST_MISSING}", "site.admin_url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("RELINK_TEST_MISSING"));
        assert!(err.to_string().contains("site.admin_url"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("https://my-blog.com/$path", "site.url").unwrap();
        assert_eq!(result, "https://my-blog.com/$path");
    }

    #[test]
    fn test_expand_optional_none_is_noop() {
        let mut value = None;
        expand_optional(&mut value, "assets.files_base_url").unwrap();
        assert_eq!(value, None);
    }
}
