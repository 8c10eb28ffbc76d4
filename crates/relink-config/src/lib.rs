//! Configuration management for relink.
//!
//! Parses `relink.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! URL values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.url`
//! - `site.admin_url`
//! - `assets.image_base_url`
//! - `assets.files_base_url`
//! - `assets.media_base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override site URL.
    pub site_url: Option<String>,
    /// Override admin URL.
    pub admin_url: Option<String>,
    /// Override image CDN base.
    pub image_base_url: Option<String>,
    /// Override files CDN base.
    pub files_base_url: Option<String>,
    /// Override media CDN base.
    pub media_base_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "relink.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration.
    pub site: SiteConfig,
    /// Static asset prefixes and CDN bases.
    pub assets: AssetsConfig,
    /// Transformation flags.
    pub transform: TransformConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public site URL, possibly with a subdirectory.
    pub url: String,
    /// Admin URL when the admin lives on a separate host.
    pub admin_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:2368/".to_owned(),
            admin_url: None,
        }
    }
}

/// Static asset configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Path prefix of uploaded images.
    pub image_prefix: String,
    /// Path prefix of uploaded files.
    pub files_prefix: String,
    /// Path prefix of uploaded media.
    pub media_prefix: String,
    /// CDN base for images.
    pub image_base_url: Option<String>,
    /// CDN base for files.
    pub files_base_url: Option<String>,
    /// CDN base for media.
    pub media_base_url: Option<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            image_prefix: "content/images".to_owned(),
            files_prefix: "content/files".to_owned(),
            media_prefix: "content/media".to_owned(),
            image_base_url: None,
            files_base_url: None,
            media_base_url: None,
        }
    }
}

/// Transformation flags.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Placeholder written in place of the site URL.
    pub replacement: String,
    /// Force `https:` on absolute output.
    pub secure: bool,
    /// Only rewrite static asset URLs.
    pub assets_only: bool,
    /// Treat `http:` and `https:` site URLs alike.
    pub ignore_protocol: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            replacement: "__GHOST_URL__".to_owned(),
            secure: false,
            assets_only: false,
            ignore_protocol: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `relink.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading and the result is validated,
    /// so CLI arguments take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(site_url) = &settings.site_url {
            self.site.url.clone_from(site_url);
        }
        if let Some(admin_url) = &settings.admin_url {
            self.site.admin_url = Some(admin_url.clone());
        }
        if let Some(base) = &settings.image_base_url {
            self.assets.image_base_url = Some(base.clone());
        }
        if let Some(base) = &settings.files_base_url {
            self.assets.files_base_url = Some(base.clone());
        }
        if let Some(base) = &settings.media_base_url {
            self.assets.media_base_url = Some(base.clone());
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_assets()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.url, "site.url")?;
        require_http_url(&self.site.url, "site.url")?;
        if let Some(admin_url) = &self.site.admin_url {
            require_non_empty(admin_url, "site.admin_url")?;
            require_http_url(admin_url, "site.admin_url")?;
        }
        Ok(())
    }

    fn validate_assets(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.assets.image_prefix, "assets.image_prefix")?;
        require_non_empty(&self.assets.files_prefix, "assets.files_prefix")?;
        require_non_empty(&self.assets.media_prefix, "assets.media_prefix")?;

        let bases = [
            (&self.assets.image_base_url, "assets.image_base_url"),
            (&self.assets.files_base_url, "assets.files_base_url"),
            (&self.assets.media_base_url, "assets.media_base_url"),
        ];
        for (base, field) in bases {
            if let Some(base) = base {
                require_non_empty(base, field)?;
                require_http_url(base, field)?;
            }
        }
        Ok(())
    }

    /// Expand environment variable references in URL fields.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.url = expand::expand_env(&self.site.url, "site.url")?;
        expand::expand_optional(&mut self.site.admin_url, "site.admin_url")?;
        expand::expand_optional(&mut self.assets.image_base_url, "assets.image_base_url")?;
        expand::expand_optional(&mut self.assets.files_base_url, "assets.files_base_url")?;
        expand::expand_optional(&mut self.assets.media_base_url, "assets.media_base_url")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.site.url, "http://localhost:2368/");
        assert!(config.site.admin_url.is_none());
        assert_eq!(config.assets.image_prefix, "content/images");
        assert_eq!(config.transform.replacement, "__GHOST_URL__");
        assert!(config.transform.ignore_protocol);
        assert!(!config.transform.secure);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site.url, "http://localhost:2368/");
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[site]
url = "https://my-blog.com/blog/"
admin_url = "https://admin.my-blog.com"

[assets]
media_prefix = "content/media"
media_base_url = "https://cdn.example/c/site"

[transform]
replacement = "{{SITE}}"
secure = true
ignore_protocol = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site.url, "https://my-blog.com/blog/");
        assert_eq!(config.site.admin_url.as_deref(), Some("https://admin.my-blog.com"));
        assert_eq!(
            config.assets.media_base_url.as_deref(),
            Some("https://cdn.example/c/site")
        );
        assert_eq!(config.assets.files_prefix, "content/files");
        assert_eq!(config.transform.replacement, "{{SITE}}");
        assert!(config.transform.secure);
        assert!(!config.transform.ignore_protocol);
        assert!(!config.transform.assets_only);
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        let overrides = CliSettings {
            site_url: Some("https://override.com".to_owned()),
            media_base_url: Some("https://cdn.override.com".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.site.url, "https://override.com");
        assert_eq!(
            config.assets.media_base_url.as_deref(),
            Some("https://cdn.override.com")
        );
        assert!(config.site.admin_url.is_none());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("RELINK_CONFIG_TEST_CDN", "https://cdn.test.com");
        }

        let toml = r#"
[assets]
files_base_url = "${RELINK_CONFIG_TEST_CDN}/files"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        assert_eq!(
            config.assets.files_base_url.as_deref(),
            Some("https://cdn.test.com/files")
        );

        unsafe {
            std::env::remove_var("RELINK_CONFIG_TEST_CDN");
        }
    }

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(msg.contains(s), "Expected error to contain '{s}', got: {msg}");
        }
    }

    #[test]
    fn test_validate_site_url_empty() {
        let mut config = Config::default();
        config.site.url = String::new();
        assert_validation_error(&config, &["site.url", "cannot be empty"]);
    }

    #[test]
    fn test_validate_site_url_scheme() {
        let mut config = Config::default();
        config.site.url = "ftp://my-blog.com".to_owned();
        assert_validation_error(&config, &["site.url", "http://"]);
    }

    #[test]
    fn test_validate_cdn_base_scheme() {
        let mut config = Config::default();
        config.assets.media_base_url = Some("cdn.example".to_owned());
        assert_validation_error(&config, &["assets.media_base_url"]);
    }

    #[test]
    fn test_validate_empty_prefix() {
        let mut config = Config::default();
        config.assets.image_prefix = String::new();
        assert_validation_error(&config, &["assets.image_prefix"]);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relink.toml");
        std::fs::write(&path, "[site]\nurl = \"https://my-blog.com\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.site.url, "https://my-blog.com");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_validates_after_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relink.toml");
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            admin_url: Some("admin.my-blog.com".to_owned()),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(err.to_string().contains("site.admin_url"));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relink.toml");
        std::fs::write(&path, "[site\nurl = 1").unwrap();
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("content/posts");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("relink.toml"), "").unwrap();

        assert_eq!(
            Config::discover_config(&nested),
            Some(dir.path().join("relink.toml"))
        );
    }
}
