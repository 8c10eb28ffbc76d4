//! CLI command implementations.

mod transform;
mod url;

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use relink::{Direction, Format, Operation, ReadyTarget, UrlUtils};
use relink_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use transform::TransformArgs;
pub(crate) use url::UrlArgs;

/// Site options shared by all commands.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover relink.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Site URL (overrides config).
    #[arg(long, global = true, env = "RELINK_SITE_URL")]
    site_url: Option<String>,

    /// Admin URL (overrides config).
    #[arg(long, global = true)]
    admin_url: Option<String>,

    /// CDN base for images (overrides config).
    #[arg(long, global = true)]
    image_base_url: Option<String>,

    /// CDN base for files (overrides config).
    #[arg(long, global = true)]
    files_base_url: Option<String>,

    /// CDN base for media (overrides config).
    #[arg(long, global = true)]
    media_base_url: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl SiteArgs {
    /// Load configuration and build the URL utilities from it.
    pub(crate) fn build_utils(&self, output: &Output) -> Result<UrlUtils, CliError> {
        let cli_settings = CliSettings {
            site_url: self.site_url.clone(),
            admin_url: self.admin_url.clone(),
            image_base_url: self.image_base_url.clone(),
            files_base_url: self.files_base_url.clone(),
            media_base_url: self.media_base_url.clone(),
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if self.verbose {
            match &config.config_path {
                Some(path) => output.info(&format!("Using config: {}", path.display())),
                None => output.info("Using default configuration"),
            }
            output.info(&format!("Site URL: {}", config.site.url));
        }

        Ok(UrlUtils::from_config(&config)?)
    }
}

/// Conversion applied to URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum DirectionArg {
    /// Relative URLs become absolute.
    ToAbsolute,
    /// Absolute site URLs become root-relative.
    ToRelative,
    /// Relative and absolute site URLs become transform-ready.
    ToTransformReady,
    /// Only absolute site and CDN URLs become transform-ready.
    AbsoluteToTransformReady,
    /// Transform-ready URLs become absolute.
    FromTransformReady,
    /// Transform-ready URLs become root-relative.
    FromTransformReadyRelative,
}

impl From<DirectionArg> for Operation {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::ToAbsolute => Operation::Rewrite(Direction::RelativeToAbsolute),
            DirectionArg::ToRelative => Operation::Rewrite(Direction::AbsoluteToRelative),
            DirectionArg::ToTransformReady => Operation::Rewrite(Direction::ToTransformReady),
            DirectionArg::AbsoluteToTransformReady => {
                Operation::Rewrite(Direction::AbsoluteToTransformReady)
            }
            DirectionArg::FromTransformReady => Operation::Expand(ReadyTarget::Absolute),
            DirectionArg::FromTransformReadyRelative => Operation::Expand(ReadyTarget::Relative),
        }
    }
}

/// Document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FormatArg {
    Html,
    Markdown,
    Mobiledoc,
    Lexical,
    Plaintext,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Html => Format::Html,
            FormatArg::Markdown => Format::Markdown,
            FormatArg::Mobiledoc => Format::Mobiledoc,
            FormatArg::Lexical => Format::Lexical,
            FormatArg::Plaintext => Format::Plaintext,
        }
    }
}
