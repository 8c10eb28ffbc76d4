//! `relink transform` command implementation.

use std::path::PathBuf;

use clap::Args;
use relink::UrlUtils;

use super::{DirectionArg, FormatArg};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the transform command.
#[derive(Args)]
pub(crate) struct TransformArgs {
    /// Document to transform, or `-` for stdin.
    input: PathBuf,

    /// Document format.
    #[arg(short, long)]
    format: FormatArg,

    /// Conversion to apply.
    #[arg(short, long)]
    direction: DirectionArg,

    /// Root-relative path of the content item, for page-relative URLs.
    #[arg(long)]
    item_path: Option<String>,

    /// Write the result to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl TransformArgs {
    /// Execute the transform command.
    pub(crate) fn execute(self, utils: &UrlUtils, output: &Output) -> Result<(), CliError> {
        let document = if self.input.as_os_str() == "-" {
            std::io::read_to_string(std::io::stdin())?
        } else {
            std::fs::read_to_string(&self.input)?
        };

        let result = utils.transform(
            self.format.into(),
            self.direction.into(),
            &document,
            self.item_path.as_deref(),
        )?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &result)?;
                output.info(&format!("Wrote {}", path.display()));
            }
            None => output.document(&result)?,
        }
        Ok(())
    }
}
