//! `relink url` command implementation.

use clap::Args;
use relink::{Direction, Operation, ReadyTarget, UrlUtils};

use super::DirectionArg;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the url command.
#[derive(Args)]
pub(crate) struct UrlArgs {
    /// Conversion to apply.
    direction: DirectionArg,

    /// URL to transform.
    url: String,

    /// Root-relative path of the content item, for page-relative URLs.
    #[arg(long)]
    item_path: Option<String>,
}

impl UrlArgs {
    /// Execute the url command.
    pub(crate) fn execute(self, utils: &UrlUtils, output: &Output) -> Result<(), CliError> {
        let item_path = self.item_path.as_deref();
        let result = match Operation::from(self.direction) {
            Operation::Rewrite(Direction::RelativeToAbsolute) => {
                utils.relative_to_absolute(&self.url, item_path)
            }
            Operation::Rewrite(Direction::AbsoluteToRelative) => utils.absolute_to_relative(&self.url),
            Operation::Rewrite(Direction::ToTransformReady) => {
                utils.to_transform_ready(&self.url, item_path)
            }
            Operation::Rewrite(Direction::AbsoluteToTransformReady) => {
                utils.absolute_to_transform_ready(&self.url)
            }
            Operation::Expand(ReadyTarget::Absolute) => utils.transform_ready_to_absolute(&self.url),
            Operation::Expand(ReadyTarget::Relative) => utils.transform_ready_to_relative(&self.url),
        };

        tracing::debug!(input = %self.url, output = %result, "Transformed URL");
        output.line(&result)?;
        Ok(())
    }
}
