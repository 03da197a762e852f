//! Subcommand implementations

pub mod describe;
pub mod families;
pub mod hit;
pub mod measure;
pub mod render;

use anyhow::{Context, Result};
use plugfont::{FontHost, Module, Resource};

use crate::cli::FontArgs;

/// All resources the CLI creates belong to this module
pub const CLI_MODULE: Module = Module(1);

/// Resolve the requested font or explain why not
pub fn create_font(host: &FontHost, args: &FontArgs) -> Result<Resource> {
    let description = args.description();
    host.try_create(CLI_MODULE, &description)
        .with_context(|| format!("No font matches {:?}", description))
}
