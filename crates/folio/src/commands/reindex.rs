//! `folio reindex` command implementation.

use std::sync::Arc;

use clap::Args;
use folio_meta::ScriptRegistry;
use folio_path::SitePath;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;
use crate::site::build_tree;

/// Arguments for the reindex command.
#[derive(Args, Debug)]
pub(crate) struct ReindexArgs {
    /// Rebuild the root folder index after clearing.
    #[arg(long)]
    warm: bool,

    #[command(flatten)]
    pub site: SiteArgs,
}

impl ReindexArgs {
    /// Drop every cached folder index.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or warming the root fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config()?;
        if !config.cache_resolved.enabled {
            output.warning("Cache is disabled; nothing to clear");
        }

        let tree = build_tree(&config, &Arc::new(ScriptRegistry::new()))?;
        let removed = tree.reindex_all();
        output.success(&format!("Removed {removed} cached folder(s)"));

        if self.warm {
            let root = tree.folder(&SitePath::root())?;
            output.info(&format!("Indexed {} root entries", root.len()));
        }
        Ok(())
    }
}
