//! CLI command implementations.

pub(crate) mod reindex;
pub(crate) mod resolve;
pub(crate) mod tree;

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config};

use crate::error::CliError;

pub(crate) use reindex::ReindexArgs;
pub(crate) use resolve::ResolveArgs;
pub(crate) use tree::TreeArgs;

/// Options shared by every command that opens the content tree.
#[derive(Args, Debug)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Cache directory (overrides config).
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Disable the folder cache.
    #[arg(long)]
    no_cache: bool,

    /// Enable verbose output (info-level logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SiteArgs {
    /// Load configuration with these arguments applied on top.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let settings = CliSettings {
            source_dir: self.source_dir.clone(),
            cache_enabled: self.no_cache.then_some(false),
            cache_dir: self.cache_dir.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}
