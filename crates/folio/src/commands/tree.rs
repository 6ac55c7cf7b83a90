//! `folio tree` command implementation.

use std::sync::Arc;

use clap::Args;
use folio_index::Entry;
use folio_meta::ScriptRegistry;
use folio_path::SitePath;
use folio_site::PageTree;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;
use crate::site::build_tree;

/// Arguments for the tree command.
#[derive(Args, Debug)]
pub(crate) struct TreeArgs {
    /// Folder to list (default: root).
    #[arg(default_value = "/")]
    path: String,

    /// Include hidden pages and folders.
    #[arg(short, long)]
    all: bool,

    /// Maximum folder depth to descend.
    #[arg(short, long)]
    depth: Option<usize>,

    #[command(flatten)]
    pub site: SiteArgs,
}

impl TreeArgs {
    /// Print the folder tree.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the folder cannot be listed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config()?;
        let tree = build_tree(&config, &Arc::new(ScriptRegistry::new()))?;

        let root = SitePath::normalize(&self.path).to_absolute();
        output.highlight(&root.to_string());
        let mut lines = Vec::new();
        self.walk(&tree, &root, 0, &mut lines)?;
        for (line, note) in lines {
            if note.is_empty() {
                output.result(&line);
            } else {
                output.result_with_note(&line, &note);
            }
        }
        Ok(())
    }

    fn walk(
        &self,
        tree: &PageTree,
        folder: &SitePath,
        depth: usize,
        lines: &mut Vec<(String, String)>,
    ) -> Result<(), CliError> {
        let entries: Vec<(String, Entry)> = if self.all {
            tree.folder(folder)?
                .iter()
                .map(|(name, entry)| (name.to_owned(), entry.clone()))
                .collect()
        } else {
            tree.children(folder)?
        };

        let indent = "  ".repeat(depth);
        for (name, entry) in entries {
            match &entry {
                Entry::Page(page) => {
                    let extensions: Vec<&str> = page.variants().keys().map(String::as_str).collect();
                    let mut note = format!("{} [{}]", page.title(), extensions.join(", "));
                    if page.is_hidden() {
                        note.push_str(" hidden");
                    }
                    if !page.is_routable() {
                        note.push_str(" unroutable");
                    }
                    lines.push((format!("{indent}{name}"), note));
                }
                Entry::Folder(child) => {
                    let mut note = child.title().to_owned();
                    if child.is_hidden() {
                        note.push_str(" hidden");
                    }
                    lines.push((format!("{indent}{name}/"), note));
                    if self.depth.is_none_or(|max| depth + 1 < max) {
                        self.walk(tree, child.logical_path(), depth + 1, lines)?;
                    }
                }
            }
        }
        Ok(())
    }
}
