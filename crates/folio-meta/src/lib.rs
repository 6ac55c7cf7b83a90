//! Page interpretation for Folio.
//!
//! Turns one physical file into a normalized [`PageFile`] descriptor, or
//! reports that the file is unsupported. Interpreters are registered per
//! extension and combined by [`Multiplexer`]:
//!
//! - [`StaticInterpreter`]: no metadata, title from the file name
//! - [`MarkupInterpreter`]: YAML front matter + leading H1 title
//! - [`ScriptInterpreter`]: compiled-in [`PageScript`]s with declarative attributes
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use folio_meta::{Interpreter, MarkupInterpreter, Multiplexer, SourceFile, StaticInterpreter};
//! use folio_path::SitePath;
//!
//! let interpreter = Multiplexer::new(vec![
//!     Arc::new(MarkupInterpreter::default()) as Arc<dyn Interpreter>,
//!     Arc::new(StaticInterpreter::new(["html", "txt"])),
//! ]);
//!
//! let source = SourceFile::from_path(Path::new("content"), Path::new("content/about.md"))?;
//! let page = interpreter.interpret(&source, &SitePath::root(), "about")?;
//! println!("{} -> {}", page.logical_path(), page.title());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod front_matter;
mod interpreter;
mod markup;
mod page_file;
mod script;
mod static_file;

pub use front_matter::{FrontMatter, MarkupDocument, split_front_matter};
pub use interpreter::{InterpretError, Interpreter, Multiplexer, SourceFile};
pub use markup::MarkupInterpreter;
pub use page_file::{PageFile, titlecase_from_slug};
pub use script::{PageScript, ScriptAttributes, ScriptInterpreter, ScriptOutput, ScriptRegistry};
pub use static_file::StaticInterpreter;
