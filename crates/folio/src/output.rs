//! Colored terminal output utilities.

use console::{Style, Term};

/// Terminal output formatter.
///
/// Diagnostics go to stderr; command results go to stdout.
pub(crate) struct Output {
    term: Term,
    out: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
    cyan_bold: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            out: Term::stdout(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }

    /// Print a result line to stdout.
    pub(crate) fn result(&self, line: &str) {
        let _ = self.out.write_line(line);
    }

    /// Print a result line with a dimmed suffix.
    pub(crate) fn result_with_note(&self, line: &str, note: &str) {
        let _ = self
            .out
            .write_line(&format!("{line}  {}", self.dim.apply_to(note)));
    }
}
