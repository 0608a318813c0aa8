//! Line-tagged diagnostics and the sink they are written to.

use std::fmt;
use std::io::Write;

/// How serious a reported problem is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The line of an importing file that pulled in the current file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    pub file: String,
    pub line: usize,
}

/// A problem found at a specific line of an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub severity: Severity,
    pub message: String,
    /// Import sites leading to `file`, innermost importer first.
    pub chain: Vec<ImportSite>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} : {}",
            self.file, self.line, self.severity, self.message
        )?;
        for site in &self.chain {
            write!(f, "\n{}:{}: imported here", site.file, site.line)?;
        }
        Ok(())
    }
}

/// Destination for diagnostics and other user-facing messages.
pub trait Sink {
    /// Emits one message. Multi-line messages are emitted as one unit.
    fn emit(&mut self, text: &str);
}

impl<W: Write> Sink for W {
    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self, "{text}") {
            tracing::warn!(error = %e, "failed to write message");
        }
    }
}

/// Formats a count with its unit: `no files`, `1 file`, `3 files`.
pub fn plural(count: usize, unit: &str) -> String {
    match count {
        0 => format!("no {unit}s"),
        1 => format!("1 {unit}"),
        n => format!("{n} {unit}s"),
    }
}
