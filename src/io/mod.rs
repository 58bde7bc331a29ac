//! File formats consumed and produced around the breaking core.
//!
//! Readers take any `BufRead` and writers any `Write`, so the command-line
//! front end and the tests share the same code paths.

mod fasta;
mod gff;
mod paf;
mod report;

pub use fasta::{read_fasta, write_fasta};
pub use gff::{read_gff, render_gff, write_gff, GffDocument};
pub use paf::read_paf;
pub use report::{render_breaks, write_breaks};

use thiserror::Error;

use crate::ChimeraError;

/// Errors raised while reading or writing the supported formats.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Underlying read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be parsed.
    #[error("{format} line {line}: {message}")]
    Parse {
        /// Format being parsed.
        format: &'static str,
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Parsed records are inconsistent with each other.
    #[error("inconsistent alignments: {0}")]
    Alignment(#[from] ChimeraError),
}

impl FormatError {
    pub(crate) fn parse(format: &'static str, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            message: message.into(),
        }
    }
}
