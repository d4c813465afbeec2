use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid constructor parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("size must be > 0")]
    ZeroSize,

    #[error("size {size} exceeds the maximum of {max} bits")]
    SizeTooLarge { size: f64, max: usize },

    #[error("num_hashes must be > 0")]
    ZeroHashes,

    #[error("expected number of items must be > 0")]
    ZeroItems,

    #[error("precision {precision} is outside the supported range [{min}, {max}]")]
    PrecisionOutOfRange { precision: u8, min: u8, max: u8 },

    #[error("probability must be in the range (0, 1), got {0}")]
    InvalidProbability(f64),

    #[error("error rate must be in the range (0, 1), got {0}")]
    InvalidErrorRate(f64),
}

/// Rejected membership filter input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("filter only accepts text items")]
    NotText,

    #[error("item contains unexpected characters: {}", format_chars(.chars))]
    InvalidCharacters { chars: BTreeSet<char> },
}

fn format_chars(chars: &BTreeSet<char>) -> String {
    let quoted: Vec<String> = chars.iter().map(|c| format!("{c:?}")).collect();
    format!("{{{}}}", quoted.join(", "))
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("could not read log file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
