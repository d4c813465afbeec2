//! Access log input: reading files of unknown encoding and pulling client
//! addresses out of their lines.

pub mod ip;

use std::fmt::{Display, Formatter};
use std::path::Path;

use tracing::info;

use crate::error::LogError;

pub use ip::extract_ip;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// ISO-8859-1; every byte decodes, so this is the last resort.
    Latin1,
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Encoding::Utf8 => f.write_str("utf-8"),
            Encoding::Latin1 => f.write_str("latin-1"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub lines: Vec<String>,
    pub encoding: Encoding,
}

/// Reads every line of `path`, falling back to Latin-1 when the file is not
/// valid UTF-8.
pub fn read_log_file(path: impl AsRef<Path>) -> Result<LogFile, LogError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let log = decode(bytes);
    info!(
        path = %path.display(),
        lines = log.lines.len(),
        encoding = %log.encoding,
        "read log file"
    );
    Ok(log)
}

/// Splits raw log contents into lines, keeping line terminators out.
pub fn decode(bytes: Vec<u8>) -> LogFile {
    let (text, encoding) = match String::from_utf8(bytes) {
        Ok(text) => (text, Encoding::Utf8),
        Err(err) => {
            let text: String = err.into_bytes().into_iter().map(char::from).collect();
            (text, Encoding::Latin1)
        }
    };
    LogFile {
        lines: text.lines().map(str::to_owned).collect(),
        encoding,
    }
}
