//! Loading the text that gets encoded.
use crate::error::{TextReadSnafu, TsvReadSnafu};
use crate::Result;
use snafu::ResultExt;
use std::path::{Path, PathBuf};
use tracing::*;

/// A text to encode, along with where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceText {
    pub path: PathBuf,
    pub text: String,
}

/// Read a whole file as text.
///
/// The file might or might not be valid UTF-8.  Rather than fail, invalid bytes are replaced with
/// the Unicode replacement char, and a warning is logged since the text will no longer match the
/// file byte for byte.
pub fn load_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let contents = std::fs::read(path).with_context(|_| TextReadSnafu { path })?;

    let text = match String::from_utf8(contents) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(),
                "Input file did not decode as clean UTF-8.   \
                Invalid bytes have been replaced with a UTF-8 placeholder sequence.   \
                The coded text will not be able to reproduce this file exactly");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    Ok(text)
}

/// Load each file in a comma separated list of paths, keeping the texts separate.
pub fn load_texts(paths: &str) -> Result<Vec<SourceText>> {
    paths
        .split(',')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(|path| -> Result<SourceText> {
            let path = PathBuf::from(path);
            let text = load_text(&path)?;
            Ok(SourceText { path, text })
        })
        .collect()
}

/// Read a tab separated file and join the last field of every row into one text, separated by
/// single spaces.  Empty rows are ignored.
pub fn load_tsv_column(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|_| TsvReadSnafu { path })?;

    let mut fields = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|_| TsvReadSnafu { path })?;
        if let Some(last) = record.iter().last() {
            fields.push(last.to_string());
        }
    }
    debug!(path = %path.display(), rows = fields.len(), "Loaded TSV column");

    Ok(fields.join(" "))
}
