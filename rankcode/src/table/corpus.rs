//! Reading the corpus frequency list the rank table is built from.
//!
//! The expected format is the one used by the public unigram frequency lists: a CSV file with a
//! `word,count` header followed by one row per word, most frequent word first.  The order of the
//! rows is what matters to the table builder; the counts are kept only so they can be reported.
use crate::error::{CorpusReadSnafu, MalformedCorpusRowSnafu};
use crate::Result;
use snafu::ResultExt;
use std::io::Read;
use std::path::Path;
use tracing::*;

/// One row of the corpus frequency list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorpusEntry {
    pub word: String,
    pub count: u64,
}

impl CorpusEntry {
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

impl<S: Into<String>> From<(S, u64)> for CorpusEntry {
    fn from((word, count): (S, u64)) -> Self {
        Self::new(word, count)
    }
}

/// Load the corpus frequency list from a CSV file on the filesystem.
///
/// Fails with [`crate::RankcodeError::CorpusRead`] if the file is missing or unreadable, and with
/// [`crate::RankcodeError::MalformedCorpusRow`] at the first row that isn't a `word,count` pair.
/// A malformed row fails the whole load rather than being skipped, so a damaged corpus never
/// silently produces a different table.
pub fn read_corpus(path: impl AsRef<Path>) -> Result<Vec<CorpusEntry>> {
    let path = path.as_ref();

    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|_| CorpusReadSnafu { path })?;

    let entries = parse_records(reader, path)?;
    debug!(path = %path.display(), rows = entries.len(), "Loaded corpus frequency list");

    Ok(entries)
}

/// Parse a corpus frequency list from any reader, with the same rules as [`read_corpus`].
pub fn parse_corpus(input: impl Read) -> Result<Vec<CorpusEntry>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    parse_records(reader, Path::new("<reader>"))
}

fn parse_records<R: Read>(mut reader: csv::Reader<R>, path: &Path) -> Result<Vec<CorpusEntry>> {
    let mut entries = Vec::new();

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                if let csv::ErrorKind::Utf8 { pos, err } = e.kind() {
                    return MalformedCorpusRowSnafu {
                        line: pos.as_ref().map(|p| p.line()).unwrap_or(2),
                        reason: format!("field {} is not valid UTF-8", err.field() + 1),
                    }
                    .fail();
                }
                return Err(e).context(CorpusReadSnafu { path });
            }
        };
        // The header is line 1, so a record without position info is at least on line 2
        let line = record.position().map(|p| p.line()).unwrap_or(2);

        if record.len() != 2 {
            return MalformedCorpusRowSnafu {
                line,
                reason: format!("expected 2 fields, found {}", record.len()),
            }
            .fail();
        }

        let word = &record[0];
        let count = record[1].trim().parse::<u64>().map_err(|e| {
            MalformedCorpusRowSnafu {
                line,
                reason: format!("count `{}` is not a non-negative integer: {e}", &record[1]),
            }
            .build()
        })?;

        entries.push(CorpusEntry::new(word, count));
    }

    Ok(entries)
}
