use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RankcodeError {
    #[snafu(display("Unable to read corpus frequency list '{}'", path.display()))]
    CorpusRead { path: PathBuf, source: csv::Error },

    #[snafu(display("Corpus row {line} is not a valid 'word,count' pair: {reason}"))]
    MalformedCorpusRow { line: u64, reason: String },

    #[snafu(display("Seed word '{word}' appears more than once in the seed list"))]
    DuplicateSeedWord { word: String },

    #[snafu(display(
        "Invalid spacing markers: lowercase width {lower} and capital width {capital} \
        (lowercase must be at least 1, capital at least lowercase + 2, and neither more than 16)"
    ))]
    InvalidMarkerWidths { lower: usize, capital: usize },

    #[snafu(display("File I/O error on text file '{}'", path.display()))]
    TextRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to read TSV file '{}'", path.display()))]
    TsvRead { path: PathBuf, source: csv::Error },

    #[snafu(display("File I/O error on config file '{}'", path.display()))]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Config file '{}' is not valid JSON for this tool", path.display()))]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
