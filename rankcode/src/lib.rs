use std::fmt::Debug;
use tracing::*;

mod codec;
mod config;
mod error;
mod rank;
mod report;
mod source;
pub mod split;
mod table;

pub use codec::{CodecConfig, EncodeOutput, Stats};
pub use config::*;
pub use error::*;
pub use rank::*;
pub use report::*;
pub use source::*;
pub use table::*;

pub type Result<T> = std::result::Result<T, RankcodeError>;

/// A rank code text codec bound to a particular [`RankTable`].
///
/// With this codec, it's possible to encode text into its rank-coded form, where every word found
/// in the table is replaced by its rank, and to decode rank-coded text back into the original.
///
/// Instances of `Codec` are light weight and can be very cheaply cloned.  They are also thread
/// safe; a single instance can be used to encode or decode text in multiple threads
/// simultaneously, since nothing about a codec or its table ever changes after construction.
#[derive(Clone)]
pub struct Codec {
    table: RankTable,
    config: CodecConfig,
}

impl Codec {
    /// Create a codec with the given spacing configuration.
    ///
    /// Fails if the marker widths in `config` can't be told apart when decoding.
    pub fn new(table: RankTable, config: CodecConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self { table, config })
    }

    /// Create a codec with the default spacing configuration: one space in front of lowercase
    /// words, three in front of capitalized ones.
    pub fn with_default_config(table: RankTable) -> Self {
        Self {
            table,
            config: CodecConfig::default(),
        }
    }

    pub fn table(&self) -> &RankTable {
        &self.table
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode `text`, replacing every word found in the table with its rank code.
    ///
    /// Runs of two spaces in the input are collapsed to one before anything else happens, so text
    /// containing double spaces will not decode to exactly the same string.  Apart from that, and
    /// from words whose capitalization is neither all lowercase nor first-letter-only (see
    /// [`CodecConfig::strict_case`]), decoding the result gives back `text`.
    ///
    /// This never fails; any string produces some coded output.
    pub fn encode(&self, text: impl AsRef<str>) -> EncodeOutput {
        let output = codec::encode(text.as_ref(), self.table.forward(), &self.config);
        trace!(
            words_replaced = output.stats.words_replaced,
            total_words = output.stats.total_words,
            coded_bytes = output.coded.len(),
            "Encoded text"
        );

        output
    }

    /// Decode rank-coded text back into the text it came from.
    ///
    /// Rank codes that aren't in the table are left in the output exactly as they appear in the
    /// input, as is any text that doesn't look like a rank code.
    pub fn decode(&self, coded: impl AsRef<str>) -> String {
        codec::decode(coded.as_ref(), self.table.reverse(), &self.config)
    }
}

impl Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("words", &self.table.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use crate::CorpusEntry;
    use std::sync::OnceLock;
    use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

    static TRACING: OnceLock<()> = OnceLock::new();

    /// Initialize tracing for tests with a stdout subscriber.
    /// Safe to call multiple times - will only initialize once.
    pub fn init_test_logging() {
        TRACING.get_or_init(|| {
            let filter = std::env::var("RUST_LOG")
                .map(EnvFilter::new)
                .unwrap_or_else(|_| EnvFilter::new("debug"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_span_events(FmtSpan::CLOSE)
                .with_test_writer()
                .try_init()
                .ok();
        });
    }

    /// Make a corpus out of literal `(word, count)` rows.
    pub fn corpus(rows: &[(&str, u64)]) -> Vec<CorpusEntry> {
        rows.iter()
            .map(|(word, count)| CorpusEntry::new(*word, *count))
            .collect()
    }
}
