use crate::codec::CodecConfig;
use crate::error::{ConfigParseSnafu, ConfigReadSnafu};
use crate::table::{RankTable, RankTableBuilder, SkipPolicy};
use crate::{Codec, Result};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::path::{Path, PathBuf};
use tracing::*;

/// Everything needed to build a rank table and a codec, as read from a JSON config file.
///
/// Every field is optional in the file; missing fields take the defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankcodeConfig {
    /// The corpus frequency list (`word,count` CSV, most frequent first)
    pub corpus: PathBuf,

    /// Words that are ranked ahead of the corpus, in this order
    pub seed_words: Vec<String>,

    /// Number of words in the table used for encoding and decoding
    pub table_size: usize,

    /// Table sizes to try when producing size reports
    pub table_sizes: Vec<usize>,

    pub skip_policy: SkipPolicy,

    pub codec: CodecConfig,
}

impl Default for RankcodeConfig {
    fn default() -> Self {
        Self {
            corpus: PathBuf::from("unigram_freq.csv"),
            seed_words: Vec::new(),
            table_size: 10_000,
            // Round numbers for plain text, powers of two for thinking about a packed binary form
            table_sizes: vec![10, 64, 100, 1_000, 10_000, 16_448, 100_000],
            skip_policy: SkipPolicy::default(),
            codec: CodecConfig::default(),
        }
    }
}

impl RankcodeConfig {
    /// Load a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents =
            std::fs::read_to_string(path).with_context(|_| ConfigReadSnafu { path })?;
        let config: Self =
            serde_json::from_str(&contents).with_context(|_| ConfigParseSnafu { path })?;
        debug!(path = %path.display(), ?config, "Loaded config");

        Ok(config)
    }

    pub fn table_builder(&self) -> RankTableBuilder {
        RankTableBuilder::new()
            .seed_words(self.seed_words.iter().cloned())
            .skip_policy(self.skip_policy)
    }

    /// Read the configured corpus and build a table of `table_size` words.
    pub fn build_table(&self, table_size: usize) -> Result<RankTable> {
        self.table_builder().build_from_file(&self.corpus, table_size)
    }

    /// Build the table of the configured size and wrap it in a codec.
    pub fn build_codec(&self) -> Result<Codec> {
        // Validate first so a bad config doesn't wait for the corpus to load
        self.codec.validate()?;
        let table = self.build_table(self.table_size)?;

        Codec::new(table, self.codec.clone())
    }
}
