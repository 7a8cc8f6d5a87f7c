use crate::error::DuplicateSeedWordSnafu;
use crate::rank::Rank;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use strum::{EnumIter, EnumString, EnumVariantNames};
use tracing::*;

mod corpus;
mod hash;

pub use corpus::{parse_corpus, read_corpus, CorpusEntry};
pub use hash::{WordDecoder, WordEncoder};

/// The rule used to keep short words from claiming the cheapest ranks.
///
/// One and two letter words are the most frequent words in any corpus, but replacing a one letter
/// word with a one or two digit code plus its spacing marker makes the text longer, not shorter.
/// Both policies defer short words until enough longer words have taken the low ranks.  They
/// produce different tables and are not interchangeable.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    EnumString,
    EnumIter,
    EnumVariantNames,
    strum::Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SkipPolicy {
    /// A word of length `L` (1 to 5 chars) is skipped until `10^L` words have been accepted.
    #[default]
    Quota,

    /// A word is skipped while its length is less than `log10` of the number of accepted words.
    Logarithmic,

    /// Every word is accepted in corpus order.
    Disabled,
}

impl SkipPolicy {
    /// Quota thresholds, indexed by word length - 1.
    const QUOTAS: [usize; 5] = [10, 100, 1_000, 10_000, 100_000];

    /// Decide whether `word` should be skipped when `added` corpus words have already been
    /// accepted into the table.
    pub fn skips(&self, word: &str, added: usize) -> bool {
        let len = word.chars().count();

        match self {
            SkipPolicy::Quota => match len.checked_sub(1).and_then(|i| Self::QUOTAS.get(i)) {
                Some(quota) => added < *quota,
                None => false,
            },
            SkipPolicy::Logarithmic => (len as f64) < (added as f64).log10(),
            SkipPolicy::Disabled => false,
        }
    }
}

#[derive(Debug)]
struct RankMaps {
    /// Lowercase words to ranks, used when encoding
    forward: WordEncoder,

    /// Ranks back to words, used when decoding
    reverse: WordDecoder,
}

/// The bidirectional mapping between vocabulary words and their ranks.
///
/// A table is immutable once built.  It is cheap to clone and safe to share between threads, so a
/// single table can serve any number of concurrent encode and decode calls.
#[derive(Clone, Debug)]
pub struct RankTable {
    maps: Arc<RankMaps>,
}

impl RankTable {
    /// Make a table directly from word/rank pairs.
    ///
    /// The caller is responsible for the pairs being a one-to-one mapping; use
    /// [`RankTableBuilder`] to derive a table from a corpus.
    pub fn from_ranked_words<Iter, Word>(items: Iter) -> Self
    where
        Iter: IntoIterator<Item = (Word, Rank)>,
        Word: Into<String>,
    {
        let forward = WordEncoder::new(items);
        let reverse = forward.invert();
        debug_assert_eq!(forward.len(), reverse.len(), "BUG: ranks are not unique");

        Self {
            maps: Arc::new(RankMaps { forward, reverse }),
        }
    }

    pub fn rank_for_word(&self, word: &str) -> Option<Rank> {
        self.maps.forward.rank_for_word(word)
    }

    pub fn word_for_rank(&self, rank: Rank) -> Option<&str> {
        self.maps.reverse.word_for_rank(rank)
    }

    pub fn forward(&self) -> &WordEncoder {
        &self.maps.forward
    }

    pub fn reverse(&self) -> &WordDecoder {
        &self.maps.reverse
    }

    pub fn len(&self) -> usize {
        self.maps.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.forward.is_empty()
    }

    /// All words in the table, ordered by rank.
    pub fn ranked_words(&self) -> Vec<(Rank, &str)> {
        let mut words = self
            .maps
            .forward
            .entries()
            .map(|(word, rank)| (rank, word))
            .collect::<Vec<_>>();
        words.sort_unstable();
        words
    }
}

/// Builds a [`RankTable`] of a requested size from a corpus frequency list.
///
/// Seed words are ranked first, in the order given.  The remaining ranks go to corpus words in
/// corpus order, subject to the [`SkipPolicy`].
#[derive(Clone, Debug, Default)]
pub struct RankTableBuilder {
    seed_words: Vec<String>,
    skip_policy: SkipPolicy,
}

impl RankTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Words that take ranks `0..n` ahead of anything from the corpus.
    pub fn seed_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seed_words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn skip_policy(mut self, skip_policy: SkipPolicy) -> Self {
        self.skip_policy = skip_policy;
        self
    }

    /// Build a table holding at most `target_size` words from an already-parsed corpus.
    ///
    /// If there are more seed words than `target_size`, all of the seeds are kept and nothing is
    /// taken from the corpus.
    pub fn build<I, E>(&self, corpus: I, target_size: usize) -> Result<RankTable>
    where
        I: IntoIterator<Item = E>,
        E: Into<CorpusEntry>,
    {
        let mut ranked: Vec<(String, Rank)> = Vec::new();
        let mut seen = hash::HashMap::<String, Rank>::default();

        for (rank, word) in self.seed_words.iter().enumerate() {
            let word = word.to_lowercase();
            if seen.insert(word.clone(), rank).is_some() {
                return DuplicateSeedWordSnafu { word }.fail();
            }
            ranked.push((word, rank));
        }

        let first_corpus_rank = ranked.len();
        let limit = target_size.saturating_sub(first_corpus_rank);
        let mut added = 0usize;
        let mut skipped = 0usize;

        for entry in corpus {
            if added >= limit {
                break;
            }

            let entry: CorpusEntry = entry.into();
            let word = entry.word.to_lowercase();
            if word.is_empty() || seen.contains_key(&word) {
                continue;
            }
            if self.skip_policy.skips(&word, added) {
                skipped += 1;
                continue;
            }

            let rank = first_corpus_rank + added;
            seen.insert(word.clone(), rank);
            ranked.push((word, rank));
            added += 1;
        }

        debug!(
            target_size,
            seeds = first_corpus_rank,
            added,
            skipped,
            skip_policy = %self.skip_policy,
            "Built rank table"
        );

        Ok(RankTable::from_ranked_words(ranked))
    }

    /// Read the corpus frequency list at `path` and build a table from it.
    pub fn build_from_file(&self, path: impl AsRef<Path>, target_size: usize) -> Result<RankTable> {
        let corpus = read_corpus(path)?;
        self.build(corpus, target_size)
    }
}
