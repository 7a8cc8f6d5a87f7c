//! The hash maps behind the rank table.  Every substituted word costs one forward lookup during
//! encoding and every rank code one reverse lookup during decoding, so the choice of hasher
//! matters more than anything else in the table.
//!
//! This is isolated to this module to make it easier to experiment with different impls.
use crate::rank::{Rank, RankWord};

pub use rustc_hash::FxHashMap as HashMap;

/// Encoders maintain the mapping from lowercase words to the ranks assigned to them in the
/// vocabulary.
#[derive(Clone, Debug, Default)]
pub struct WordEncoder(HashMap<RankWord, Rank>);

/// Decoders maintain the reverse mapping, from a rank back to the word it stands for.
#[derive(Clone, Debug, Default)]
pub struct WordDecoder(HashMap<Rank, RankWord>);

impl WordEncoder {
    pub fn new<Iter, Word>(items: Iter) -> Self
    where
        Iter: IntoIterator<Item = (Word, Rank)>,
        Word: Into<RankWord>,
    {
        Self(
            items
                .into_iter()
                .map(|(word, rank)| (word.into(), rank))
                .collect(),
        )
    }

    pub fn rank_for_word(&self, word: &str) -> Option<Rank> {
        self.0.get(word).copied()
    }

    /// Invert the lookup table so the keys become the values, which is another way of describing a
    /// decoder
    pub fn invert(&self) -> WordDecoder {
        WordDecoder(
            self.0
                .iter()
                .map(|(word, rank)| (*rank, word.clone()))
                .collect(),
        )
    }

    /// All of the word/rank pairs, in no particular order
    pub fn entries(&self) -> impl Iterator<Item = (&str, Rank)> {
        self.0.iter().map(|(word, rank)| (word.as_str(), *rank))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl WordDecoder {
    pub fn word_for_rank(&self, rank: Rank) -> Option<&str> {
        self.0.get(&rank).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_swaps_keys_and_values() {
        let encoder = WordEncoder::new([("the", 0), ("people", 1)]);
        let decoder = encoder.invert();

        assert_eq!(2, decoder.len());
        assert_eq!(Some("the"), decoder.word_for_rank(0));
        assert_eq!(Some("people"), decoder.word_for_rank(1));
        assert_eq!(None, decoder.word_for_rank(2));
    }

    #[test]
    fn lookups_are_exact() {
        let encoder = WordEncoder::new([("the", 0)]);

        assert_eq!(Some(0), encoder.rank_for_word("the"));
        assert_eq!(None, encoder.rank_for_word("The"));
        assert_eq!(None, encoder.rank_for_word(""));
    }
}
