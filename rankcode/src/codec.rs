//! The rank code transform itself.
//!
//! Encoding replaces each word found in the rank table with its rank, written as decimal digits
//! behind a run of spaces.  The length of that run is the only signal the decoder has: it says
//! that the digits are a rank code rather than literal text, whether the word was capitalized,
//! and whether a separating space came before the word.
//!
//! With `W` the lowercase marker width and `C` the capital marker width, a run of `k` spaces
//! followed by ASCII digits means:
//!
//! | `k`           | meaning                                                 |
//! |---------------|---------------------------------------------------------|
//! | `W`           | lowercase word                                          |
//! | `W + 1`       | separator, then lowercase word                          |
//! | `C`           | capitalized word                                        |
//! | `C + 1`       | separator, then capitalized word                        |
//! | `>= C + 2`    | `k - C - 1` literal spaces, then literal digits         |
//! | anything else | literal text                                            |
//!
//! `C >= W + 2` keeps the classes apart.  The encoder only writes runs that land in the class it
//! means, which is what makes the transform invertible.
use crate::error::InvalidMarkerWidthsSnafu;
use crate::rank::Rank;
use crate::split::{self, Word};
use crate::table::{WordDecoder, WordEncoder};
use crate::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// A run of spaces immediately followed by a run of ASCII digits.  Matching always starts at the
/// first space of a run, so the whole run is captured.
static CODE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"( +)([0-9]+)").expect("BUG: Invalid regex"));

/// Tunable parameters of the coded text format.
///
/// Encoder and decoder must agree on these; text encoded with one configuration will not decode
/// correctly with another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Spaces in front of the rank code of a word that doesn't start with an uppercase letter.
    ///
    /// Older coded text used two spaces here, which needs `capital_marker_width` of 4 or more.
    pub lower_marker_width: usize,

    /// Spaces in front of the rank code of a word that starts with an uppercase letter.
    pub capital_marker_width: usize,

    /// Only replace words whose case can be restored exactly (all lowercase, or only the first
    /// letter uppercase).  Other words are kept as literal text.
    pub strict_case: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            lower_marker_width: 1,
            capital_marker_width: 3,
            strict_case: false,
        }
    }
}

impl CodecConfig {
    /// Widest marker accepted; wider ones would make every code longer than the word it replaces.
    pub const MAX_MARKER_WIDTH: usize = 16;

    /// Check that the marker widths can be told apart by the decoder.
    pub fn validate(&self) -> Result<()> {
        let lower = self.lower_marker_width;
        let capital = self.capital_marker_width;

        if lower == 0
            || capital > Self::MAX_MARKER_WIDTH
            || lower > Self::MAX_MARKER_WIDTH
            || capital < lower + 2
        {
            return InvalidMarkerWidthsSnafu { lower, capital }.fail();
        }

        Ok(())
    }

    /// Extra spaces written in front of a literal number that would otherwise read as a rank code.
    fn escape_width(&self) -> usize {
        self.capital_marker_width + 1
    }

    fn classify_run(&self, len: usize) -> SpaceRun {
        let lower = self.lower_marker_width;
        let capital = self.capital_marker_width;

        if len == lower || len == lower + 1 {
            SpaceRun::Lowercase { lead: len - lower }
        } else if len == capital || len == capital + 1 {
            SpaceRun::Capital {
                lead: len - capital,
            }
        } else if len >= self.escape_width() + 1 {
            SpaceRun::Escaped {
                lead: len - self.escape_width(),
            }
        } else {
            SpaceRun::Literal
        }
    }
}

/// How the decoder reads a run of spaces that is followed by digits.  `lead` is the number of
/// literal spaces that come before the word or number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SpaceRun {
    Lowercase { lead: usize },
    Capital { lead: usize },
    Escaped { lead: usize },
    Literal,
}

/// Word counts from a single encode call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Words that were replaced by a rank code
    pub words_replaced: usize,

    /// Space-delimited tokens in the normalized input, including empty ones
    pub total_words: usize,
}

/// The result of encoding a text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodeOutput {
    pub coded: String,
    pub stats: Stats,
}

pub(crate) fn encode(text: &str, forward: &WordEncoder, config: &CodecConfig) -> EncodeOutput {
    let text = split::normalize_spacing(text);
    let mut coded = String::with_capacity(text.len());
    let mut stats = Stats::default();

    for (index, token) in split::tokens(&text).enumerate() {
        stats.total_words += 1;
        if index > 0 {
            coded.push(' ');
        }

        let run = trailing_spaces(&coded);
        let word = split::split_word(token);

        match substitute(&word, run, forward, config) {
            Some(rank) => {
                stats.words_replaced += 1;

                let width = if split::starts_with_capital(word.core) {
                    config.capital_marker_width
                } else {
                    config.lower_marker_width
                };

                coded.push_str(word.prefix);
                push_spaces(&mut coded, width);
                // Writing into a String can't fail
                let _ = write!(coded, "{rank}");
                coded.push_str(word.suffix);
            }
            None => {
                let starts_with_digit = token.starts_with(|c: char| c.is_ascii_digit());
                if starts_with_digit && config.classify_run(run) != SpaceRun::Literal {
                    push_spaces(&mut coded, config.escape_width());
                }
                coded.push_str(token);
            }
        }
    }

    EncodeOutput { coded, stats }
}

/// Decide whether the core of `word` is replaced by a rank code, and if so by which one.
///
/// `run` is the number of spaces already at the end of the output.  A marker written after more
/// than the one separator space would be read as a different marker, so in that case the word is
/// kept literal.
fn substitute(
    word: &Word<'_>,
    run: usize,
    forward: &WordEncoder,
    config: &CodecConfig,
) -> Option<Rank> {
    if word.core.is_empty() {
        return None;
    }

    let run_before_marker = if word.prefix.is_empty() { run } else { 0 };
    if run_before_marker > 1 {
        return None;
    }

    if config.strict_case && !split::is_case_regular(word.core) {
        return None;
    }

    forward.rank_for_word(&word.core.to_lowercase())
}

pub(crate) fn decode(coded: &str, reverse: &WordDecoder, config: &CodecConfig) -> String {
    let mut decoded = String::with_capacity(coded.len() * 2);
    let mut last = 0;

    for caps in CODE_RUN.captures_iter(coded) {
        let (Some(whole), Some(spaces), Some(digits)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };

        decoded.push_str(&coded[last..whole.start()]);
        last = whole.end();

        let digits = digits.as_str();
        let word = || {
            digits
                .parse::<Rank>()
                .ok()
                .and_then(|rank| reverse.word_for_rank(rank))
        };

        match (config.classify_run(spaces.len()), word()) {
            (SpaceRun::Lowercase { lead }, Some(word)) => {
                push_spaces(&mut decoded, lead);
                decoded.push_str(word);
            }
            (SpaceRun::Capital { lead }, Some(word)) => {
                push_spaces(&mut decoded, lead);
                decoded.push_str(&split::capitalize(word));
            }
            (SpaceRun::Escaped { lead }, _) => {
                push_spaces(&mut decoded, lead);
                decoded.push_str(digits);
            }
            // Unknown ranks and runs no encoder writes are passed through untouched
            _ => decoded.push_str(whole.as_str()),
        }
    }

    decoded.push_str(&coded[last..]);
    decoded
}

fn trailing_spaces(text: &str) -> usize {
    text.len() - text.trim_end_matches(' ').len()
}

fn push_spaces(out: &mut String, count: usize) {
    out.extend(std::iter::repeat(' ').take(count));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RankcodeError;
    use assert_matches::assert_matches;
    use expect_test::expect;

    fn forward() -> WordEncoder {
        WordEncoder::new([("the", 0), ("a", 1), ("dog", 2), ("people", 3), ("42", 4)])
    }

    fn round_trip(text: &str, config: &CodecConfig) -> (EncodeOutput, String) {
        let forward = forward();
        let encoded = encode(text, &forward, config);
        let decoded = decode(&encoded.coded, &forward.invert(), config);
        (encoded, decoded)
    }

    #[test]
    fn the_dog_ran() {
        let (encoded, decoded) = round_trip("The dog ran.", &CodecConfig::default());

        expect![["\"   0  2 ran.\""]].assert_eq(&format!("{:?}", encoded.coded));
        assert_eq!(
            Stats {
                words_replaced: 2,
                total_words: 3
            },
            encoded.stats
        );
        assert_eq!("The dog ran.", decoded);
    }

    #[test]
    fn empty_text() {
        let config = CodecConfig::default();
        let forward = forward();

        assert_eq!(EncodeOutput::default(), encode("", &forward, &config));
        assert_eq!("", decode("", &forward.invert(), &config));
    }

    #[test]
    fn punctuation_stays_outside_the_marker() {
        let (encoded, decoded) =
            round_trip("\"Dog,\" said the people...", &CodecConfig::default());

        expect![["\"\\\"   2,\\\" said  0  3...\""]].assert_eq(&format!("{:?}", encoded.coded));
        assert_eq!("\"Dog,\" said the people...", decoded);
    }

    #[test]
    fn punctuation_only_tokens_are_not_looked_up() {
        let (encoded, decoded) = round_trip("dog - dog", &CodecConfig::default());

        assert_eq!(2, encoded.stats.words_replaced);
        assert_eq!(3, encoded.stats.total_words);
        assert_eq!("dog - dog", decoded);
    }

    #[test]
    fn capital_after_separator() {
        let (encoded, decoded) = round_trip("the The", &CodecConfig::default());

        assert_eq!(" 0    0", encoded.coded);
        assert_eq!("the The", decoded);
    }

    #[test]
    fn literal_numbers_are_escaped() {
        // `2` is also the rank of "dog", so the literal needs the escape
        let (encoded, decoded) = round_trip("a 2 dog", &CodecConfig::default());

        assert_eq!(" 1     2  2", encoded.coded);
        assert_eq!("a 2 dog", decoded);
    }

    #[test]
    fn leading_number_needs_no_escape() {
        let (encoded, decoded) = round_trip("7 people", &CodecConfig::default());

        assert_eq!("7  3", encoded.coded);
        assert_eq!("7 people", decoded);
    }

    #[test]
    fn numbers_in_the_table_are_replaced() {
        let (encoded, decoded) = round_trip("Room 42", &CodecConfig::default());

        assert_eq!("Room  4", encoded.coded);
        assert_eq!("Room 42", decoded);
    }

    #[test]
    fn numbers_after_punctuation_are_left_alone() {
        let (encoded, decoded) = round_trip("(2) $3 a", &CodecConfig::default());

        assert_eq!("(2) $3  1", encoded.coded);
        assert_eq!("(2) $3 a", decoded);
    }

    #[test]
    fn no_substitution_after_empty_token() {
        let config = CodecConfig::default();
        let (encoded, decoded) = round_trip("x   dog", &config);

        // Three spaces normalize to two, leaving an empty token in front of "dog"
        assert_eq!(3, encoded.stats.total_words);
        assert_eq!(0, encoded.stats.words_replaced);
        assert_eq!("x  dog", decoded);
    }

    #[test]
    fn numbers_after_empty_token() {
        let (encoded, decoded) = round_trip("x   2", &CodecConfig::default());

        assert_eq!("x      2", encoded.coded);
        assert_eq!("x  2", decoded);
    }

    #[test]
    fn all_caps_keeps_one_case_bit() {
        let (encoded, decoded) = round_trip("THE DOG", &CodecConfig::default());

        assert_eq!(2, encoded.stats.words_replaced);
        assert_eq!("The Dog", decoded);
    }

    #[test]
    fn strict_case_keeps_irregular_words_literal() {
        let config = CodecConfig {
            strict_case: true,
            ..Default::default()
        };
        let (encoded, decoded) = round_trip("THE Dog", &config);

        assert_eq!(1, encoded.stats.words_replaced);
        assert_eq!("THE    2", encoded.coded);
        assert_eq!("THE Dog", decoded);
    }

    #[test]
    fn legacy_lowercase_width() {
        let config = CodecConfig {
            lower_marker_width: 2,
            capital_marker_width: 4,
            ..Default::default()
        };
        let (encoded, decoded) = round_trip("The dog 2 ran", &config);

        assert_eq!("    0   2 2 ran", encoded.coded);
        assert_eq!("The dog 2 ran", decoded);
    }

    #[test]
    fn unknown_ranks_pass_through() {
        let config = CodecConfig::default();
        let reverse = forward().invert();

        assert_eq!("a 99 b", decode("a 99 b", &reverse, &config));
        assert_eq!(
            "x 99999999999999999999999",
            decode("x 99999999999999999999999", &reverse, &config)
        );
    }

    #[test]
    fn decode_leaves_plain_text_alone() {
        let config = CodecConfig::default();
        let reverse = forward().invert();
        let text = "Nothing here looks like a code: x2, (3), #4.\nNew line.";

        assert_eq!(text, decode(text, &reverse, &config));
    }

    #[test]
    fn marker_widths_are_validated() {
        assert!(CodecConfig::default().validate().is_ok());

        for (lower, capital) in [
            (0, 3),
            (1, 2),
            (2, 3),
            (3, 1),
            (1, CodecConfig::MAX_MARKER_WIDTH + 1),
            (usize::MAX, 5),
            (usize::MAX - 1, usize::MAX),
        ] {
            let config = CodecConfig {
                lower_marker_width: lower,
                capital_marker_width: capital,
                ..Default::default()
            };
            assert_matches!(
                config.validate(),
                Err(RankcodeError::InvalidMarkerWidths { .. })
            );
        }
    }

    #[test]
    fn widest_markers_are_accepted() {
        let config = CodecConfig {
            lower_marker_width: CodecConfig::MAX_MARKER_WIDTH - 2,
            capital_marker_width: CodecConfig::MAX_MARKER_WIDTH,
            ..Default::default()
        };
        config.validate().unwrap();

        let (_, decoded) = round_trip("The dog saw 42 people", &config);
        assert_eq!("The dog saw 42 people", decoded);
    }

    #[test]
    fn run_classes() {
        let config = CodecConfig::default();

        assert_eq!(SpaceRun::Lowercase { lead: 0 }, config.classify_run(1));
        assert_eq!(SpaceRun::Lowercase { lead: 1 }, config.classify_run(2));
        assert_eq!(SpaceRun::Capital { lead: 0 }, config.classify_run(3));
        assert_eq!(SpaceRun::Capital { lead: 1 }, config.classify_run(4));
        assert_eq!(SpaceRun::Escaped { lead: 1 }, config.classify_run(5));
        assert_eq!(SpaceRun::Escaped { lead: 3 }, config.classify_run(7));
        assert_eq!(SpaceRun::Literal, config.classify_run(0));
    }
}
