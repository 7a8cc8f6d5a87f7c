//! Breaks text into the word slots the codec works on.
//!
//! Text is split on single spaces, and each resulting token is then peeled into a leading run of
//! punctuation, the word itself, and a trailing run of punctuation.  This is done with a small
//! explicit scanner rather than a regex so there is no question about how overlapping matches
//! are resolved.
use std::borrow::Cow;

/// A single space-delimited token, split around its word.
///
/// `prefix` and `suffix` contain no word chars.  If the token contains no word chars at all,
/// the whole token is in `prefix` and both `core` and `suffix` are empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Word<'a> {
    pub prefix: &'a str,
    pub core: &'a str,
    pub suffix: &'a str,
}

/// Word chars are Unicode letters and digits plus the underscore.  Everything else is
/// punctuation as far as the codec is concerned.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split a token into prefix, core and suffix.
pub fn split_word(token: &str) -> Word<'_> {
    if !has_boundary_punctuation(token) {
        // Either empty, or both ends are word chars
        return Word {
            prefix: "",
            core: token,
            suffix: "",
        };
    }

    let Some(start) = token.find(is_word_char) else {
        return Word {
            prefix: token,
            core: "",
            suffix: "",
        };
    };

    // There is at least one word char, so the reverse search always finds one
    let end = token
        .char_indices()
        .rev()
        .find(|(_, c)| is_word_char(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(token.len());

    Word {
        prefix: &token[..start],
        core: &token[start..end],
        suffix: &token[end..],
    }
}

/// Whether the token starts or ends with punctuation.
pub fn has_boundary_punctuation(token: &str) -> bool {
    let starts = token.chars().next().is_some_and(|c| !is_word_char(c));
    let ends = token.chars().next_back().is_some_and(|c| !is_word_char(c));

    starts || ends
}

pub fn starts_with_capital(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// Uppercase the first char of `word`, leaving the rest as-is.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A word is case-regular if the single capitalization bit the codec keeps is enough to restore
/// it: either it's all lowercase, or only its first letter is uppercase.
pub fn is_case_regular(word: &str) -> bool {
    let lower = word.to_lowercase();
    word == lower || word == capitalize(&lower)
}

/// Collapse each non-overlapping pair of spaces into a single space, scanning left to right.
///
/// Three spaces become two, four become two, and so on.  Text without double spaces is returned
/// as-is without allocating.
pub fn normalize_spacing(text: &str) -> Cow<'_, str> {
    if text.contains("  ") {
        Cow::Owned(text.replace("  ", " "))
    } else {
        Cow::Borrowed(text)
    }
}

/// Iterate over the space-delimited tokens of `text`.
///
/// Consecutive spaces produce empty tokens, as do leading and trailing spaces.  The empty string
/// has no tokens at all.
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    let mut split = text.split(' ');
    if text.is_empty() {
        // Discard the single empty token `split` would otherwise produce
        split.next();
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(token: &str) -> (&str, &str, &str) {
        let word = split_word(token);
        (word.prefix, word.core, word.suffix)
    }

    #[test]
    fn splits_punctuation_off_both_ends() {
        assert_eq!(("", "ran", "."), parts("ran."));
        assert_eq!(("\"", "Dog", ","), parts("\"Dog,"));
        assert_eq!(("(", "don't", ")..."), parts("(don't)..."));
        assert_eq!(("", "snake_case", ""), parts("snake_case"));
        assert_eq!(("", "42", "%"), parts("42%"));
        assert_eq!(("¿", "Qué", "?"), parts("¿Qué?"));
    }

    #[test]
    fn punctuation_only_token_is_all_prefix() {
        assert_eq!(("...", "", ""), parts("..."));
        assert_eq!(("", "", ""), parts(""));
        assert_eq!(("—", "", ""), parts("—"));
    }

    #[test]
    fn boundary_punctuation() {
        assert!(has_boundary_punctuation("ran."));
        assert!(has_boundary_punctuation("(ran"));
        assert!(!has_boundary_punctuation("don't"));
        assert!(!has_boundary_punctuation(""));
    }

    #[test]
    fn token_without_boundary_punctuation_is_all_core() {
        assert_eq!(("", "don't", ""), parts("don't"));
        assert_eq!(("", "e-mail", ""), parts("e-mail"));
        assert_eq!(("", "x", ""), parts("x"));
    }

    #[test]
    fn capitalization_helpers() {
        assert!(starts_with_capital("The"));
        assert!(starts_with_capital("Élan"));
        assert!(!starts_with_capital("the"));
        assert!(!starts_with_capital("42"));
        assert!(!starts_with_capital(""));

        assert_eq!("The", capitalize("the"));
        assert_eq!("Élan", capitalize("élan"));
        assert_eq!("", capitalize(""));

        assert!(is_case_regular("the"));
        assert!(is_case_regular("The"));
        assert!(is_case_regular("3rd"));
        assert!(!is_case_regular("THE"));
        assert!(!is_case_regular("iPhone"));
    }

    #[test]
    fn spacing_normalization() {
        assert_eq!("a b", normalize_spacing("a  b"));
        assert_eq!("a  b", normalize_spacing("a   b"));
        assert_eq!("a  b", normalize_spacing("a    b"));
        assert!(matches!(normalize_spacing("a b"), Cow::Borrowed(_)));
    }

    #[test]
    fn token_iteration() {
        assert_eq!(0, tokens("").count());
        assert_eq!(vec!["The", "dog", "ran."], tokens("The dog ran.").collect::<Vec<_>>());
        assert_eq!(vec!["a", "", "b"], tokens("a  b").collect::<Vec<_>>());
        assert_eq!(vec!["", "a", ""], tokens(" a ").collect::<Vec<_>>());
        assert_eq!(vec!["line\nbreak"], tokens("line\nbreak").collect::<Vec<_>>());
    }
}
