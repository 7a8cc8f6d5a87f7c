/// The position of a word in the frequency-ordered vocabulary.  Lower ranks belong to more
/// frequent words, and because a rank is written into the coded text as decimal digits, lower
/// ranks are also cheaper to emit.
///
/// Seed words take ranks `0..seed_count`, corpus words follow in the order they were accepted by
/// the table builder.
pub type Rank = usize;

/// A vocabulary word as stored in the rank table.  Always lowercase; capitalization is carried by
/// the spacing marker in the coded text, not by the table.
pub type RankWord = String;
