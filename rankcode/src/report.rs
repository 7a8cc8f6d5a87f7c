use crate::codec::EncodeOutput;
use std::fmt::Display;

/// How much smaller a text got when it was rank coded.
#[derive(Clone, Debug, PartialEq)]
pub struct SizeReport {
    pub words_replaced: usize,
    pub total_words: usize,

    /// UTF-8 size of the original text
    pub original_bytes: usize,

    /// UTF-8 size of the coded text
    pub coded_bytes: usize,

    /// Whether decoding the coded text gave back the original
    pub round_trip: bool,
}

impl SizeReport {
    pub fn new(original: &str, encoded: &EncodeOutput, decoded: &str) -> Self {
        Self {
            words_replaced: encoded.stats.words_replaced,
            total_words: encoded.stats.total_words,
            original_bytes: original.len(),
            coded_bytes: encoded.coded.len(),
            round_trip: original == decoded,
        }
    }

    pub fn replacement_percent(&self) -> f64 {
        percent(self.words_replaced, self.total_words)
    }

    /// Size reduction relative to the original; negative if the coded text is larger.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            0.0
        } else {
            100.0 - percent(self.coded_bytes, self.original_bytes)
        }
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

impl Display for SizeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "- {} words replaced out of {}. {:.4}% replacement",
            self.words_replaced,
            self.total_words,
            self.replacement_percent()
        )?;
        writeln!(f, "- Original string byte size: {} bytes", self.original_bytes)?;
        write!(
            f,
            "- Compressed string byte size: {} bytes. {:.4}% reduction",
            self.coded_bytes,
            self.reduction_percent()
        )?;
        if !self.round_trip {
            write!(f, "\n- Decoded text does NOT match the original")?;
        }

        Ok(())
    }
}
