//! Typed analysis result.

use std::fmt;
use std::str::FromStr;

/// One of the two verdict labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Pembe,
    Kara,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Pembe, Category::Kara];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pembe => "PEMBE",
            Self::Kara => "KARA",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Confidence score, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Confidence(u8);

impl Confidence {
    pub const MAX: u8 = 100;

    /// Clamp any model-reported value into range.
    pub fn clamped(raw: i64) -> Self {
        Self(raw.clamp(0, Self::MAX as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// A fully decoded verdict. Only [`crate::decode`] constructs these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub category: Category,
    pub confidence: Confidence,
    /// Descriptive sub-fields as `(observation, text)`, in answer order.
    pub details: Vec<(String, String)>,
    pub rationale: String,
}

impl AnalysisResult {
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_ignores_case() {
        assert_eq!("pembe".parse::<Category>().unwrap(), Category::Pembe);
        assert_eq!(" Kara ".parse::<Category>().unwrap(), Category::Kara);
        assert!("MAVI".parse::<Category>().is_err());
    }

    #[test]
    fn confidence_clamps_to_bounds() {
        assert_eq!(Confidence::clamped(-5).value(), 0);
        assert_eq!(Confidence::clamped(150).value(), 100);
        assert_eq!(Confidence::clamped(42).value(), 42);
        assert_eq!(Confidence::clamped(42).to_string(), "%42");
    }
}
