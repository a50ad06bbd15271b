//! Follow-up intent resolution
//!
//! When a message names no category, it may still be a follow-up question
//! about the category discussed on an earlier turn ("how much", "how to
//! apply", "last date"). Resolution checks the intent keyword sets in fixed
//! order; the first set with a hit wins.

/// Keywords that ask about the benefit amount (checked first)
const AMOUNT_KEYWORDS: &[&str] = &["amount", "how much"];

/// Keywords that ask about the application process
const APPLY_KEYWORDS: &[&str] = &["apply", "how to apply"];

/// Keywords that ask about deadlines (checked last)
const DATE_KEYWORDS: &[&str] = &["date", "last date", "deadline"];

/// A request for one facet of the most recently discussed category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpIntent {
    /// Benefit amount
    Amount,
    /// Application process
    Apply,
    /// Deadline / date information
    Date,
    /// No follow-up keyword present
    Unknown,
}

impl FollowUpIntent {
    /// Resolve free text into a follow-up intent.
    ///
    /// Case-folds the text, then checks Amount, Apply, and Date keyword sets
    /// in that order with substring matching. Pure function, no side effects.
    pub fn resolve(text: &str) -> Self {
        let text = text.to_lowercase();

        if AMOUNT_KEYWORDS.iter().any(|k| text.contains(k)) {
            return Self::Amount;
        }
        if APPLY_KEYWORDS.iter().any(|k| text.contains(k)) {
            return Self::Apply;
        }
        if DATE_KEYWORDS.iter().any(|k| text.contains(k)) {
            return Self::Date;
        }

        Self::Unknown
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Apply => "apply",
            Self::Date => "date",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FollowUpIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
