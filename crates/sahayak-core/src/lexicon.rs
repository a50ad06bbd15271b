//! Category lexicon and keyword classifier
//!
//! The lexicon is an ordered table of (category, keywords). Classification is
//! case-insensitive substring matching, scanning categories in registration
//! order and returning the first hit. Several keywords are ambiguous across
//! categories ("pension", "loan", "welfare"); the fixed scan order is the
//! documented tie-break, not an accident — see `classify`.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::Category;

/// Ordered keyword table used by the classifier
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// (category, lowercase keywords) in registration/priority order
    entries: Vec<(Category, Vec<String>)>,
}

/// On-disk lexicon shape: an ordered array of tables so the file preserves
/// priority order. Other top-level keys (e.g. the categories section of a
/// combined knowledge pack) are ignored here.
#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    lexicon: Vec<LexiconFileEntry>,
}

#[derive(Debug, Deserialize)]
struct LexiconFileEntry {
    category: String,
    keywords: Vec<String>,
}

impl Lexicon {
    /// Build from explicit entries, normalizing keywords to lowercase.
    /// Entry order is the classification priority order.
    pub fn new(entries: Vec<(Category, Vec<String>)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(category, keywords)| {
                let keywords = keywords
                    .into_iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (category, keywords)
            })
            .collect();
        Self { entries }
    }

    /// Load a lexicon from a TOML string.
    ///
    /// Format (array order = priority order):
    ///
    /// ```toml
    /// [[lexicon]]
    /// category = "student"
    /// keywords = ["student", "scholarship"]
    ///
    /// [[lexicon]]
    /// category = "farmer"
    /// keywords = ["farmer", "agri"]
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Self::from_toml_str_opt(input)?.ok_or_else(|| {
            Error::KnowledgePack("lexicon file has no [[lexicon]] entries".to_string())
        })
    }

    /// Like `from_toml_str`, but a file without a `[[lexicon]]` section is
    /// Ok(None) rather than an error (callers fall back to the built-in
    /// table).
    pub fn from_toml_str_opt(input: &str) -> Result<Option<Self>> {
        let file: LexiconFile =
            toml::from_str(input).map_err(|e| Error::KnowledgePack(e.to_string()))?;

        if file.lexicon.is_empty() {
            return Ok(None);
        }

        let mut entries = Vec::with_capacity(file.lexicon.len());
        for entry in file.lexicon {
            let category = Category::from_str(&entry.category).map_err(Error::KnowledgePack)?;
            if entries.iter().any(|(c, _)| *c == category) {
                return Err(Error::KnowledgePack(format!(
                    "lexicon lists category '{}' more than once",
                    category
                )));
            }
            entries.push((category, entry.keywords));
        }

        Ok(Some(Self::new(entries)))
    }

    /// Load a lexicon from a TOML file
    pub fn from_toml_path(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    /// Classify free text into a category.
    ///
    /// Case-folds the text, then scans categories in registration order; the
    /// first category with any keyword occurring as a substring wins. Returns
    /// None when nothing matches. Pure function: no side effects, no failure
    /// modes.
    pub fn classify(&self, text: &str) -> Option<Category> {
        let text = text.to_lowercase();
        for (category, keywords) in &self.entries {
            if keywords.iter().any(|k| text.contains(k.as_str())) {
                return Some(*category);
            }
        }
        None
    }

    /// Keywords registered for a category, if any
    pub fn keywords(&self, category: Category) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, keywords)| keywords.as_slice())
    }

    /// Categories in registration order
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The built-in keyword table, in its original registration order
    pub fn builtin() -> Self {
        fn keys(keywords: &[&str]) -> Vec<String> {
            keywords.iter().map(|k| k.to_string()).collect()
        }

        Self::new(vec![
            (
                Category::Student,
                keys(&["student", "students", "scholarship", "education", "study"]),
            ),
            (
                Category::Farmer,
                keys(&["farmer", "farmers", "agri", "agriculture", "pmkisan"]),
            ),
            (Category::Women, keys(&["woman", "women", "mahila"])),
            (
                Category::SeniorCitizen,
                keys(&["senior", "senior citizen", "old", "pension"]),
            ),
            (
                Category::JobSeeker,
                keys(&["job", "job seeker", "unemployment", "placement"]),
            ),
            (
                Category::Entrepreneur,
                keys(&["entrepreneur", "startup", "business"]),
            ),
            (
                Category::Healthcare,
                keys(&["health", "healthcare", "hospital", "ayushman"]),
            ),
            (
                Category::Housing,
                keys(&["house", "housing", "awas", "home"]),
            ),
            (
                Category::LoanFinance,
                keys(&["loan", "finance", "mudra", "msme"]),
            ),
            (Category::Shg, keys(&["shg", "self help", "self-help"])),
            (Category::Minority, keys(&["minority", "minorities"])),
            (Category::Youth, keys(&["youth", "young"])),
            (Category::Disability, keys(&["disability", "disabled"])),
            (
                Category::RationWelfare,
                keys(&["ration", "welfare", "anapurna", "ration card"]),
            ),
        ])
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}
