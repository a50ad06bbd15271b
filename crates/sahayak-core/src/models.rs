//! Domain models for Sahayak

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A citizen category that welfare schemes are grouped under.
///
/// The declaration order here is the registration order: it is the priority
/// order the classifier scans categories in, and the first category whose
/// keyword matches always wins. Reordering variants changes observable
/// classification behavior for ambiguous messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "student")]
    Student,
    #[serde(rename = "farmer")]
    Farmer,
    #[serde(rename = "women")]
    Women,
    #[serde(rename = "senior citizen")]
    SeniorCitizen,
    #[serde(rename = "job seeker")]
    JobSeeker,
    #[serde(rename = "entrepreneur")]
    Entrepreneur,
    #[serde(rename = "healthcare")]
    Healthcare,
    #[serde(rename = "housing")]
    Housing,
    #[serde(rename = "loan finance")]
    LoanFinance,
    #[serde(rename = "shg")]
    Shg,
    #[serde(rename = "minority")]
    Minority,
    #[serde(rename = "youth")]
    Youth,
    #[serde(rename = "disability")]
    Disability,
    #[serde(rename = "ration welfare")]
    RationWelfare,
}

impl Category {
    /// All categories in registration order.
    pub const ALL: [Category; 14] = [
        Self::Student,
        Self::Farmer,
        Self::Women,
        Self::SeniorCitizen,
        Self::JobSeeker,
        Self::Entrepreneur,
        Self::Healthcare,
        Self::Housing,
        Self::LoanFinance,
        Self::Shg,
        Self::Minority,
        Self::Youth,
        Self::Disability,
        Self::RationWelfare,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Farmer => "farmer",
            Self::Women => "women",
            Self::SeniorCitizen => "senior citizen",
            Self::JobSeeker => "job seeker",
            Self::Entrepreneur => "entrepreneur",
            Self::Healthcare => "healthcare",
            Self::Housing => "housing",
            Self::LoanFinance => "loan finance",
            Self::Shg => "shg",
            Self::Minority => "minority",
            Self::Youth => "youth",
            Self::Disability => "disability",
            Self::RationWelfare => "ration welfare",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Accept "_" and "-" as word separators so URL path segments parse too.
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "student" => Ok(Self::Student),
            "farmer" => Ok(Self::Farmer),
            "women" => Ok(Self::Women),
            "senior citizen" => Ok(Self::SeniorCitizen),
            "job seeker" => Ok(Self::JobSeeker),
            "entrepreneur" => Ok(Self::Entrepreneur),
            "healthcare" => Ok(Self::Healthcare),
            "housing" => Ok(Self::Housing),
            "loan finance" => Ok(Self::LoanFinance),
            "shg" => Ok(Self::Shg),
            "minority" => Ok(Self::Minority),
            "youth" => Ok(Self::Youth),
            "disability" => Ok(Self::Disability),
            "ration welfare" => Ok(Self::RationWelfare),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scheme facts for one category.
///
/// Immutable once loaded; shared read-only across all sessions. The order of
/// `schemes` and `alerts` is the display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemeRecord {
    /// Scheme names, in display order
    pub schemes: Vec<String>,
    /// Benefit amount description
    #[serde(default)]
    pub amount: String,
    /// How to apply
    #[serde(default)]
    pub apply: String,
    /// Deadline / date information
    #[serde(default)]
    pub date: String,
    /// Current alerts for this category, in display order
    #[serde(default)]
    pub alerts: Vec<String>,
}

/// Supported interface languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Te,
    Hi,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Te => "te",
            Self::Hi => "hi",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "te" => Ok(Self::Te),
            "hi" => Ok(Self::Hi),
            _ => Err(format!("Unsupported language: {}", s)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub signup_date: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// A new user to register (before DB insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Plain-text password; hashed with argon2 before it reaches the database
    pub password: String,
}

/// One login of a user, closed at logout
#[derive(Debug, Clone, Serialize)]
pub struct LoginRecord {
    pub id: i64,
    pub user_id: i64,
    pub login_time: DateTime<Utc>,
    pub logout_time: Option<DateTime<Utc>>,
    pub ip: Option<String>,
}

/// One processed chat exchange, as stored in the append-only log
#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    pub id: i64,
    /// Owning user; None for anonymous sessions
    pub user_id: Option<i64>,
    pub question: String,
    pub reply: String,
    /// Category the exchange resolved to, if any
    pub category: Option<Category>,
    pub timestamp: DateTime<Utc>,
}

/// A new exchange to append to the log
#[derive(Debug, Clone)]
pub struct NewExchange {
    pub user_id: Option<i64>,
    pub question: String,
    pub reply: String,
    pub category: Option<Category>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for cat in Category::ALL {
            let parsed: Category = cat.as_str().parse().unwrap();
            assert_eq!(parsed, cat);
        }
    }

    #[test]
    fn test_category_parse_separators() {
        assert_eq!(
            "senior_citizen".parse::<Category>().unwrap(),
            Category::SeniorCitizen
        );
        assert_eq!(
            "ration-welfare".parse::<Category>().unwrap(),
            Category::RationWelfare
        );
        assert_eq!("  Student ".parse::<Category>().unwrap(), Category::Student);
        assert!("astronaut".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_json_uses_original_names() {
        let json = serde_json::to_string(&Category::SeniorCitizen).unwrap();
        assert_eq!(json, "\"senior citizen\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::SeniorCitizen);
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("te".parse::<Language>().unwrap(), Language::Te);
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::default(), Language::En);
    }
}
