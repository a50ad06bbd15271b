//! Static knowledge base of scheme facts per category
//!
//! Loaded once at process start and shared read-only across all sessions.
//! The built-in dataset covers all fourteen categories; operators can replace
//! it with a TOML knowledge pack (see `from_toml_str` for the format).

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::lexicon::Lexicon;
use crate::models::{Category, SchemeRecord};

/// Read-only mapping from category to scheme facts
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    records: HashMap<Category, SchemeRecord>,
}

/// On-disk knowledge pack shape: a `[categories.<name>]` table per category.
/// Other top-level keys (e.g. the lexicon section) are ignored here.
#[derive(Debug, Deserialize)]
struct KnowledgePackFile {
    #[serde(default)]
    categories: HashMap<String, SchemeRecord>,
}

impl KnowledgeBase {
    /// Build from explicit records
    pub fn new(records: HashMap<Category, SchemeRecord>) -> Self {
        Self { records }
    }

    /// Load a knowledge pack from a TOML string.
    ///
    /// Format:
    ///
    /// ```toml
    /// [categories.student]
    /// schemes = ["Post-Matric Scholarship"]
    /// amount = "Rs 10,000 yearly."
    /// apply = "Apply via the scholarship portal."
    /// date = "June - October."
    /// alerts = ["Verification window opens 1 Aug."]
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let file: KnowledgePackFile =
            toml::from_str(input).map_err(|e| Error::KnowledgePack(e.to_string()))?;

        let mut records = HashMap::new();
        for (name, record) in file.categories {
            let category = Category::from_str(&name).map_err(Error::KnowledgePack)?;
            records.insert(category, record);
        }

        if records.is_empty() {
            return Err(Error::KnowledgePack(
                "knowledge pack has no [categories.*] tables".to_string(),
            ));
        }

        Ok(Self::new(records))
    }

    /// Load a knowledge pack from a TOML file
    pub fn from_toml_path(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    /// Look up the scheme facts for a category.
    ///
    /// A missing entry is an expected condition (the dialogue manager degrades
    /// to a "no data" reply), never an error.
    pub fn get(&self, category: Category) -> Option<&SchemeRecord> {
        self.records.get(&category)
    }

    /// Categories present in the knowledge base
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.records.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check the startup invariant against a lexicon: every category the
    /// lexicon can classify to must have a knowledge-base entry. The reverse
    /// (a KB entry no keyword reaches) only degrades reachability, so it is
    /// reported at warn level rather than failing startup.
    pub fn validate_against(&self, lexicon: &Lexicon) -> Result<()> {
        for category in lexicon.categories() {
            if !self.records.contains_key(&category) {
                return Err(Error::KnowledgePack(format!(
                    "lexicon category '{}' has no knowledge-base entry",
                    category
                )));
            }
        }

        for category in self.categories() {
            if lexicon.keywords(category).is_none() {
                warn!(
                    category = %category,
                    "knowledge-base entry is unreachable: no keywords registered for it"
                );
            }
        }

        Ok(())
    }

    /// The built-in scheme dataset
    pub fn builtin() -> Self {
        fn record(
            schemes: &[&str],
            amount: &str,
            apply: &str,
            date: &str,
            alerts: &[&str],
        ) -> SchemeRecord {
            SchemeRecord {
                schemes: schemes.iter().map(|s| s.to_string()).collect(),
                amount: amount.to_string(),
                apply: apply.to_string(),
                date: date.to_string(),
                alerts: alerts.iter().map(|s| s.to_string()).collect(),
            }
        }

        let mut records = HashMap::new();

        records.insert(
            Category::Student,
            record(
                &[
                    "Jagananna Vidya Deevena – 100% fee reimbursement",
                    "Vasathi Deevena – hostel & food support",
                    "Post-Matric Scholarship",
                    "National Scholarship Portal (NSP)",
                ],
                "₹10,000 – ₹20,000 yearly depending on the course.",
                "Apply via Jnanabhumi or NSP portals.",
                "June – October every year.",
                &[
                    "🎓 NSP verification window opens on 1 Aug.",
                    "⚠️ Last date for some scholarship verification: 30 Sep.",
                ],
            ),
        );

        records.insert(
            Category::Farmer,
            record(
                &[
                    "PM Kisan – ₹6,000 yearly",
                    "Rythu Bharosa",
                    "PM Fasal Bima Yojana",
                    "Soil Health Card",
                ],
                "PM Kisan gives ₹6,000 per year. Other schemes vary.",
                "Apply at Rythu Bharosa center or online.",
                "PM Kisan renewal is continuous; insurance deadlines vary.",
                &[
                    "⚠️ Last date to apply for PM-Kisan 16th installment: 30 Nov.",
                    "🌾 Rythu Bharosa new enrollment starts 5 Dec at district centers.",
                ],
            ),
        );

        records.insert(
            Category::Women,
            record(
                &[
                    "YSR Cheyutha – financial support",
                    "Mahila Samakhya",
                    "Stand-Up India Loans",
                    "Women SHG Loans",
                ],
                "₹75,000 over 4 years in some programs.",
                "Apply via ward/village secretariat.",
                "Active year-round.",
                &["📢 Women SHG bank linkage drives next week."],
            ),
        );

        records.insert(
            Category::SeniorCitizen,
            record(
                &[
                    "Old Age Pension",
                    "Senior Citizen Health Insurance",
                    "Free Bus Pass",
                ],
                "₹2,000 monthly pension (varies by scheme).",
                "Apply via MeeSeva or Navasakam.",
                "Monthly pension cycles.",
                &["🕘 Pension disbursement for this month scheduled on 1st."],
            ),
        );

        records.insert(
            Category::JobSeeker,
            record(
                &[
                    "YSR Unemployment Allowance",
                    "Skill Development Training",
                    "PM Kaushal Vikas Yojana",
                ],
                "₹1,000 – ₹3,000 monthly for some allowances.",
                "Apply via Skill Development portal.",
                "Batches start every few months.",
                &["📢 New skill training batch opening next month."],
            ),
        );

        records.insert(
            Category::Entrepreneur,
            record(
                &[
                    "PMEGP loan",
                    "Mudra Loan",
                    "Stand-Up India",
                    "Startup India Seed Fund",
                ],
                "Subsidies vary; loans up to several lakhs.",
                "Apply on respective portals.",
                "Ongoing.",
                &["🚀 Startup seed fund applications: rolling basis."],
            ),
        );

        records.insert(
            Category::Healthcare,
            record(
                &["Aarogyasri", "Free Medicine Scheme", "Ayushman Bharat"],
                "Coverage up to ₹5 lakh for eligible families.",
                "Apply via health department portals.",
                "Available year-round.",
                &["🏥 Free medical camp in your district on 12 Dec."],
            ),
        );

        records.insert(
            Category::Housing,
            record(
                &["PM Awas Yojana", "YSR Housing", "Urban Housing Subsidy"],
                "Subsidies up to ₹2.5 lakhs (scheme dependent).",
                "Apply via housing portal or local secretariat.",
                "Allotments annually.",
                &["🏠 New housing allotment list to be released next month."],
            ),
        );

        records.insert(
            Category::LoanFinance,
            record(
                &["Mudra Loan", "PM Jan Dhan", "MSME Support"],
                "Loans from ₹10,000 to ₹10 lakhs.",
                "Apply at bank or online.",
                "Monthly approvals.",
                &["🏦 Special MSME refinance window open this quarter."],
            ),
        );

        records.insert(
            Category::Shg,
            record(
                &["SHG Bank Linkage", "Interest Free Loans", "Livelihood Support"],
                "₹10,000 – ₹3,00,000 depending on program.",
                "Apply via SERP/DRDA.",
                "Periodic disbursal.",
                &["👥 SHG bank linkage meeting next week."],
            ),
        );

        records.insert(
            Category::Minority,
            record(
                &["Minority Scholarship", "Skill Training", "Housing Support"],
                "₹5,000 – ₹25,000 scholarship ranges.",
                "Apply via Minority Welfare portal.",
                "Scholarship cycle July – Dec.",
                &["🕌 Minority scholarship application opens 1 July."],
            ),
        );

        records.insert(
            Category::Youth,
            record(
                &[
                    "Skill India Training",
                    "Youth Empowerment Program",
                    "YSR Job Mela",
                ],
                "Training often free; some include stipends.",
                "Apply on Skill India portal.",
                "Monthly batches.",
                &["🎯 Youth job mela scheduled on 20th this month."],
            ),
        );

        records.insert(
            Category::Disability,
            record(
                &[
                    "Disability Pension",
                    "Assistive Devices Scheme",
                    "Free Health Support",
                ],
                "₹3,000 monthly (varies).",
                "Apply via MeeSeva/Navasakam.",
                "Monthly approvals.",
                &["♿ New assistive devices distribution on 10th Dec."],
            ),
        );

        records.insert(
            Category::RationWelfare,
            record(
                &["Ration Card Subsidy", "Free Rice", "Annapurna Scheme"],
                "Rice at subsidized rates (e.g., ₹1/kg for eligible families).",
                "Apply at MeeSeva or Ration Office.",
                "Monthly distribution.",
                &["🍚 Ration distribution day announced for district X."],
            ),
        );

        Self::new(records)
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_category() {
        let kb = KnowledgeBase::builtin();
        for cat in Category::ALL {
            let record = kb.get(cat).unwrap_or_else(|| panic!("missing {}", cat));
            assert!(!record.schemes.is_empty(), "{} has no schemes", cat);
            assert!(!record.amount.is_empty(), "{} has no amount text", cat);
        }
        assert_eq!(kb.len(), Category::ALL.len());
    }

    #[test]
    fn test_builtin_student_record() {
        let kb = KnowledgeBase::builtin();
        let student = kb.get(Category::Student).unwrap();
        assert_eq!(student.schemes.len(), 4);
        assert_eq!(student.schemes[2], "Post-Matric Scholarship");
        assert_eq!(
            student.amount,
            "₹10,000 – ₹20,000 yearly depending on the course."
        );
    }

    #[test]
    fn test_validate_against_builtin_lexicon() {
        let kb = KnowledgeBase::builtin();
        let lexicon = Lexicon::builtin();
        kb.validate_against(&lexicon).unwrap();
    }

    #[test]
    fn test_validate_rejects_missing_entry() {
        let mut records = HashMap::new();
        records.insert(Category::Student, SchemeRecord::default());
        let kb = KnowledgeBase::new(records);
        let lexicon = Lexicon::builtin();

        let err = kb.validate_against(&lexicon).unwrap_err();
        assert!(matches!(err, Error::KnowledgePack(_)));
    }

    #[test]
    fn test_from_toml_str() {
        let pack = r#"
            [categories.student]
            schemes = ["Some Scholarship"]
            amount = "Rs 5,000 yearly."
            apply = "Apply online."
            date = "July."
            alerts = ["Window open."]

            [categories."senior citizen"]
            schemes = ["Old Age Pension"]
            amount = "Rs 2,000 monthly."
        "#;

        let kb = KnowledgeBase::from_toml_str(pack).unwrap();
        assert_eq!(kb.len(), 2);
        assert_eq!(
            kb.get(Category::Student).unwrap().schemes,
            vec!["Some Scholarship"]
        );
        // Omitted fields default to empty
        let senior = kb.get(Category::SeniorCitizen).unwrap();
        assert!(senior.apply.is_empty());
        assert!(senior.alerts.is_empty());
    }

    #[test]
    fn test_from_toml_str_rejects_unknown_category() {
        let pack = r#"
            [categories.astronaut]
            schemes = ["Moon Grant"]
        "#;
        assert!(KnowledgeBase::from_toml_str(pack).is_err());
    }

    #[test]
    fn test_from_toml_str_rejects_empty_pack() {
        assert!(KnowledgeBase::from_toml_str("").is_err());
    }
}
