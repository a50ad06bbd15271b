//! Dialogue manager
//!
//! Orchestrates one chat turn: classifier first, then follow-up intent
//! resolution against the session's conversation context, then knowledge-base
//! lookup and reply assembly. Total over strings: every syntactically valid
//! message produces some reply; lookup misses degrade to placeholder text,
//! never an error.

use crate::context::ConversationContext;
use crate::intent::FollowUpIntent;
use crate::kb::KnowledgeBase;
use crate::lexicon::Lexicon;
use crate::models::{Category, SchemeRecord};

/// Reply for a blank or whitespace-only message
const EMPTY_MESSAGE_REPLY: &str = "Please type a question.";

/// Fallback when neither a category nor a follow-up keyword is recognized
const HELP_REPLY: &str = "Sorry, I didn't understand that. Try asking like:\n\
    'Tell me student schemes' or 'How to apply for PM Kisan' or 'Amount for student scholarships'.";

/// Clarification prompts when a follow-up arrives with no remembered category
const CLARIFY_AMOUNT: &str = "Please ask about a category first (e.g., 'student schemes').";
const CLARIFY_APPLY: &str = "Please specify which category you mean (student, farmer, etc.).";
const CLARIFY_DATE: &str = "Please specify which scheme or category you mean.";

/// Placeholders when the remembered category's record lacks the asked fact
const AMOUNT_MISSING: &str = "Amount details not available.";
const APPLY_MISSING: &str = "Apply details not available.";
const DATE_MISSING: &str = "Date information not available.";

/// What a reply is, for callers that need more than the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Scheme listing after a successful classification
    Schemes,
    /// Follow-up answer: benefit amount
    Amount,
    /// Follow-up answer: application process
    Apply,
    /// Follow-up answer: deadline
    Deadline,
    /// Follow-up with no remembered category to apply it to
    Clarify,
    /// Fallback help text
    Help,
    /// Blank message short-circuit; must not touch context or the log
    Empty,
}

/// Outcome of one dialogue turn
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub reply: String,
    /// The category this turn resolved to. On a follow-up turn this is the
    /// contextual category, not a fresh classification.
    pub category: Option<Category>,
    pub kind: ReplyKind,
}

impl ChatReply {
    /// Whether this exchange belongs in the log. Blank-message replies are
    /// excluded; everything else is recorded.
    pub fn should_record(&self) -> bool {
        self.kind != ReplyKind::Empty
    }

    fn new(reply: impl Into<String>, category: Option<Category>, kind: ReplyKind) -> Self {
        Self {
            reply: reply.into(),
            category,
            kind,
        }
    }
}

/// One-turn dialogue engine over a shared knowledge base and lexicon
pub struct DialogueManager<'a> {
    kb: &'a KnowledgeBase,
    lexicon: &'a Lexicon,
}

impl<'a> DialogueManager<'a> {
    pub fn new(kb: &'a KnowledgeBase, lexicon: &'a Lexicon) -> Self {
        Self { kb, lexicon }
    }

    /// Process one message for the session owning `context`.
    ///
    /// Blank messages short-circuit before classification and leave the
    /// context untouched. A classified category is remembered in the context;
    /// a follow-up intent reads (and never clears) it.
    pub fn respond(&self, context: &mut ConversationContext, message: &str) -> ChatReply {
        let message = message.trim();
        if message.is_empty() {
            return ChatReply::new(EMPTY_MESSAGE_REPLY, None, ReplyKind::Empty);
        }

        if let Some(category) = self.lexicon.classify(message) {
            context.remember(category);
            let reply = match self.kb.get(category) {
                Some(record) if !record.schemes.is_empty() => format_schemes(category, record),
                _ => format!("No scheme data available for *{}* yet.", category),
            };
            return ChatReply::new(reply, Some(category), ReplyKind::Schemes);
        }

        match FollowUpIntent::resolve(message) {
            FollowUpIntent::Unknown => ChatReply::new(HELP_REPLY, None, ReplyKind::Help),
            intent => self.answer_follow_up(context, intent),
        }
    }

    fn answer_follow_up(
        &self,
        context: &ConversationContext,
        intent: FollowUpIntent,
    ) -> ChatReply {
        let Some(category) = context.last_category else {
            let prompt = match intent {
                FollowUpIntent::Amount => CLARIFY_AMOUNT,
                FollowUpIntent::Apply => CLARIFY_APPLY,
                _ => CLARIFY_DATE,
            };
            return ChatReply::new(prompt, None, ReplyKind::Clarify);
        };

        let record = self.kb.get(category);
        let (reply, kind) = match intent {
            FollowUpIntent::Amount => (field_or(record, |r| &r.amount, AMOUNT_MISSING), ReplyKind::Amount),
            FollowUpIntent::Apply => (field_or(record, |r| &r.apply, APPLY_MISSING), ReplyKind::Apply),
            _ => (field_or(record, |r| &r.date, DATE_MISSING), ReplyKind::Deadline),
        };

        ChatReply::new(reply, Some(category), kind)
    }
}

/// Bulleted scheme listing in knowledge-base order
fn format_schemes(category: Category, record: &SchemeRecord) -> String {
    format!(
        "Here are schemes for *{}*:\n• {}",
        category,
        record.schemes.join("\n• ")
    )
}

/// A fact string from the record, or the placeholder when the record is
/// absent or the field is blank
fn field_or<'r>(
    record: Option<&'r SchemeRecord>,
    field: impl Fn(&'r SchemeRecord) -> &'r str,
    missing: &str,
) -> String {
    match record.map(field) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => missing.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SchemeRecord;
    use std::collections::HashMap;

    fn manager_parts() -> (KnowledgeBase, Lexicon) {
        (KnowledgeBase::builtin(), Lexicon::builtin())
    }

    #[test]
    fn test_category_message_lists_schemes_in_kb_order() {
        let (kb, lexicon) = manager_parts();
        let manager = DialogueManager::new(&kb, &lexicon);
        let mut ctx = ConversationContext::new();

        let reply = manager.respond(&mut ctx, "student scholarship");

        assert_eq!(reply.category, Some(Category::Student));
        assert_eq!(reply.kind, ReplyKind::Schemes);
        assert_eq!(
            reply.reply,
            "Here are schemes for *student*:\n\
             • Jagananna Vidya Deevena – 100% fee reimbursement\n\
             • Vasathi Deevena – hostel & food support\n\
             • Post-Matric Scholarship\n\
             • National Scholarship Portal (NSP)"
        );
        assert_eq!(ctx.last_category, Some(Category::Student));
    }

    #[test]
    fn test_follow_up_uses_remembered_category() {
        let (kb, lexicon) = manager_parts();
        let manager = DialogueManager::new(&kb, &lexicon);
        let mut ctx = ConversationContext::new();

        manager.respond(&mut ctx, "student scholarship");
        let reply = manager.respond(&mut ctx, "how much");

        assert_eq!(reply.kind, ReplyKind::Amount);
        // The returned category on a follow-up turn is the contextual one.
        assert_eq!(reply.category, Some(Category::Student));
        assert_eq!(
            reply.reply,
            kb.get(Category::Student).unwrap().amount
        );
    }

    #[test]
    fn test_follow_up_apply_and_date() {
        let (kb, lexicon) = manager_parts();
        let manager = DialogueManager::new(&kb, &lexicon);
        let mut ctx = ConversationContext::new();

        manager.respond(&mut ctx, "tell me about farmers");

        let apply = manager.respond(&mut ctx, "how to apply");
        assert_eq!(apply.kind, ReplyKind::Apply);
        assert_eq!(apply.reply, kb.get(Category::Farmer).unwrap().apply);

        let date = manager.respond(&mut ctx, "what is the deadline");
        assert_eq!(date.kind, ReplyKind::Deadline);
        assert_eq!(date.reply, kb.get(Category::Farmer).unwrap().date);
    }

    #[test]
    fn test_follow_up_without_context_clarifies() {
        let (kb, lexicon) = manager_parts();
        let manager = DialogueManager::new(&kb, &lexicon);
        let mut ctx = ConversationContext::new();

        let reply = manager.respond(&mut ctx, "how to apply");

        assert_eq!(reply.kind, ReplyKind::Clarify);
        assert_eq!(reply.category, None);
        assert_eq!(reply.reply, CLARIFY_APPLY);
        // Context stays empty; a clarify turn never invents a category.
        assert_eq!(ctx.last_category, None);
    }

    #[test]
    fn test_clarify_prompts_differ_per_intent() {
        let (kb, lexicon) = manager_parts();
        let manager = DialogueManager::new(&kb, &lexicon);
        let mut ctx = ConversationContext::new();

        assert_eq!(manager.respond(&mut ctx, "how much").reply, CLARIFY_AMOUNT);
        assert_eq!(manager.respond(&mut ctx, "last date").reply, CLARIFY_DATE);
    }

    #[test]
    fn test_nonsense_gets_help_text() {
        let (kb, lexicon) = manager_parts();
        let manager = DialogueManager::new(&kb, &lexicon);
        let mut ctx = ConversationContext::new();

        let reply = manager.respond(&mut ctx, "xyz nonsense");

        assert_eq!(reply.category, None);
        assert_eq!(reply.kind, ReplyKind::Help);
        assert_eq!(reply.reply, HELP_REPLY);
        assert!(reply.should_record());
    }

    #[test]
    fn test_blank_message_short_circuits() {
        let (kb, lexicon) = manager_parts();
        let manager = DialogueManager::new(&kb, &lexicon);
        let mut ctx = ConversationContext::new();
        ctx.remember(Category::Women);

        for message in ["", "   ", "\t\n"] {
            let reply = manager.respond(&mut ctx, message);
            assert_eq!(reply.reply, EMPTY_MESSAGE_REPLY);
            assert_eq!(reply.category, None);
            assert_eq!(reply.kind, ReplyKind::Empty);
            assert!(!reply.should_record());
        }
        // Context untouched by blank turns.
        assert_eq!(ctx.last_category, Some(Category::Women));
    }

    #[test]
    fn test_new_category_overwrites_context() {
        let (kb, lexicon) = manager_parts();
        let manager = DialogueManager::new(&kb, &lexicon);
        let mut ctx = ConversationContext::new();

        manager.respond(&mut ctx, "student schemes");
        manager.respond(&mut ctx, "housing subsidy");
        let reply = manager.respond(&mut ctx, "how much");

        assert_eq!(reply.category, Some(Category::Housing));
        assert_eq!(reply.reply, kb.get(Category::Housing).unwrap().amount);
    }

    #[test]
    fn test_missing_kb_entry_degrades_gracefully() {
        // Lexicon knows student, the KB does not.
        let kb = KnowledgeBase::new(HashMap::new());
        let lexicon = Lexicon::builtin();
        let manager = DialogueManager::new(&kb, &lexicon);
        let mut ctx = ConversationContext::new();

        let reply = manager.respond(&mut ctx, "student schemes");
        assert_eq!(reply.category, Some(Category::Student));
        assert_eq!(reply.reply, "No scheme data available for *student* yet.");

        // Follow-up against the missing record gets the field placeholder.
        let amount = manager.respond(&mut ctx, "how much");
        assert_eq!(amount.reply, AMOUNT_MISSING);
        assert_eq!(amount.category, Some(Category::Student));
    }

    #[test]
    fn test_blank_fact_field_uses_placeholder() {
        let mut records = HashMap::new();
        records.insert(
            Category::Youth,
            SchemeRecord {
                schemes: vec!["Skill India Training".to_string()],
                ..Default::default()
            },
        );
        let kb = KnowledgeBase::new(records);
        let lexicon = Lexicon::builtin();
        let manager = DialogueManager::new(&kb, &lexicon);
        let mut ctx = ConversationContext::new();

        manager.respond(&mut ctx, "youth programs");
        assert_eq!(manager.respond(&mut ctx, "how much").reply, AMOUNT_MISSING);
        assert_eq!(manager.respond(&mut ctx, "how to apply").reply, APPLY_MISSING);
        assert_eq!(manager.respond(&mut ctx, "last date").reply, DATE_MISSING);
    }

    #[test]
    fn test_category_keyword_beats_follow_up_keyword() {
        let (kb, lexicon) = manager_parts();
        let manager = DialogueManager::new(&kb, &lexicon);
        let mut ctx = ConversationContext::new();
        ctx.remember(Category::Farmer);

        // "how to apply for student schemes" names a category, so it is a
        // classification turn, not a follow-up against farmer.
        let reply = manager.respond(&mut ctx, "how to apply for student schemes");
        assert_eq!(reply.category, Some(Category::Student));
        assert_eq!(reply.kind, ReplyKind::Schemes);
    }
}
