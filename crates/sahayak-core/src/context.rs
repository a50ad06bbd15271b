//! Per-session conversation context
//!
//! One cell per active session: the most recently resolved category. It is
//! set on every successful classification, consulted (never cleared) when a
//! follow-up intent arrives, and dropped with the session. The context is an
//! explicit value passed into the dialogue manager, so the dialogue logic is
//! testable without a web session around it.

use crate::models::Category;

/// Conversational memory for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversationContext {
    /// The category most recently resolved for this session
    pub last_category: Option<Category>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a freshly classified category
    pub fn remember(&mut self, category: Category) {
        self.last_category = Some(category);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        assert_eq!(ConversationContext::new().last_category, None);
    }

    #[test]
    fn test_remember_overwrites() {
        let mut ctx = ConversationContext::new();
        ctx.remember(Category::Student);
        assert_eq!(ctx.last_category, Some(Category::Student));
        ctx.remember(Category::Farmer);
        assert_eq!(ctx.last_category, Some(Category::Farmer));
    }
}
