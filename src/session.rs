//! Per-session conversation state
//!
//! A session holds the ordered chat history and the cached API readiness
//! flag. It lives only in process memory.

mod store;

#[cfg(test)]
mod proptests;

pub use store::{SessionHandle, SessionStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Most recent user turn in `history`, if any
pub fn last_user_turn(history: &[Turn]) -> Option<&Turn> {
    history.iter().rev().find(|t| t.role == Role::User)
}

/// Whether the configured credential is usable.
///
/// `Valid` and `Invalid` are sticky until [`Session::reset_validity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiValidity {
    #[default]
    Unknown,
    Valid,
    Invalid,
}

impl ApiValidity {
    pub fn is_resolved(self) -> bool {
        !matches!(self, ApiValidity::Unknown)
    }
}

/// State of one interactive session
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    history: Vec<Turn>,
    api_validity: ApiValidity,
    started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            history: Vec::new(),
            api_validity: ApiValidity::Unknown,
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn api_validity(&self) -> ApiValidity {
        self.api_validity
    }

    pub fn append(&mut self, turn: Turn) {
        self.history.push(turn);
    }

    /// Drop every turn. The validity flag is left alone.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Forget the cached validity so the next read re-checks the credential
    pub fn reset_validity(&mut self) {
        self.api_validity = ApiValidity::Unknown;
    }

    /// Record the outcome of a credential check.
    ///
    /// Only applies while the flag is `Unknown`; returns whether it changed.
    pub fn record_validity(&mut self, validity: ApiValidity) -> bool {
        if self.api_validity.is_resolved() || !validity.is_resolved() {
            return false;
        }
        self.api_validity = validity;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty_and_unknown() {
        let session = Session::new("s1");
        assert_eq!(session.id(), "s1");
        assert!(session.is_empty());
        assert_eq!(session.api_validity(), ApiValidity::Unknown);
        assert!(last_user_turn(session.history()).is_none());
    }

    #[test]
    fn test_clear_keeps_validity() {
        let mut session = Session::new("s1");
        session.record_validity(ApiValidity::Valid);
        session.append(Turn::user("hi"));
        session.clear();
        assert!(session.is_empty());
        assert_eq!(session.api_validity(), ApiValidity::Valid);
    }

    #[test]
    fn test_record_validity_only_from_unknown() {
        let mut session = Session::new("s1");
        assert!(!session.record_validity(ApiValidity::Unknown));
        assert!(session.record_validity(ApiValidity::Invalid));
        assert!(!session.record_validity(ApiValidity::Valid));
        assert_eq!(session.api_validity(), ApiValidity::Invalid);

        session.reset_validity();
        assert_eq!(session.api_validity(), ApiValidity::Unknown);
        assert!(session.record_validity(ApiValidity::Valid));
        assert_eq!(session.api_validity(), ApiValidity::Valid);
    }

    #[test]
    fn test_last_user_turn_skips_assistant() {
        let mut session = Session::new("s1");
        session.append(Turn::user("first"));
        session.append(Turn::assistant("reply"));
        session.append(Turn::user("second"));
        session.append(Turn::assistant("reply 2"));
        assert_eq!(last_user_turn(session.history()).unwrap().content, "second");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Assistant).unwrap(), "assistant");
        assert_eq!(serde_json::to_value(ApiValidity::Invalid).unwrap(), "invalid");
    }
}
