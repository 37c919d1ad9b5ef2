//! Chat controller
//!
//! Drives one user interaction against a session: lazy credential check,
//! then submit → reply (or fallback) → append.

use crate::gateway::ModelGateway;
use crate::session::{ApiValidity, Session, Turn};

/// Assistant text appended when the model could not answer
pub const FALLBACK_REPLY: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

/// Result of a submission, beyond what was appended to the history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Inline error annotation shown next to the fallback reply
    pub error: Option<String>,
}

/// Return the session's API validity, checking the credential if needed.
///
/// Calls the gateway at most once, and only while the flag is `Unknown`.
pub async fn resolve_validity(session: &mut Session, gateway: &ModelGateway) -> ApiValidity {
    if !session.api_validity().is_resolved() {
        let validity = gateway.validate_credential().await;
        session.record_validity(validity);
    }
    session.api_validity()
}

/// Append the user's text and the model's reply to the session.
///
/// Never fails: on any gateway error the fallback reply is appended so the
/// history stays user/assistant alternating.
pub async fn submit(session: &mut Session, gateway: &ModelGateway, text: &str) -> SubmitOutcome {
    session.append(Turn::user(text));

    match gateway.generate_reply(session.history()).await {
        Ok(reply) => {
            session.append(Turn::assistant(reply));
            SubmitOutcome::default()
        }
        Err(e) => {
            tracing::error!(session_id = %session.id(), error = %e, "Error getting AI response");
            session.append(Turn::assistant(FALLBACK_REPLY));
            SubmitOutcome {
                error: Some(format!("Error getting AI response: {e}")),
            }
        }
    }
}
