//! Model gateway
//!
//! The boundary between local conversation state and the hosted model.
//! Every provider failure is turned into a value here; nothing past this
//! point has to handle a transport error.

use crate::llm::{Credential, LlmError, LlmRequest, LlmService};
use crate::session::{last_user_turn, ApiValidity, Turn};
use std::sync::Arc;
use thiserror::Error;

/// Text sent to probe the credential, and when there is no user turn to send
const PROBE_PROMPT: &str = "Hello";

/// Keeps the credential probe cheap
const PROBE_MAX_TOKENS: u32 = 16;

/// Why a reply could not be produced
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("Gemini client not initialized")]
    NotConfigured,
    #[error(transparent)]
    Provider(#[from] LlmError),
    #[error("Model returned an empty reply")]
    EmptyReply,
}

pub struct ModelGateway {
    credential: Option<Credential>,
    service: Arc<dyn LlmService>,
}

impl ModelGateway {
    pub fn new(credential: Option<Credential>, service: Arc<dyn LlmService>) -> Self {
        Self {
            credential,
            service,
        }
    }

    pub fn model_id(&self) -> &str {
        self.service.model_id()
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Check the credential with one minimal request.
    ///
    /// Without a credential this returns `Invalid` and makes no call.
    pub async fn validate_credential(&self) -> ApiValidity {
        if self.credential.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; model calls disabled");
            return ApiValidity::Invalid;
        }

        let probe = LlmRequest::prompt(PROBE_PROMPT).with_max_tokens(PROBE_MAX_TOKENS);
        match self.service.complete(&probe).await {
            Ok(_) => {
                tracing::info!(model = %self.model_id(), "API key validated");
                ApiValidity::Valid
            }
            Err(e) => {
                tracing::warn!(
                    model = %self.model_id(),
                    kind = ?e.kind,
                    error = %e.message,
                    "API key validation failed"
                );
                ApiValidity::Invalid
            }
        }
    }

    /// Ask the model for a reply to the conversation.
    ///
    /// Only the latest user turn is transmitted; earlier turns are not part
    /// of the request.
    pub async fn generate_reply(&self, history: &[Turn]) -> Result<String, ReplyError> {
        if self.credential.is_none() {
            return Err(ReplyError::NotConfigured);
        }

        let prompt = last_user_turn(history).map_or(PROBE_PROMPT, |t| t.content.as_str());

        let response = self.service.complete(&LlmRequest::prompt(prompt)).await?;
        if response.text.trim().is_empty() {
            return Err(ReplyError::EmptyReply);
        }
        Ok(response.text)
    }
}
