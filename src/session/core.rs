//! Event handlers that drive the session state machine. Each handler
//! takes the session context and the raw input value so the state
//! machine stays testable without a terminal attached.
use crate::core::AppConfig;
use crate::openai::{ChatError, Message, Role, completion, list_models};

use super::models::Session;

/// Holds the remote-call settings so the handlers only need the
/// session and the input value.
pub struct Controller {
    api_hostname: String,
    model: String,
    system_message: String,
    max_tokens: u32,
}

impl Controller {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api_hostname: config.api_hostname.clone(),
            model: config.model.clone(),
            system_message: config.system_message.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// Stores a submitted key and probes the provider to check that
    /// it works. Whitespace-only input is ignored. A failed probe is
    /// recorded as `api_key_valid == false` rather than returned, so
    /// the caller surfaces it by re-prompting.
    pub async fn submit_api_key(&self, session: &mut Session, raw_key: &str) {
        let key = raw_key.trim();
        if key.is_empty() {
            return;
        }

        session.api_key = key.to_string();
        session.api_key_entered = true;

        match list_models(&self.api_hostname, key).await {
            Ok(()) => session.api_key_valid = true,
            Err(err) => {
                tracing::warn!("API key probe failed: {}", err);
                session.api_key_valid = false;
            }
        }
    }

    /// Appends a user turn and the provider's reply to the
    /// transcript. No-op when the input is empty or no valid key is
    /// held. A completion failure lands in the transcript as an
    /// assistant-authored error string so the session stays usable.
    pub async fn submit_message(&self, session: &mut Session, text: &str) {
        if text.trim().is_empty() || !session.api_key_valid {
            return;
        }

        session.transcript.push(Message::new(Role::User, text));

        // Each turn sends a fresh two-message prompt: the system
        // message plus the current user input.
        let prompt = [
            Message::new(Role::System, &self.system_message),
            Message::new(Role::User, text),
        ];
        let reply = match completion(
            &prompt,
            &self.api_hostname,
            &session.api_key,
            &self.model,
            self.max_tokens,
        )
        .await
        {
            Ok(reply) => reply,
            Err(err) => {
                if let ChatError::Api { status, .. } = &err {
                    tracing::warn!("Completion call failed with status {}", status);
                }
                format!("Error: {}", err)
            }
        };
        session.transcript.push(Message::new(Role::Assistant, &reply));
    }

    /// Clears the held key so the next input is a key submission. The
    /// transcript survives the key change.
    pub fn change_api_key(&self, session: &mut Session) {
        session.api_key.clear();
        session.api_key_entered = false;
        session.api_key_valid = false;
    }
}
