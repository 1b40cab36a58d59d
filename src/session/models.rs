//! The core models for a stateful two-phase chat session.
use crate::openai::Message;

/// Append-only log of the messages exchanged during a session.
/// Entries are pushed in user/assistant pairs and never mutated.
#[derive(Default)]
pub struct Transcript(Vec<Message>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn messages(&self) -> Vec<Message> {
        self.0.clone()
    }

    pub fn push(&mut self, msg: Message) {
        self.0.push(msg)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The two states a session can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No usable key is held so the next input is a key submission.
    AwaitingKey,
    /// A probed key is held and inputs are chat turns.
    Chatting,
}

/// All state visible across one continuous run of the client. Created
/// empty at startup, mutated only by the [`Controller`], dropped at
/// exit. Nothing persists across runs.
///
/// [`Controller`]: super::Controller
#[derive(Default)]
pub struct Session {
    pub(crate) api_key: String,
    pub(crate) api_key_entered: bool,
    pub(crate) api_key_valid: bool,
    pub(crate) transcript: Transcript,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// True once a key has been submitted at least once. Says nothing
    /// about whether the key works, see `api_key_valid`.
    pub fn api_key_entered(&self) -> bool {
        self.api_key_entered
    }

    /// Meaningful only when `api_key_entered` is true.
    pub fn api_key_valid(&self) -> bool {
        self.api_key_valid
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// A key that failed its probe reads as `AwaitingKey` so the
    /// caller re-prompts.
    pub fn phase(&self) -> Phase {
        if self.api_key_entered && self.api_key_valid {
            Phase::Chatting
        } else {
            Phase::AwaitingKey
        }
    }
}
