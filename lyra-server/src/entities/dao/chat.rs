use chrono::{DateTime, Utc};
use strum::{Display, EnumString};

/// Author of a [`ChatMessage`].
///
/// The assistant is stored and serialized as `"lyra"`, the name the web
/// client renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Sender {
    #[strum(serialize = "user")]
    User,
    #[strum(serialize = "lyra")]
    Assistant,
}

/// A single entry of the conversation history.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
