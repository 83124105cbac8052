pub mod chat;
pub mod memory;

pub use chat::{ChatMessage, Sender};
pub use memory::MemoryItem;
