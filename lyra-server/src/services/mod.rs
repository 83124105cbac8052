//! Request-independent application logic shared by the HTTP handlers.

pub mod chat;
pub mod ids;
pub mod memory;
pub mod responder;
pub mod skills;

pub use chat::ChatService;
pub use ids::IdGenerator;
pub use memory::{MemoryCatalog, NewMemory};
pub use responder::Responder;
