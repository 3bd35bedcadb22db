//! Chat relay: forwards resident questions to a language model, keeping one
//! conversation per session id. Served by the `chat_relay` binary.

mod prompt;
mod llm;
mod relay;
mod server;

pub use prompt::{FALLBACK_RESPONSE, SYSTEM_PROMPT};
pub use llm::{ChatError, ChatModel, ChatTurn, GeminiClient, Speaker};
pub use relay::ChatRelay;
pub use server::{build_chat_router, run_chat};
