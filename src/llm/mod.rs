#[cfg(feature = "openrouter")]
pub mod client;
pub mod narrator;
pub mod prompts;
pub mod types;

#[cfg(feature = "openrouter")]
pub use client::*;
pub use narrator::*;
pub use prompts::{apply_language, build_prompts, Language, PromptKind};
pub use types::*;
