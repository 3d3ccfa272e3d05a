//! # Gateway Core
//!
//! Core types for the companion gateway.
//!
//! This crate provides the foundational types shared by every other crate:
//! - Provider identifiers
//! - Normalized request and result types
//! - The settings snapshot and the store contract that yields it
//! - The gateway error taxonomy

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod provider;
pub mod request;
pub mod response;
pub mod settings;

// Re-export commonly used types
pub use error::{GatewayError, GatewayResult};
pub use provider::ProviderKind;
pub use request::{
    ChatCompletionBody, ChatMessage, CompletionRequest, MessageRole, SuppliedKeys,
    DEFAULT_TEMPERATURE,
};
pub use response::{CompletionResult, FallbackReason, TitleResult, TitleSource, Usage};
pub use settings::{Settings, SettingsStore, SettingsStoreError, StaticSettingsStore};
