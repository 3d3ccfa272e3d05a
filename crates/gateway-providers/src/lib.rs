//! # Gateway Providers
//!
//! Upstream provider plumbing for the companion gateway.
//!
//! This crate provides:
//! - The provider registry and one adapter per wire format
//!   (OpenAI-compatible chat completions, Hugging Face inference)
//! - Credential resolution across request, settings and environment
//! - The completion orchestrator
//! - The title generator with its heuristic fallback
//! - A PostgREST-backed settings store

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod client;
pub mod credentials;
pub mod huggingface;
pub mod openai;
pub mod orchestrator;
pub mod registry;
pub mod settings_store;
pub mod title;

// Re-export main types
pub use adapter::{ProviderAdapter, ProviderPayload};
pub use client::{UpstreamClient, UpstreamReply, DEFAULT_UPSTREAM_TIMEOUT};
pub use credentials::{resolve_key, EnvCredentials, KeySource, ResolvedKey};
pub use huggingface::HuggingFaceAdapter;
pub use openai::OpenAICompatAdapter;
pub use orchestrator::CompletionGateway;
pub use registry::{ProviderRegistry, RegistryConfig, RegistryEntry};
pub use settings_store::{load_snapshot, PostgrestSettingsStore, DEFAULT_SETTINGS_TABLE};
pub use title::{dated_title, heuristic_title, TitleGenerator};
