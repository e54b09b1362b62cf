//! # scholar-model
//!
//! LLM integrations for the Scholar literature assistant.
//!
//! ## Overview
//!
//! This crate provides the [`Llm`] trait, a synchronous request/response
//! interface for chat-completion style models, together with:
//!
//! - [`OpenAiChatModel`] — OpenAI and OpenAI-compatible chat APIs
//! - [`MockLlm`] — canned-response model for tests and offline runs
//!
//! Scholar uses two capacity tiers of the same interface: a small model for
//! short prompts and a large-context model for long ones. Which tier handles
//! a given prompt is the caller's decision; this crate only speaks to the
//! backends.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scholar_model::{Llm, OpenAiChatModel};
//!
//! let model = OpenAiChatModel::from_env("gpt-4o-mini")?;
//! let reply = model.query("Say hello", 0.0).await?;
//! ```

pub mod error;
pub mod llm;
pub mod mock;
pub mod openai;

pub use error::{ModelError, Result};
pub use llm::Llm;
pub use mock::MockLlm;
pub use openai::OpenAiChatModel;
