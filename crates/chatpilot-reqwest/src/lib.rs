#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod config;
mod error;
mod gemini;
mod openai;

pub use client::ReqwestClient;
pub use config::{DEFAULT_GEMINI_BASE_URL, DEFAULT_OPENAI_URL, ReqwestConfig};
pub use error::{Error, Result};
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// Tracing target for HTTP adapter operations.
pub const TRACING_TARGET: &str = "chatpilot_reqwest";
