#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod config;
mod error;
pub mod message;
pub mod prelude;
pub mod prompt;
pub mod provider;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use error::{BoxedError, Error, ErrorKind, Result};

/// Tracing target for configuration resolution.
pub const TRACING_TARGET_CONFIG: &str = "chatpilot_core::config";

/// Tracing target for provider dispatch.
pub const TRACING_TARGET_PROVIDER: &str = "chatpilot_core::provider";
