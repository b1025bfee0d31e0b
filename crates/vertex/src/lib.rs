//! Vertex AI virtual try-on client library.
//!
//! Wraps the `virtual-try-on` publisher model's REST `:predict`
//! endpoint: request construction, prediction decoding, and the
//! production [`TryOnInvoker`](vto_core::invoker::TryOnInvoker)
//! implementation.

pub mod api;
pub mod client;
pub mod config;
