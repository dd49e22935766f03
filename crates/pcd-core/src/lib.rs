//! Core types and trait definitions for the document-collection service.
//!
//! This crate is deliberately free of HTTP, database and filesystem
//! dependencies. All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod activity;
pub mod completeness;
pub mod document;
pub mod error;
pub mod event;
pub mod person;
pub mod routing;
pub mod storage;
pub mod store;

pub use error::{Classify, Error, ErrorClass, Result};
