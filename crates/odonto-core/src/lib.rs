//! Core types and trait definitions for the odontogram charting tool.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::NoteStore`]; the hosting layer drives a
//! [`session::ChartSession`] per connected clinician.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod fdi;
pub mod note;
pub mod notice;
pub mod session;
pub mod store;

pub use error::{Error, Result};
