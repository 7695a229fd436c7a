//! Core types, validators, and services for the Solace journaling backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::JournalStore`]; the two services
//! ([`catalog_service::SettingsCatalogService`] and
//! [`entry_service::JournalEntryService`]) orchestrate validation and
//! persistence on top of that abstraction.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod analytics;
pub mod catalog;
pub mod catalog_service;
pub mod cipher;
pub mod entry;
pub mod entry_service;
pub mod error;
pub mod identity;
pub mod mood;
pub mod settings;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
