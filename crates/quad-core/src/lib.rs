//! Core types and service logic for the Quad campus portal.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! holds the domain types, the [`store::PortalStore`] abstraction over
//! storage backends, and the two services built on top of it:
//! [`manager::AccountManager`] (accounts and sessions) and
//! [`engine::RecordEngine`] (appointments, reviews, GPA records, reference
//! data, and the activity log).

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod appointment;
pub mod audit;
pub mod credential;
pub mod engine;
pub mod error;
pub mod grading;
pub mod manager;
pub mod reference;
pub mod review;
pub mod session;
pub mod store;

pub use error::{Error, Result};
