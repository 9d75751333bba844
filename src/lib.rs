//! Webtrack library crate.
//!
//! Loads per-user web activity reports (system → user → browser → visited
//! site), then filters, sorts, pages, aggregates, and exports them.
//!
//! The stable, supported API surface is exposed via [`crate::api`] and
//! [`crate::prelude`]. Other modules back the CLI and may change more
//! frequently.

pub mod api;
pub mod prelude;

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod router;
pub mod session;
