//! # Libris Architecture
//!
//! Libris is a **UI-agnostic library-management core**. The crate is a library
//! that happens to ship a CLI client, not the other way around, and that
//! distinction drives the layering:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs, print.rs)                     │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over the registry                            │
//! │  - Stamps "now" from the injected Clock                     │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (registry.rs, transaction.rs, model.rs)               │
//! │  - Borrow/return lifecycle, policy tables, reports          │
//! │  - Takes explicit timestamps, returns Rust types            │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Persistence (persist.rs)                                   │
//! │  - Pipe-delimited dump with section sentinels               │
//! │  - Generic over Write/BufRead for testability               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments, returns regular
//! Rust types (`Result<T>`), never writes to stdout/stderr and never calls
//! `std::process::exit`. The same core could serve a REST API or a TUI.
//!
//! Core operations also never read the wall clock. Every time-dependent
//! function takes `now: DateTime<Utc>`; the [`clock::Clock`] trait exists so
//! the API facade can run against the system clock in production and a
//! [`clock::ManualClock`] in tests, where the fee boundaries live or die on
//! second-level control of "now".
//!
//! ## The Registry
//!
//! [`registry::Registry`] owns every [`model::Person`], [`model::LibraryItem`]
//! and [`transaction::Transaction`] in the system, keyed by id. All other
//! references between entities are plain id strings resolved through the
//! registry — no shared ownership, no globals. The registry is the sole
//! mutator of item availability, which keeps the core invariant local:
//! an item is unavailable exactly when it has a current borrower.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade — entry point for all operations
//! - [`registry`]: Catalog, user roster and the transaction log
//! - [`transaction`]: One loan: due dates, overdue state, fines
//! - [`model`]: Core data types and the role/item policy tables
//! - [`clock`]: Time injection
//! - [`persist`]: Text dump export and its loader
//! - [`config`]: Configuration for the binary
//! - [`error`]: Error types

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod persist;
pub mod registry;
pub mod transaction;
