//! # Stock Database Crate
//!
//! This crate is the application-specific interface to the PostgreSQL
//! `stocks` table.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. Every statement is parameterized; values
//!   are bound, never spliced into the query text.
//! - **Asynchronous & Pooled:** Connections come from a `PgPool` owned by the
//!   [`ConnectionProvider`]. Each operation checks one out, pings it, runs a
//!   single statement, and releases it when the guard drops.
//! - **Absence is data:** a missing row is an empty `Stock` or an affected-count
//!   of zero, never an error.
//!
//! ## Public API
//!
//! - `ConnectionProvider`: builds the pool from `DatabaseSettings` and hands out live connections.
//! - `StockStore`: the five CRUD operations, implemented by `DbRepository`.
//! - `DbError`: connection and statement failures.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::ConnectionProvider;
pub use error::DbError;
pub use repository::{DbRepository, DbStock, StockStore};
