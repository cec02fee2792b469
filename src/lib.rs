//! DealerLedger - a versioned asset ledger for telecom dealer accounts
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Data Model
//! - [`asset`] - The asset record and its stored byte encoding
//!
//! ## State Management
//! - [`store`] - Versioned key-value state backends (SQLite, in-memory)
//! - [`history`] - Per-key version history reconstruction
//!
//! ## Ledger Operations
//! - [`ledger`] - Create/read/update/list/exists/history over the store
//! - [`dispatch`] - Named invocations with positional string arguments
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Data Model
// ============================================================================
pub mod asset;

// ============================================================================
// State Management
// ============================================================================
pub mod history;
pub mod store;

// ============================================================================
// Ledger Operations
// ============================================================================
pub mod dispatch;
pub mod ledger;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
