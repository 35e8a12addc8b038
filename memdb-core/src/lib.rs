//! MemDB Core - In-memory multi-index table engine
//!
//! This crate provides the foundational components for MemDB:
//! - Schema definition with validated key sets
//! - Typed values, rows, and handle-addressed records
//! - SHA-256 fingerprinting of field names and value combinations
//! - Fingerprint-bucketed indexes, one per declared key set
//! - The table engine tying them together, with a uniqueness
//!   constraint on the first declared key set

pub mod fingerprint;
pub mod index;
pub mod record;
pub mod schema;
pub mod table;

pub use fingerprint::*;
pub use index::*;
pub use record::*;
pub use schema::*;
pub use table::*;
