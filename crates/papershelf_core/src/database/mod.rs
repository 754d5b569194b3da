//! Database library
//!
//! The library crate exposes the `Db` struct, the SQLite implementation of
//! the `BookRepository` capability, built on pre-defined queries.
pub mod queries;
