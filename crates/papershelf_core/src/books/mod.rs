//! Book domain
//!
//! The Book resource lifecycle: upload orchestration, partial updates,
//! append-only annotations and progress computation. Everything here depends
//! only on the `BookRepository` and `ObjectStorage` capabilities, never on a
//! concrete store.
pub mod annotations;
pub mod errors;
pub mod progress;
pub mod repository;
pub mod service;
pub mod types;
