//! `papershelf_core`
//!
//! Core library for the platform-independent logic of Papershelf, a personal
//! PDF library. The HTTP server is a thin layer on top of this crate; the
//! object store and the metadata store are reached exclusively through the
//! capability traits defined here.

pub mod books;

pub mod database;

pub mod storage;
