//! Object storage
//!
//! The `ObjectStorage` capability and its HTTP client for a Supabase-style
//! bucket store. Binaries are uploaded under generated unique names and
//! referenced by public URL; the metadata store never embeds them.
pub mod client;
pub mod errors;
