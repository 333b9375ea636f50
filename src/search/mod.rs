//! Travel search module
//!
//! This module talks to the external search provider and turns its answers
//! into records:
//! - Client: one query per category, failures returned as `SourceError`
//! - Raw: typed, lenient provider payloads
//! - Normalize: raw payloads to flight, hotel and attraction records

pub mod client;
pub mod error;
pub mod normalize;
pub mod raw;

pub use client::{SearchProvider, SearchQuery, SerpApiClient};
pub use error::{SourceError, SourceErrorKind};
pub use raw::RawResponse;
