//! CMS module - client and wire types for the hosted document API

pub mod client;
pub mod types;

pub use client::{CmsError, CmsQuery, PrismicClient};
pub use types::{Document, QueryEnvelope};
