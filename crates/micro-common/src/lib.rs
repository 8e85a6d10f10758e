//! Common utilities for the micro application loader.
//!
//! This crate provides shared infrastructure used by the loader crates:
//! - **Fetching** - the [`net::Fetcher`] contract and its HTTP implementation
//! - **URL normalization** - resolving resource references against an app's base URL
//! - **Warning System** - deduplicated notices for unsupported features

pub mod net;
pub mod url;
pub mod warning;

pub use net::{FetchError, Fetcher, HttpFetcher};
pub use url::{is_absolute_http, normalize_url};
