//! Synchronous client for the put.io v2 file-storage API.
//!
//! # Overview
//! Covers the OAuth2 authorization-code flow, folder listing, search and
//! upload. Each operation is one blocking HTTP request whose 200 response is
//! returned as raw JSON; any other status becomes an `ApiError`.
//!
//! # Design
//! - `PutioClient` is sans-IO: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`. It holds only the base URL and
//!   credentials.
//! - `ApiClient` pairs it with a `Transport`. `UreqTransport` (feature
//!   `blocking`, on by default) is the network implementation; tests plug in
//!   their own.
//! - Response payloads stay `serde_json::Value`; put.io owns their schema.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod multipart;
#[cfg(feature = "blocking")]
pub mod transport;
pub mod types;

pub use api::ApiClient;
pub use client::{PutioClient, AUTHORIZATION_CODE, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use types::{Credentials, SearchFilters};

#[cfg(feature = "blocking")]
pub use transport::UreqTransport;
