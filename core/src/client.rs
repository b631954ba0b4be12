//! Stateless request builder and response parser for the put.io v2 API.
//!
//! # Design
//! `PutioClient` holds the base URL and the credentials and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. `ApiClient` runs a `Transport` in between; tests and
//! other hosts can do the same by hand.
//!
//! Only a 200 status counts as success. Everything else becomes
//! `ApiError::Auth` (token exchange) or `ApiError::Status` (all other calls).

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::types::{AccessTokenResponse, Credentials, SearchFilters};

/// Production endpoint of the put.io v2 API.
pub const DEFAULT_BASE_URL: &str = "https://api.put.io/v2";

/// Grant type used by the authorization-code flow.
pub const AUTHORIZATION_CODE: &str = "authorization_code";

/// Synchronous, stateless client for the put.io API.
#[derive(Debug, Clone)]
pub struct PutioClient {
    base_url: String,
    credentials: Credentials,
}

impl PutioClient {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, credentials)
    }

    pub fn with_base_url(base_url: &str, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// URL the user must visit to authorize this application.
    pub fn authenticate_url(&self) -> Result<String, ApiError> {
        let url = self.endpoint(
            &["oauth2", "authenticate"],
            &[
                ("client_id", opt(&self.credentials.client_id)),
                ("response_type", "code"),
                ("redirect_uri", opt(&self.credentials.redirect_uri)),
            ],
        )?;
        Ok(url.into())
    }

    pub fn build_get_access_token(
        &self,
        code: &str,
        grant_type: &str,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint(
            &["oauth2", "access_token"],
            &[
                ("client_id", opt(&self.credentials.client_id)),
                ("client_secret", opt(&self.credentials.client_secret)),
                ("redirect_uri", opt(&self.credentials.redirect_uri)),
                ("grant_type", grant_type),
                ("code", code),
            ],
        )?;
        Ok(HttpRequest::get(url.into()))
    }

    pub fn build_list_files(&self, parent_id: u64) -> Result<HttpRequest, ApiError> {
        let parent_id = parent_id.to_string();
        let url = self.endpoint(
            &["files", "list"],
            &[
                ("parent_id", parent_id.as_str()),
                ("oauth_token", opt(&self.credentials.oauth_token)),
            ],
        )?;
        Ok(HttpRequest::get(url.into()).with_header("Accept", "application/json"))
    }

    pub fn build_search_files(
        &self,
        keyword: &str,
        filters: &SearchFilters,
    ) -> Result<HttpRequest, ApiError> {
        if filters.query.chars().all(|c| c == '.') {
            return Err(ApiError::InvalidInput(format!(
                "search query {:?} is not a usable path segment",
                filters.query
            )));
        }
        let page_no = filters.page_no.to_string();
        let url = self.endpoint(
            &["files", "search", filters.query.as_str(), "page", page_no.as_str()],
            &[
                ("keyword", keyword),
                ("from", filters.shared_from.as_str()),
                ("type", filters.file_type.as_str()),
                ("ext", filters.file_ext.as_str()),
                ("time", filters.timeframe.as_str()),
                ("oauth_token", opt(&self.credentials.oauth_token)),
            ],
        )?;
        Ok(HttpRequest::get(url.into()))
    }

    /// Reads `path` and builds the multipart upload request.
    ///
    /// The file is read completely before returning, so a missing or
    /// unreadable file fails here, before any request exists.
    pub fn build_upload_file(
        &self,
        path: &Path,
        filename: Option<&str>,
        parent_id: u64,
    ) -> Result<HttpRequest, ApiError> {
        let data = std::fs::read(path).map_err(|source| ApiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = match filename {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string()),
        };

        let url = self.endpoint(
            &["files", "upload"],
            &[("oauth_token", opt(&self.credentials.oauth_token))],
        )?;
        let (content_type, body) = MultipartForm::new()
            .text("parent_id", &parent_id.to_string())
            .file("file", &filename, data)
            .build();

        debug!(%filename, parent_id, bytes = body.len(), "built upload request");
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![("content-type".to_string(), content_type)],
            body: Some(body),
        })
    }

    pub fn parse_get_access_token(
        &self,
        response: HttpResponse,
        code: &str,
        grant_type: &str,
    ) -> Result<String, ApiError> {
        if response.status != 200 {
            warn!(status = response.status, grant_type, "token exchange rejected");
            return Err(ApiError::Auth {
                status: response.status,
                message: format!(
                    "Error granting {grant_type} on code {code}. (#{})",
                    response.status
                ),
            });
        }
        let token: AccessTokenResponse = serde_json::from_slice(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(token.access_token)
    }

    pub fn parse_list_files(
        &self,
        response: HttpResponse,
        parent_id: u64,
    ) -> Result<Value, ApiError> {
        check_status(&response, || format!("Could not list files in {parent_id}."))?;
        parse_json(&response)
    }

    pub fn parse_search_files(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response, || "Could not find files.".to_string())?;
        parse_json(&response)
    }

    pub fn parse_upload_file(
        &self,
        response: HttpResponse,
        path: &Path,
    ) -> Result<Value, ApiError> {
        check_status(&response, || format!("Could not upload {}.", path.display()))?;
        parse_json(&response)
    }

    /// Base URL extended by the percent-encoded `segments`, with `params` as
    /// the query string. The base must not carry a query or fragment.
    fn endpoint(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)?;
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ApiError::InvalidInput(format!(
                "base URL {} must not have a query or fragment",
                self.base_url
            )));
        }
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::InvalidInput(format!("base URL {} cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Map any status other than 200 to `ApiError::Status`.
fn check_status(
    response: &HttpResponse,
    describe: impl FnOnce() -> String,
) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    warn!(status = response.status, "request failed");
    Err(ApiError::Status {
        status: response.status,
        message: format!("{} (#{})", describe(), response.status),
    })
}

fn parse_json(response: &HttpResponse) -> Result<Value, ApiError> {
    serde_json::from_slice(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
