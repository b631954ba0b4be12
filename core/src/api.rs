//! One-call-per-operation client: `PutioClient` plus a `Transport`.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::client::{PutioClient, AUTHORIZATION_CODE};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::SearchFilters;

#[cfg(feature = "blocking")]
use crate::{transport::UreqTransport, types::Credentials};

/// put.io client that performs each operation as a single blocking request.
///
/// Failures are returned as they happen; nothing is retried.
#[derive(Clone)]
pub struct ApiClient<T> {
    inner: PutioClient,
    transport: T,
}

#[cfg(feature = "blocking")]
impl ApiClient<UreqTransport> {
    /// Client against the production API.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_transport(PutioClient::new(credentials), UreqTransport::new())
    }

    pub fn with_base_url(base_url: &str, credentials: Credentials) -> Self {
        Self::with_transport(
            PutioClient::with_base_url(base_url, credentials),
            UreqTransport::new(),
        )
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(inner: PutioClient, transport: T) -> Self {
        Self { inner, transport }
    }

    pub fn client(&self) -> &PutioClient {
        &self.inner
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// URL the user must visit to grant this application access.
    pub fn get_authenticate_url(&self) -> Result<String, ApiError> {
        self.inner.authenticate_url()
    }

    /// Exchanges an authorization code for an access token.
    pub fn get_access_token(&self, code: &str) -> Result<String, ApiError> {
        self.get_access_token_with_grant(code, AUTHORIZATION_CODE)
    }

    pub fn get_access_token_with_grant(
        &self,
        code: &str,
        grant_type: &str,
    ) -> Result<String, ApiError> {
        let request = self.inner.build_get_access_token(code, grant_type)?;
        let response = self.send(request)?;
        let token = self.inner.parse_get_access_token(response, code, grant_type)?;
        info!(grant_type, "obtained access token");
        Ok(token)
    }

    /// Lists the files in folder `parent_id` (0 is the root folder).
    pub fn list_files(&self, parent_id: u64) -> Result<Value, ApiError> {
        let request = self.inner.build_list_files(parent_id)?;
        let response = self.send(request)?;
        self.inner.parse_list_files(response, parent_id)
    }

    pub fn search_files(&self, keyword: &str, filters: &SearchFilters) -> Result<Value, ApiError> {
        let request = self.inner.build_search_files(keyword, filters)?;
        let response = self.send(request)?;
        self.inner.parse_search_files(response)
    }

    /// Uploads the file at `path` into folder `parent_id`.
    ///
    /// `filename` defaults to the file name of `path`. A file that cannot be
    /// read fails with `ApiError::Io` and no request is sent.
    pub fn upload_file(
        &self,
        path: impl AsRef<Path>,
        filename: Option<&str>,
        parent_id: u64,
    ) -> Result<Value, ApiError> {
        let path = path.as_ref();
        let request = self.inner.build_upload_file(path, filename, parent_id)?;
        let response = self.send(request)?;
        let uploaded = self.inner.parse_upload_file(response, path)?;
        info!(path = %path.display(), parent_id, "uploaded file");
        Ok(uploaded)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.redacted_url(), "sending request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, bytes = response.body.len(), "received response");
        Ok(response)
    }
}
