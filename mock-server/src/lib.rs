//! In-memory imitation of the put.io v2 endpoints used by `putio-core`.
//!
//! All routes live under `/v2`. File routes require `oauth_token` to match
//! `MockConfig::access_token`; the token route requires the configured
//! client secret.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PutioFile {
    pub id: u64,
    pub name: String,
    pub parent_id: u64,
    pub size: u64,
    pub file_type: String,
}

/// Credentials the mock accepts.
#[derive(Clone, Debug)]
pub struct MockConfig {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            client_id: "1234".to_string(),
            client_secret: "s3cret".to_string(),
            access_token: "mock-token".to_string(),
        }
    }
}

pub type Db = Arc<RwLock<Vec<PutioFile>>>;

#[derive(Clone)]
struct AppState {
    config: Arc<MockConfig>,
    db: Db,
}

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    app_with_config(MockConfig::default())
}

pub fn app_with_config(config: MockConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
        db: Arc::new(RwLock::new(seed_files())),
    };
    let api = Router::new()
        .route("/oauth2/access_token", get(access_token))
        .route("/files/list", get(list_files))
        .route("/files/search/{query}/page/{page_no}", get(search_files))
        .route("/files/upload", post(upload_file))
        .with_state(state);
    Router::new().nest("/v2", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Root holds a "Movies" folder (id 1) and a text file; the folder holds
/// one video.
pub fn seed_files() -> Vec<PutioFile> {
    vec![
        PutioFile {
            id: 1,
            name: "Movies".to_string(),
            parent_id: 0,
            size: 0,
            file_type: "FOLDER".to_string(),
        },
        PutioFile {
            id: 2,
            name: "Big Buck Bunny.mkv".to_string(),
            parent_id: 1,
            size: 276_134_947,
            file_type: "VIDEO".to_string(),
        },
        PutioFile {
            id: 3,
            name: "notes.txt".to_string(),
            parent_id: 0,
            size: 12,
            file_type: "TEXT".to_string(),
        },
    ]
}

fn error(status: StatusCode, error_type: &str) -> (StatusCode, Json<Value>) {
    warn!(%status, error_type, "rejecting request");
    (
        status,
        Json(json!({ "status": "ERROR", "error_type": error_type })),
    )
}

fn authorize(
    state: &AppState,
    params: &HashMap<String, String>,
) -> Result<(), (StatusCode, Json<Value>)> {
    match params.get("oauth_token") {
        Some(token) if *token == state.config.access_token => Ok(()),
        _ => Err(error(StatusCode::UNAUTHORIZED, "invalid_grant")),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TokenParams {
    client_id: String,
    client_secret: String,
    grant_type: String,
    code: String,
}

async fn access_token(
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
) -> ApiResult {
    if params.grant_type != "authorization_code" {
        return Err(error(StatusCode::BAD_REQUEST, "unsupported_grant_type"));
    }
    if params.client_id != state.config.client_id
        || params.client_secret != state.config.client_secret
        || params.code.is_empty()
    {
        return Err(error(StatusCode::UNAUTHORIZED, "invalid_client"));
    }
    debug!(code = %params.code, "granting token");
    Ok(Json(json!({ "access_token": state.config.access_token })))
}

async fn list_files(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult {
    authorize(&state, &params)?;
    let parent_id: u64 = match params.get("parent_id") {
        Some(raw) => raw
            .parse()
            .map_err(|_| error(StatusCode::BAD_REQUEST, "invalid_parent_id"))?,
        None => 0,
    };

    let files = state.db.read().await;
    let parent = if parent_id == 0 {
        json!({ "id": 0, "name": "Your Files", "file_type": "FOLDER" })
    } else {
        match files
            .iter()
            .find(|f| f.id == parent_id && f.file_type == "FOLDER")
        {
            Some(folder) => json!(folder),
            None => return Err(error(StatusCode::NOT_FOUND, "not_found")),
        }
    };
    let children: Vec<&PutioFile> = files.iter().filter(|f| f.parent_id == parent_id).collect();
    Ok(Json(json!({ "files": children, "parent": parent, "status": "OK" })))
}

async fn search_files(
    State(state): State<AppState>,
    Path((_query, page_no)): Path<(String, u32)>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult {
    authorize(&state, &params)?;
    let keyword = params
        .get("keyword")
        .map(|k| k.to_lowercase())
        .unwrap_or_default();

    // Everything fits on the first page.
    let files = state.db.read().await;
    let matches: Vec<&PutioFile> = if page_no > 0 {
        Vec::new()
    } else {
        files
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&keyword))
            .collect()
    };
    Ok(Json(json!({ "files": matches, "next": null, "status": "OK" })))
}

async fn upload_file(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    mut multipart: Multipart,
) -> ApiResult {
    authorize(&state, &params)?;

    let mut parent_id = 0u64;
    let mut upload: Option<(String, u64)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| error(StatusCode::BAD_REQUEST, "invalid_multipart"))?
    {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        match name.as_deref() {
            Some("parent_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| error(StatusCode::BAD_REQUEST, "invalid_multipart"))?;
                parent_id = text
                    .trim()
                    .parse()
                    .map_err(|_| error(StatusCode::BAD_REQUEST, "invalid_parent_id"))?;
            }
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| error(StatusCode::BAD_REQUEST, "invalid_multipart"))?;
                let file_name = file_name.unwrap_or_else(|| "upload".to_string());
                upload = Some((file_name, bytes.len() as u64));
            }
            _ => {}
        }
    }

    let Some((name, size)) = upload else {
        return Err(error(StatusCode::BAD_REQUEST, "missing_file"));
    };

    let mut files = state.db.write().await;
    let id = files.iter().map(|f| f.id).max().unwrap_or(0) + 1;
    let file = PutioFile {
        id,
        name,
        parent_id,
        size,
        file_type: "FILE".to_string(),
    };
    files.push(file.clone());
    debug!(id, parent_id, size, "stored upload");
    Ok(Json(json!({ "file": file, "status": "OK" })))
}
