//! API request handlers

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::server::AppState;
use crate::core::SearchRequest;
use crate::error::{MatchError, MatchResult};
use crate::report::{Outcome, SearchResponse};
use crate::types::SearchMode;
use crate::upload::{search_upload, Upload};

/// Standard wrapper for the service endpoints
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data,
        }
    }
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Estimate Search</title></head>
<body>
  <h1>Welcome to the Estimate Search API</h1>
  <p>Upload an Excel file, optionally with a search term:</p>
  <form method="POST" action="/upload" enctype="multipart/form-data">
    <p><input type="file" name="file"></p>
    <p><input type="text" name="search_term" placeholder="Search term (optional)"></p>
    <p>
      <select name="mode">
        <option value="">Automatic</option>
        <option value="list">List all projects</option>
        <option value="column">Search item column</option>
        <option value="sheet">Search every cell</option>
      </select>
    </p>
    <input type="submit" value="Upload">
  </form>
</body>
</html>
"#;

/// GET / - Upload form
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub threshold: u8,
    pub sheet_marker: String,
    pub modes: Vec<String>,
}

/// GET /version - Server version and active matching settings
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.engine.config();
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        threshold: config.threshold,
        sheet_marker: config.sheet_marker.clone(),
        modes: [SearchMode::List, SearchMode::Column, SearchMode::Sheet]
            .iter()
            .map(ToString::to_string)
            .collect(),
    }))
}

/// Fields of the upload form
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<Upload>,
    pub search_term: Option<String>,
    pub mode: Option<String>,
}

impl UploadForm {
    /// Validate the form into an upload plus a search request
    pub fn into_parts(self) -> MatchResult<(Upload, SearchRequest)> {
        let upload = self.file.ok_or_else(MatchError::no_file_part)?;
        let mode = match self.mode.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<SearchMode>().map_err(MatchError::InputMissing)?),
        };
        let request = SearchRequest::new(mode, self.search_term)?;
        Ok((upload, request))
    }
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, MultipartError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                form.file = Some(Upload::new(file_name, bytes.to_vec()));
            }
            "search_term" => form.search_term = Some(field.text().await?),
            "mode" => form.mode = Some(field.text().await?),
            _ => {}
        }
    }
    Ok(form)
}

fn respond(result: MatchResult<Outcome>) -> (StatusCode, Json<SearchResponse>) {
    let status = match &result {
        Err(e) if e.is_input_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    };
    if let Err(e) = &result {
        warn!(error = %e, "upload rejected");
    }
    (status, Json(SearchResponse::from_result(result)))
}

/// POST /upload - Search an uploaded spreadsheet
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> (StatusCode, Json<SearchResponse>) {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "malformed upload");
            return (
                StatusCode::BAD_REQUEST,
                Json(SearchResponse::error(format!("Malformed upload: {}", e))),
            );
        }
    };

    let (upload, request) = match form.into_parts() {
        Ok(parts) => parts,
        Err(e) => return respond(Err(e)),
    };
    info!(
        file = %upload.file_name,
        size = upload.bytes.len(),
        mode = %request.mode,
        "upload received"
    );

    let worker_state = Arc::clone(&state);
    let joined = tokio::task::spawn_blocking(move || {
        search_upload(&worker_state.engine, &worker_state.scratch, &upload, &request)
    })
    .await;

    match joined {
        Ok(result) => respond(result),
        Err(e) => {
            tracing::error!(error = %e, "search worker failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SearchResponse::error("Internal error while processing upload")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_ok() {
        let response: ApiResponse<String> = ApiResponse::ok("test".to_string());
        assert!(response.success);
        assert_eq!(response.data, "test");
        assert!(Uuid::parse_str(&response.request_id).is_ok());
    }

    #[test]
    fn test_form_without_file() {
        let err = UploadForm::default().into_parts().unwrap_err();
        assert_eq!(err.to_string(), "No file part");
    }

    #[test]
    fn test_form_defaults_to_list() {
        let form = UploadForm {
            file: Some(Upload::new("a.xlsx", vec![1])),
            ..UploadForm::default()
        };
        let (_, request) = form.into_parts().unwrap();
        assert_eq!(request, SearchRequest::list());
    }

    #[test]
    fn test_form_blank_mode_is_automatic() {
        let form = UploadForm {
            file: Some(Upload::new("a.xlsx", vec![1])),
            search_term: Some("pipe".to_string()),
            mode: Some(" ".to_string()),
        };
        let (_, request) = form.into_parts().unwrap();
        assert_eq!(request, SearchRequest::column("pipe"));
    }

    #[test]
    fn test_form_rejects_unknown_mode() {
        let form = UploadForm {
            file: Some(Upload::new("a.xlsx", vec![1])),
            search_term: Some("pipe".to_string()),
            mode: Some("regex".to_string()),
        };
        let err = form.into_parts().unwrap_err();
        assert!(err.is_input_error());
        assert!(err.to_string().contains("unknown search mode"));
    }

    #[test]
    fn test_respond_status_codes() {
        let (status, _) = respond(Err(MatchError::EmptySelection));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, Json(body)) = respond(Err(MatchError::SheetNotFound("Detail".into())));
        assert_eq!(status, StatusCode::OK);
        assert!(!body.is_success());
    }
}
