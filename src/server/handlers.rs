//! HTTP request handlers

use std::path::{Component, Path as FsPath, PathBuf};

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::Html,
};
use tracing::{debug, warn};

use crate::server::{AppState, ErrorResponse, MembersRequest};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: String) -> ApiError {
    (status, Json(ErrorResponse { error: message }))
}

/// Serves the static rating page.
pub async fn rating_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    match tokio::fs::read_to_string(&state.page).await {
        Ok(body) => Ok(Html(body)),
        Err(e) => {
            warn!(page = %state.page.display(), error = %e, "Rating page unavailable");
            Err(api_error(StatusCode::NOT_FOUND, "rating page not found".to_string()))
        }
    }
}

/// Body and content type of a static asset.
pub type Asset = ([(header::HeaderName, String); 1], Vec<u8>);

/// Resolves `rel` inside `root`, refusing anything but plain file-name components.
fn asset_path(root: &FsPath, rel: &str) -> Option<PathBuf> {
    let rel = FsPath::new(rel);
    let plain = rel.components().all(|c| matches!(c, Component::Normal(_)));
    (plain && rel.components().next().is_some()).then(|| root.join(rel))
}

/// Serves a file from the static folder, typed by its extension.
pub async fn static_asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Asset, ApiError> {
    let not_found = || api_error(StatusCode::NOT_FOUND, format!("asset not found: {path}"));

    let Some(file) = asset_path(&state.static_dir, &path) else {
        warn!(asset = %path, "Rejected asset path");
        return Err(not_found());
    };

    match tokio::fs::read(&file).await {
        Ok(body) => {
            let mime = mime_guess::from_path(&file).first_or_octet_stream();
            debug!(asset = %path, mime = %mime, bytes = body.len(), "Asset served");
            Ok(([(header::CONTENT_TYPE, mime.to_string())], body))
        }
        Err(e) => {
            debug!(asset = %file.display(), error = %e, "Asset unavailable");
            Err(not_found())
        }
    }
}

/// Lists all group names in sorted order.
pub async fn list_groups(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.roster.group_names().map(str::to_string).collect())
}

/// Returns the member names of the requested group.
pub async fn get_members(
    State(state): State<AppState>,
    Json(payload): Json<MembersRequest>,
) -> Result<Json<Vec<String>>, ApiError> {
    match state.roster.members(&payload.group_name) {
        Some(members) => {
            debug!(group = %payload.group_name, members = members.len(), "Members looked up");
            Ok(Json(members.to_vec()))
        }
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("unknown group: {}", payload.group_name),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::GroupRoster;

    const SHIPPED_STATIC: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

    fn state(page: &FsPath) -> AppState {
        let roster =
            GroupRoster::from_json(r#"{"Team B": ["Dev", "Eli"], "Team A": ["Ana", "Ben"]}"#)
                .unwrap();
        AppState::new(roster, page, SHIPPED_STATIC)
    }

    async fn fetch(state: AppState, path: &str) -> Result<Asset, ApiError> {
        static_asset(State(state), Path(path.to_string())).await
    }

    #[tokio::test]
    async fn test_get_members_known_group() {
        let dir = tempfile::tempdir().unwrap();
        let req = MembersRequest {
            group_name: "Team A".to_string(),
        };

        let Json(members) = get_members(State(state(dir.path())), Json(req)).await.unwrap();
        assert_eq!(members, vec!["Ana", "Ben"]);
    }

    #[tokio::test]
    async fn test_get_members_unknown_group() {
        let dir = tempfile::tempdir().unwrap();
        let req = MembersRequest {
            group_name: "Team Z".to_string(),
        };

        let (status, Json(body)) = get_members(State(state(dir.path())), Json(req))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.error.contains("Team Z"));
    }

    #[tokio::test]
    async fn test_list_groups_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let Json(groups) = list_groups(State(state(dir.path()))).await;
        assert_eq!(groups, vec!["Team A", "Team B"]);
    }

    #[tokio::test]
    async fn test_rating_page_served_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("rating.html");

        let (status, _) = rating_page(State(state(&page))).await.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);

        std::fs::write(&page, "<h1>Rate your team</h1>").unwrap();
        let Html(body) = rating_page(State(state(&page))).await.unwrap();
        assert_eq!(body, "<h1>Rate your team</h1>");
    }

    #[tokio::test]
    async fn test_static_script_is_served_as_javascript() {
        let dir = tempfile::tempdir().unwrap();
        let ([(name, mime)], body) = fetch(state(dir.path()), "script.js").await.unwrap();
        assert_eq!(name, header::CONTENT_TYPE);
        assert!(mime.contains("javascript"));

        let script = String::from_utf8(body).unwrap();
        assert!(script.contains("/get_members"));
        assert!(script.contains("/groups"));
        for column in crate::record::REQUIRED_COLUMNS {
            assert!(script.contains(&format!("\"{column}\"")), "{column}");
        }
    }

    #[tokio::test]
    async fn test_shipped_page_loads_the_script() {
        let page = FsPath::new(SHIPPED_STATIC).join("rating.html");
        let Html(body) = rating_page(State(state(&page))).await.unwrap();
        assert!(body.contains("/static/script.js"));
        assert!(body.contains("groupSelect"));
    }

    #[tokio::test]
    async fn test_static_missing_asset_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (status, Json(body)) = fetch(state(dir.path()), "nope.css").await.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.error.contains("nope.css"));
    }

    #[tokio::test]
    async fn test_static_rejects_parent_traversal() {
        let dir = tempfile::tempdir().unwrap();
        for path in ["../Cargo.toml", "a/../../Cargo.toml", "/etc/passwd", ""] {
            let (status, _) = fetch(state(dir.path()), path).await.unwrap_err();
            assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        }
    }

    #[test]
    fn test_asset_path_keeps_nested_files_inside_root() {
        let root = FsPath::new("/srv/static");
        assert_eq!(
            asset_path(root, "css/site.css"),
            Some(PathBuf::from("/srv/static/css/site.css"))
        );
        assert_eq!(asset_path(root, "./script.js"), None);
        assert_eq!(asset_path(root, ".."), None);
    }
}
