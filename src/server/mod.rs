//! Companion web page for collecting peer ratings.
//!
//! Serves the static rating page and its assets, and answers
//! group-membership lookups from a `groups.json` roster so the page can
//! build one slider row per member.

mod handlers;

pub use handlers::*;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::groups::GroupRoster;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub roster: Arc<GroupRoster>,
    /// HTML file served at `/`.
    pub page: PathBuf,
    /// Folder served under `/static/`.
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        roster: GroupRoster,
        page: impl Into<PathBuf>,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            roster: Arc::new(roster),
            page: page.into(),
            static_dir: static_dir.into(),
        }
    }
}

/// Body of `POST /get_members`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembersRequest {
    pub group_name: String,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Builds the router for the rating page and roster lookups.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(rating_page))
        .route("/static/*path", get(static_asset))
        .route("/groups", get(list_groups))
        .route("/get_members", post(get_members))
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, groups = state.roster.len(), "Rating page listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
