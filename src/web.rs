//! HTTP routes for the dashboard
//!
//! `GET /` renders the HTML page and `GET /api/summary` returns the same data
//! as JSON. Upstream failures never reach this layer as errors.

use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use thiserror::Error;
use tracing::error;

use crate::cache::Clock;
use crate::dashboard::Dashboard;
use crate::data::ChessApi;
use crate::summary::{rating_label, Summary};

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum WebError {
    /// The page template failed to render
    #[error("Failed to render page: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        let body = serde_json::json!({ "error": self.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// The dashboard page
#[derive(Debug, Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub username: String,
    pub rapid_rating: String,
    pub blitz_rating: String,
    pub bullet_rating: String,
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    /// Win rate formatted with one decimal
    pub winrate: String,
    pub color: &'static str,
}

impl From<&Summary> for IndexTemplate {
    fn from(summary: &Summary) -> Self {
        Self {
            username: summary.username.clone(),
            rapid_rating: rating_label(summary.rapid),
            blitz_rating: rating_label(summary.blitz),
            bullet_rating: rating_label(summary.bullet),
            total_games: summary.total,
            wins: summary.wins,
            losses: summary.losses,
            draws: summary.draws,
            winrate: format!("{:.1}", summary.winrate),
            color: summary.color_tag.as_str(),
        }
    }
}

/// Builds the application router around a shared dashboard
pub fn router<A, C>(dashboard: Arc<Dashboard<A, C>>) -> Router
where
    A: ChessApi + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/", get(index::<A, C>))
        .route("/api/summary", get(summary_json::<A, C>))
        .with_state(dashboard)
}

async fn index<A: ChessApi, C: Clock>(
    State(dashboard): State<Arc<Dashboard<A, C>>>,
) -> Result<Html<String>, WebError> {
    let summary = dashboard.summary().await;
    let page = IndexTemplate::from(&summary).render()?;
    Ok(Html(page))
}

async fn summary_json<A: ChessApi, C: Clock>(
    State(dashboard): State<Arc<Dashboard<A, C>>>,
) -> Json<Summary> {
    Json(dashboard.summary().await)
}
