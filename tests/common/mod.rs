//! A fake chess.com API served on an ephemeral local port

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chess_daily::data::chess_com::USER_AGENT;
use serde_json::json;
use tokio::net::TcpListener;

pub const USER: &str = "unique-crl6d";

/// Knobs for the fake upstream
#[derive(Debug, Clone, Copy)]
pub struct UpstreamOptions {
    /// Serve stats, or answer 404 like chess.com does for unknown players
    pub stats_available: bool,
    /// Serve the archive index, or answer 500
    pub archives_available: bool,
    /// Unix time at which "today's" games ended
    pub end_time: i64,
    /// Hold the stats response for several seconds before answering
    pub stall_stats: bool,
}

/// How long a stalled stats response is held
pub const STALL: Duration = Duration::from_secs(5);

impl Default for UpstreamOptions {
    fn default() -> Self {
        Self {
            stats_available: true,
            archives_available: true,
            end_time: chrono::Utc::now().timestamp(),
            stall_stats: false,
        }
    }
}

#[derive(Clone)]
struct UpstreamState {
    base_url: String,
    options: UpstreamOptions,
    stats_hits: Arc<AtomicUsize>,
    archive_hits: Arc<AtomicUsize>,
}

/// Handle to a running fake upstream
pub struct FakeUpstream {
    /// Base URL including the `/pub` prefix
    pub base_url: String,
    stats_hits: Arc<AtomicUsize>,
    archive_hits: Arc<AtomicUsize>,
}

impl FakeUpstream {
    pub fn stats_hits(&self) -> usize {
        self.stats_hits.load(Ordering::SeqCst)
    }

    pub fn archive_hits(&self) -> usize {
        self.archive_hits.load(Ordering::SeqCst)
    }

    pub fn archive_url(&self, year: u32, month: u32) -> String {
        format!("{}/player/{}/games/{}/{:02}", self.base_url, USER, year, month)
    }
}

/// Serves `router` on an ephemeral port and returns its address
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server runs");
    });
    format!("http://{addr}")
}

/// Starts a fake chess.com API
///
/// Archive index for any player lists 2024/06 (one old game), 2024/07 (a win
/// and a loss ending at `end_time`) and 1999/01 (always fails with 500).
pub async fn spawn_upstream(options: UpstreamOptions) -> FakeUpstream {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");
    let base_url = format!("http://{addr}/pub");

    let stats_hits = Arc::new(AtomicUsize::new(0));
    let archive_hits = Arc::new(AtomicUsize::new(0));
    let state = UpstreamState {
        base_url: base_url.clone(),
        options,
        stats_hits: Arc::clone(&stats_hits),
        archive_hits: Arc::clone(&archive_hits),
    };

    let router = Router::new()
        .route("/pub/player/{username}/stats", get(stats))
        .route("/pub/player/{username}/games/archives", get(archives))
        .route("/pub/player/{username}/games/{year}/{month}", get(archive))
        .with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("upstream runs");
    });

    FakeUpstream {
        base_url,
        stats_hits,
        archive_hits,
    }
}

fn has_browser_user_agent(headers: &HeaderMap) -> bool {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        == Some(USER_AGENT)
}

fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, "bot blocked").into_response()
}

async fn stats(
    State(state): State<UpstreamState>,
    Path(_username): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.stats_hits.fetch_add(1, Ordering::SeqCst);
    if !has_browser_user_agent(&headers) {
        return forbidden();
    }
    if state.options.stall_stats {
        tokio::time::sleep(STALL).await;
    }
    if !state.options.stats_available {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"code": 0, "message": "User not found."})),
        )
            .into_response();
    }

    Json(json!({
        "chess_rapid": {
            "last": {"rating": 1432, "date": 1721030000, "rd": 45},
            "record": {"win": 120, "loss": 98, "draw": 12}
        },
        "chess_bullet": {
            "last": {"rating": 1105, "date": 1721020000, "rd": 80}
        },
        "fide": 0
    }))
    .into_response()
}

async fn archives(
    State(state): State<UpstreamState>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !has_browser_user_agent(&headers) {
        return forbidden();
    }
    if !state.options.archives_available {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let base = &state.base_url;
    Json(json!({
        "archives": [
            format!("{base}/player/{username}/games/1999/01"),
            format!("{base}/player/{username}/games/2024/06"),
            format!("{base}/player/{username}/games/2024/07"),
        ]
    }))
    .into_response()
}

async fn archive(
    State(state): State<UpstreamState>,
    Path((username, year, month)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    state.archive_hits.fetch_add(1, Ordering::SeqCst);
    if !has_browser_user_agent(&headers) {
        return forbidden();
    }

    let end_time = state.options.end_time;
    let games = match (year.as_str(), month.as_str()) {
        ("2024", "06") => json!([game(&username, "opponent", "win", "resigned", end_time - 3 * 86_400)]),
        ("2024", "07") => json!([
            game(&username, "opponent", "win", "timeout", end_time),
            game("opponent", &username, "win", "checkmated", end_time),
        ]),
        _ => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };

    Json(json!({ "games": games })).into_response()
}

fn game(white: &str, black: &str, white_result: &str, black_result: &str, end_time: i64) -> serde_json::Value {
    json!({
        "url": "https://www.chess.com/game/live/1",
        "time_control": "600",
        "end_time": end_time,
        "rated": true,
        "time_class": "rapid",
        "rules": "chess",
        "white": {"rating": 1430, "result": white_result, "username": white},
        "black": {"rating": 1410, "result": black_result, "username": black}
    })
}
