use crate::constants::ICONIC_SAMPLE_LIMIT;
use crate::error::DashboardError;
use crate::iconic;
use crate::model::{Match, Player, Team, VenueStats};
use crate::search;
use crate::stats::{self, HeadToHead, MatchFilters};
use crate::storage::Storage;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Extension, Router,
};
use futures_util::{SinkExt, StreamExt};
use hyper::Server;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, error, info, warn};

/// Shared state for all handlers.
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub live_tx: broadcast::Sender<String>,
}

fn internal(e: DashboardError) -> StatusCode {
    error!("Storage query failed: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Health check endpoint
async fn ping() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Match lookup by storage-assigned id; unknown ids surface as JSON null.
async fn match_by_id(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Option<Match>>, StatusCode> {
    let found = state.storage.match_by_id(id).await.map_err(internal)?;
    Ok(Json(found))
}

/// All teams with unfiltered aggregate stats.
async fn all_teams(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Team>>, StatusCode> {
    team_stats(Extension(state), Query(MatchFilters::default())).await
}

/// All teams with stats recomputed over the filtered match subset.
async fn team_stats(
    Extension(state): Extension<Arc<AppState>>,
    Query(filters): Query<MatchFilters>,
) -> Result<Json<Vec<Team>>, StatusCode> {
    let teams = state.storage.all_teams().await.map_err(internal)?;
    let matches = state.storage.all_matches().await.map_err(internal)?;
    let filtered = stats::filter_matches(&matches, &filters);
    Ok(Json(stats::filtered_team_stats(teams, &filtered)))
}

/// Team detail plus its (optionally filtered) matches, newest first. Totals
/// reflect the filtered list, not the stored lifetime counters.
async fn team_detail(
    Extension(state): Extension<Arc<AppState>>,
    Path(team_name): Path<String>,
    Query(filters): Query<MatchFilters>,
) -> Result<Json<Option<Team>>, StatusCode> {
    let Some(team) = state
        .storage
        .team_by_name(&team_name)
        .await
        .map_err(internal)?
    else {
        return Ok(Json(None));
    };

    let matches = state
        .storage
        .matches_for_team(&team_name, None)
        .await
        .map_err(internal)?;
    let filtered = stats::filter_matches(&matches, &filters);
    Ok(Json(Some(stats::team_with_matches(team, filtered))))
}

/// Per-venue record for one team.
async fn team_venues(
    Extension(state): Extension<Arc<AppState>>,
    Path(team_name): Path<String>,
) -> Result<Json<BTreeMap<String, VenueStats>>, StatusCode> {
    let matches = state
        .storage
        .matches_for_team(&team_name, None)
        .await
        .map_err(internal)?;
    Ok(Json(stats::venue_breakdown(&team_name, &matches)))
}

#[derive(Debug, Deserialize)]
struct HeadToHeadParams {
    #[serde(rename = "team1Name")]
    team1_name: String,
    #[serde(rename = "team2Name")]
    team2_name: String,
}

async fn head_to_head(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<HeadToHeadParams>,
) -> Result<Json<HeadToHead>, StatusCode> {
    let matches = state
        .storage
        .matches_between(&params.team1_name, &params.team2_name)
        .await
        .map_err(internal)?;
    Ok(Json(stats::head_to_head(
        &params.team1_name,
        &params.team2_name,
        matches,
    )))
}

async fn all_players(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Player>>, StatusCode> {
    let mut players = state.storage.all_players().await.map_err(internal)?;
    players.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(players))
}

async fn player_detail(
    Extension(state): Extension<Arc<AppState>>,
    Path(player_name): Path<String>,
) -> Result<Json<Option<Player>>, StatusCode> {
    let found = state
        .storage
        .player_by_name(&player_name)
        .await
        .map_err(internal)?;
    Ok(Json(found))
}

async fn player_awards(
    Extension(state): Extension<Arc<AppState>>,
    Path(player_name): Path<String>,
) -> Result<Json<Vec<Match>>, StatusCode> {
    let matches = state
        .storage
        .matches_for_player_of_match(&player_name)
        .await
        .map_err(internal)?;
    Ok(Json(matches))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
}

async fn search_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<search::SearchResults>, StatusCode> {
    let teams = state.storage.all_teams().await.map_err(internal)?;
    let players = state.storage.all_players().await.map_err(internal)?;
    Ok(Json(search::search(&params.query, teams, players)))
}

async fn iconic_match(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Option<iconic::IconicMatch>>, StatusCode> {
    let sample = state
        .storage
        .sample_matches(ICONIC_SAMPLE_LIMIT)
        .await
        .map_err(internal)?;
    Ok(Json(iconic::pick_random(&sample)))
}

/// WebSocket feed of live-score updates. Each connection just mirrors the
/// broadcast channel; we only read from the client to notice it going away.
async fn live_score_ws(
    ws: WebSocketUpgrade,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    let rx = state.live_tx.subscribe();
    ws.on_upgrade(move |socket| forward_live_scores(socket, rx))
}

async fn forward_live_scores(socket: WebSocket, mut rx: broadcast::Receiver<String>) {
    let (mut sender, mut receiver) = socket.split();
    debug!("Live-score subscriber connected");

    loop {
        tokio::select! {
            update = rx.recv() => {
                match update {
                    Ok(payload) => {
                        if sender.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Live-score subscriber lagged behind");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Anything else from the client is ignored
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!("Live-score subscriber disconnected");
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<_> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<axum::http::HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the HTTP server with all routes.
pub fn create_server(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/match/:id", get(match_by_id))
        .route("/api/v1/team", get(all_teams))
        .route("/api/v1/team/stats", get(team_stats))
        .route("/api/v1/team/head-to-head", get(head_to_head))
        .route("/api/v1/team/:team_name", get(team_detail))
        .route("/api/v1/team/:team_name/venues", get(team_venues))
        .route("/api/v1/players", get(all_players))
        .route("/api/v1/players/:player_name", get(player_detail))
        .route(
            "/api/v1/players/:player_name/player-of-match-awards",
            get(player_awards),
        )
        .route("/api/v1/search", get(search_handler))
        .route("/api/v1/iconic-match", get(iconic_match))
        .route("/ws/live-score", get(live_score_ws))
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(cors_origins))
                .layer(Extension(state)),
        )
}

/// Start the HTTP server on the configured address.
pub async fn start_server(
    state: Arc<AppState>,
    bind_addr: &str,
    cors_origins: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = bind_addr.parse()?;
    let app = create_server(state, cors_origins);

    info!(%addr, "HTTP server listening");
    println!("🏏 Dashboard API running on http://{addr}");
    println!("💚 Health check: http://{addr}/api/ping");
    println!("📡 Live scores:  ws://{addr}/ws/live-score");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
