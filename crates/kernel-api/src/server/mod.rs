use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, Request, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::Method;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use contracts::{
    ActionInfo, ApiError, ErrorCode, EventInfo, GameSession, PerformActionRequest, SessionListing,
    SessionSummary, TurnReport,
};
use serde::Deserialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{ApiConfig, ApiFailure, GameApi, PersistenceError};

include!("error.rs");
include!("state.rs");
include!("routes/game.rs");
include!("routes/catalog.rs");
include!("util.rs");

pub async fn serve(config: ApiConfig) -> Result<(), ServerError> {
    let api = GameApi::from_config(&config)?;
    let app = router(AppState::new(api));

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, store = ?config.store, "grad-survival server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/game", post(create_game))
        .route("/api/game/action", post(perform_action))
        .route("/api/game/{game_id}", get(get_game).delete(delete_game))
        .route("/api/game/{game_id}/summary", get(get_summary))
        .route("/api/games", get(list_games))
        .route("/api/actions", get(list_actions))
        .route("/api/events", get(list_events))
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}
