async fn create_game(State(state): State<AppState>) -> Result<Json<GameSession>, HttpApiError> {
    let mut api = state.inner.lock().await;
    let session = api.create_game().map_err(HttpApiError::from_failure)?;
    Ok(Json(session))
}

async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameSession>, HttpApiError> {
    let api = state.inner.lock().await;
    let session = api.get_game(&game_id).map_err(HttpApiError::from_failure)?;
    Ok(Json(session))
}

async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<StatusCode, HttpApiError> {
    let mut api = state.inner.lock().await;
    api.reset_game(&game_id).map_err(HttpApiError::from_failure)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_summary(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<SessionSummary>, HttpApiError> {
    let api = state.inner.lock().await;
    let summary = api.summary(&game_id).map_err(HttpApiError::from_failure)?;
    Ok(Json(summary))
}

async fn perform_action(
    State(state): State<AppState>,
    payload: Result<Json<PerformActionRequest>, JsonRejection>,
) -> Result<Json<TurnReport>, HttpApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "rejected malformed action request");
        HttpApiError::invalid_request(
            "request body must be {gameId, action}",
            Some(rejection.body_text()),
        )
    })?;

    if request.game_id.trim().is_empty() || request.action.trim().is_empty() {
        return Err(HttpApiError::invalid_request(
            "gameId and action must be non-empty",
            None,
        ));
    }

    let mut api = state.inner.lock().await;
    let report = api
        .perform_action(&request.game_id, &request.action)
        .map_err(|failure| {
            warn!(
                game_id = %request.game_id,
                action = %request.action,
                error = %failure,
                "turn rejected"
            );
            HttpApiError::from_failure(failure)
        })?;
    Ok(Json(report))
}

#[derive(Debug, Default, Deserialize)]
struct ListGamesQuery {
    limit: Option<usize>,
}

async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<ListGamesQuery>,
) -> Result<Json<Vec<SessionListing>>, HttpApiError> {
    if query.limit == Some(0) {
        return Err(HttpApiError::invalid_request(
            "limit must be positive",
            Some("limit=0".to_string()),
        ));
    }

    let api = state.inner.lock().await;
    let listings = api
        .list_games(query.limit)
        .map_err(HttpApiError::from_failure)?;
    Ok(Json(listings))
}
