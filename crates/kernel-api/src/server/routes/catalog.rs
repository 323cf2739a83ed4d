async fn list_actions(State(state): State<AppState>) -> Json<Vec<ActionInfo>> {
    let api = state.inner.lock().await;
    Json(api.actions())
}

async fn list_events(State(state): State<AppState>) -> Json<Vec<EventInfo>> {
    let api = state.inner.lock().await;
    Json(api.events())
}

async fn healthz() -> &'static str {
    "ok"
}
