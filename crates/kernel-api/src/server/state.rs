/// Shared handle to the facade. One lock serialises every request, so two
/// turns on the same session never interleave.
#[derive(Clone)]
pub struct AppState {
    inner: std::sync::Arc<Mutex<GameApi>>,
}

impl AppState {
    pub fn new(api: GameApi) -> Self {
        Self {
            inner: std::sync::Arc::new(Mutex::new(api)),
        }
    }
}
