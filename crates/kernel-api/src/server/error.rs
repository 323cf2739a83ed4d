#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to open session store: {0}")]
    Store(#[from] PersistenceError),
}

#[derive(Debug)]
struct HttpApiError {
    status: StatusCode,
    error: ApiError,
}

impl HttpApiError {
    fn session_not_found(game_id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: ApiError::new(
                ErrorCode::SessionNotFound,
                "game session does not exist",
                Some(format!("game_id={game_id}")),
            ),
        }
    }

    fn unknown_action(action: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::new(
                ErrorCode::UnknownAction,
                "action is not in the catalog",
                Some(format!("action={action}")),
            ),
        }
    }

    fn invalid_request(message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::new(ErrorCode::InvalidRequest, message, details),
        }
    }

    fn internal(message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError::new(ErrorCode::InternalError, message, details),
        }
    }

    fn from_failure(failure: ApiFailure) -> Self {
        match failure {
            ApiFailure::NotFound(game_id) => Self::session_not_found(&game_id),
            ApiFailure::UnknownAction(action) => Self::unknown_action(&action),
            ApiFailure::Persistence(err) => {
                warn!(error = %err, "session store operation failed");
                Self::internal("session store operation failed", None)
            }
        }
    }
}

impl IntoResponse for HttpApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}
