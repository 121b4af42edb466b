use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod clients;
mod ledger;
mod moves;
mod server;

pub mod types {
    pub mod client {
        pub use api_types::client::{
            ClientCreated, ClientListQuery, ClientNew, ClientRole, ClientUpdate, ClientView,
            ClientsResponse,
        };
        pub use engine::Client;
    }

    pub mod moves {
        pub use api_types::moves::{
            CashMoveNew, CashMoveUpdate, CashMoveView, CashMovesResponse, MoveCreated,
            MoveListQuery, StockMoveNew, StockMoveUpdate, StockMoveView, StockMovesResponse,
        };
    }

    pub mod ledger {
        pub use api_types::ledger::{
            LedgerEntryView, LedgerPageResponse, LedgerQueryParams, PaginationView,
            ResyncResponse, ShowStreams, SortField, SortOrder,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

//TODO: Find a better solution
#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) | EngineError::ClientInUse(_) => StatusCode::CONFLICT,
        EngineError::InvalidAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::DataIntegrity(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::DataIntegrity(detail) => {
            tracing::error!("data integrity error: {detail}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
