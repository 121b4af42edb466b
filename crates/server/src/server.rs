use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{clients, ledger, moves};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/clients", post(clients::create).get(clients::list))
        .route(
            "/clients/{id}",
            get(clients::get).patch(clients::update).delete(clients::remove),
        )
        .route("/clients/{id}/ledger", get(ledger::page))
        .route("/clients/{id}/resync", post(ledger::resync))
        .route("/stock", post(moves::stock_create).get(moves::stock_list))
        .route(
            "/stock/{id}",
            get(moves::stock_get)
                .patch(moves::stock_update)
                .delete(moves::stock_delete),
        )
        .route("/cash", post(moves::cash_create).get(moves::cash_list))
        .route(
            "/cash/{id}",
            get(moves::cash_get)
                .patch(moves::cash_update)
                .delete(moves::cash_delete),
        )
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
