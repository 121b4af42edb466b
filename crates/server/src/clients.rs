//! Client registry API endpoints

use api_types::client::{
    ClientCreated, ClientListQuery, ClientNew, ClientRole as ApiRole, ClientUpdate, ClientView,
    ClientsResponse,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_role(role: ApiRole) -> engine::ClientRole {
    match role {
        ApiRole::Customer => engine::ClientRole::Customer,
        ApiRole::Supplier => engine::ClientRole::Supplier,
    }
}

fn view_role(role: engine::ClientRole) -> ApiRole {
    match role {
        engine::ClientRole::Customer => ApiRole::Customer,
        engine::ClientRole::Supplier => ApiRole::Supplier,
    }
}

fn client_view(client: engine::Client) -> ClientView {
    ClientView {
        id: client.id,
        name: client.name,
        role: view_role(client.role),
        phone: client.phone,
        address: client.address,
        balance: client.cached_balance,
        active: client.active,
        created_at: client.created_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ClientNew>,
) -> Result<(StatusCode, Json<ClientCreated>), ServerError> {
    let id = state
        .engine
        .new_client(engine::NewClientCmd {
            name: payload.name,
            role: map_role(payload.role),
            phone: payload.phone,
            address: payload.address,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ClientCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ClientListQuery>,
) -> Result<Json<ClientsResponse>, ServerError> {
    let clients = state
        .engine
        .list_clients(query.include_inactive.unwrap_or(false))
        .await?;

    Ok(Json(ClientsResponse {
        clients: clients.into_iter().map(client_view).collect(),
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientView>, ServerError> {
    let client = state.engine.client(id).await?;
    Ok(Json(client_view(client)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientUpdate>,
) -> Result<StatusCode, ServerError> {
    let has_field_patch = payload.name.is_some()
        || payload.role.is_some()
        || payload.phone.is_some()
        || payload.address.is_some();

    if has_field_patch {
        state
            .engine
            .update_client(engine::UpdateClientCmd {
                client_id: id,
                name: payload.name,
                role: payload.role.map(map_role),
                phone: payload.phone,
                address: payload.address,
            })
            .await?;
    }
    if let Some(active) = payload.active {
        state.engine.set_client_active(id, active).await?;
    }
    // An empty patch still 404s on an unknown client.
    if !has_field_patch && payload.active.is_none() {
        state.engine.client(id).await?;
    }

    Ok(StatusCode::OK)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_client(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
