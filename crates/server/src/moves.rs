//! Stock and cash day book API endpoints

use api_types::MoveDirection as ApiDirection;
use api_types::moves::{
    CashMoveNew, CashMoveUpdate, CashMoveView, CashMovesResponse, MoveCreated, MoveListQuery,
    StockMoveNew, StockMoveUpdate, StockMoveView, StockMovesResponse,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_direction(direction: ApiDirection) -> engine::MoveDirection {
    match direction {
        ApiDirection::In => engine::MoveDirection::In,
        ApiDirection::Out => engine::MoveDirection::Out,
    }
}

fn view_direction(direction: engine::MoveDirection) -> ApiDirection {
    match direction {
        engine::MoveDirection::In => ApiDirection::In,
        engine::MoveDirection::Out => ApiDirection::Out,
    }
}

fn client_patch(client_id: Option<Uuid>, clear_client: Option<bool>) -> engine::ClientPatch {
    if clear_client.unwrap_or(false) {
        engine::ClientPatch::Clear
    } else {
        match client_id {
            Some(id) => engine::ClientPatch::Assign(id),
            None => engine::ClientPatch::Keep,
        }
    }
}

fn list_filter(query: &MoveListQuery) -> engine::MoveListFilter {
    engine::MoveListFilter {
        client_id: query.client_id,
        from: query.from,
        to: query.to,
        direction: query.direction.map(map_direction),
    }
}

fn stock_view(stock_move: engine::StockMove) -> StockMoveView {
    StockMoveView {
        id: stock_move.id,
        client_id: stock_move.client_id,
        direction: view_direction(stock_move.direction),
        item: stock_move.item,
        quantity: stock_move.quantity,
        rate: stock_move.rate,
        amount: stock_move.amount,
        occurred_on: stock_move.occurred_on,
        created_at: stock_move.created_at,
    }
}

fn cash_view(cash_move: engine::CashMove) -> CashMoveView {
    CashMoveView {
        id: cash_move.id,
        client_id: cash_move.client_id,
        direction: view_direction(cash_move.direction),
        amount: cash_move.amount,
        category: cash_move.category,
        note: cash_move.note,
        occurred_on: cash_move.occurred_on,
        created_at: cash_move.created_at,
    }
}

pub async fn stock_create(
    State(state): State<ServerState>,
    Json(payload): Json<StockMoveNew>,
) -> Result<(StatusCode, Json<MoveCreated>), ServerError> {
    let id = state
        .engine
        .new_stock_move(engine::NewStockMoveCmd {
            client_id: payload.client_id,
            direction: map_direction(payload.direction),
            item: payload.item,
            quantity: payload.quantity,
            rate: payload.rate,
            occurred_on: payload.occurred_on,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MoveCreated { id })))
}

pub async fn stock_list(
    State(state): State<ServerState>,
    Query(query): Query<MoveListQuery>,
) -> Result<Json<StockMovesResponse>, ServerError> {
    let limit = query.limit.unwrap_or(50);
    let moves = state
        .engine
        .list_stock_moves(&list_filter(&query), limit)
        .await?;

    Ok(Json(StockMovesResponse {
        moves: moves.into_iter().map(stock_view).collect(),
    }))
}

pub async fn stock_get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StockMoveView>, ServerError> {
    let stock_move = state.engine.stock_move(id).await?;
    Ok(Json(stock_view(stock_move)))
}

pub async fn stock_update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockMoveUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_stock_move(engine::UpdateStockMoveCmd {
            move_id: id,
            client: client_patch(payload.client_id, payload.clear_client),
            direction: payload.direction.map(map_direction),
            item: payload.item,
            quantity: payload.quantity,
            rate: payload.rate,
            occurred_on: payload.occurred_on,
        })
        .await?;

    Ok(StatusCode::OK)
}

pub async fn stock_delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_stock_move(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn cash_create(
    State(state): State<ServerState>,
    Json(payload): Json<CashMoveNew>,
) -> Result<(StatusCode, Json<MoveCreated>), ServerError> {
    let id = state
        .engine
        .new_cash_move(engine::NewCashMoveCmd {
            client_id: payload.client_id,
            direction: map_direction(payload.direction),
            amount: payload.amount,
            category: payload.category,
            note: payload.note,
            occurred_on: payload.occurred_on,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MoveCreated { id })))
}

pub async fn cash_list(
    State(state): State<ServerState>,
    Query(query): Query<MoveListQuery>,
) -> Result<Json<CashMovesResponse>, ServerError> {
    let limit = query.limit.unwrap_or(50);
    let moves = state
        .engine
        .list_cash_moves(&list_filter(&query), limit)
        .await?;

    Ok(Json(CashMovesResponse {
        moves: moves.into_iter().map(cash_view).collect(),
    }))
}

pub async fn cash_get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CashMoveView>, ServerError> {
    let cash_move = state.engine.cash_move(id).await?;
    Ok(Json(cash_view(cash_move)))
}

pub async fn cash_update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CashMoveUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_cash_move(engine::UpdateCashMoveCmd {
            move_id: id,
            client: client_patch(payload.client_id, payload.clear_client),
            direction: payload.direction.map(map_direction),
            amount: payload.amount,
            category: payload.category,
            note: payload.note,
            occurred_on: payload.occurred_on,
        })
        .await?;

    Ok(StatusCode::OK)
}

pub async fn cash_delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_cash_move(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
