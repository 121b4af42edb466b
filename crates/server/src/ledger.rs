//! Ledger statement API endpoints

use api_types::ledger::{
    LedgerEntryView, LedgerPageResponse, LedgerQueryParams, PaginationView, ResyncResponse,
    ShowStreams, SortField as ApiSortField, SortOrder as ApiSortOrder,
};
use api_types::{MoveDirection as ApiDirection, StreamKind as ApiKind};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_show(show: ShowStreams) -> engine::StreamSelection {
    match show {
        ShowStreams::Both => engine::StreamSelection::Both,
        ShowStreams::Stock => engine::StreamSelection::Stock,
        ShowStreams::Cash => engine::StreamSelection::Cash,
    }
}

fn map_sort(sort: ApiSortField) -> engine::SortField {
    match sort {
        ApiSortField::Date => engine::SortField::Date,
        ApiSortField::Amount => engine::SortField::Amount,
        ApiSortField::Kind => engine::SortField::Kind,
        ApiSortField::Direction => engine::SortField::Direction,
        ApiSortField::Balance => engine::SortField::Balance,
    }
}

fn map_order(order: ApiSortOrder) -> engine::SortOrder {
    match order {
        ApiSortOrder::Asc => engine::SortOrder::Asc,
        ApiSortOrder::Desc => engine::SortOrder::Desc,
    }
}

fn view_kind(kind: engine::StreamKind) -> ApiKind {
    match kind {
        engine::StreamKind::Stock => ApiKind::Stock,
        engine::StreamKind::Cash => ApiKind::Cash,
    }
}

fn view_direction(direction: engine::MoveDirection) -> ApiDirection {
    match direction {
        engine::MoveDirection::In => ApiDirection::In,
        engine::MoveDirection::Out => ApiDirection::Out,
    }
}

fn entry_view(entry: engine::LedgerEntry) -> LedgerEntryView {
    LedgerEntryView {
        source_id: entry.source_id,
        kind: view_kind(entry.kind),
        direction: view_direction(entry.direction),
        occurred_on: entry.occurred_on,
        created_at: entry.created_at,
        particulars: entry.particulars,
        quantity: entry.quantity,
        rate: entry.rate,
        debit: entry.debit,
        credit: entry.credit,
        running_balance: entry.running_balance,
    }
}

pub async fn page(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(params): Query<LedgerQueryParams>,
) -> Result<Json<LedgerPageResponse>, ServerError> {
    let query = engine::LedgerQuery {
        from: params.from,
        to: params.to,
        show: map_show(params.show.unwrap_or_default()),
        sort: map_sort(params.sort.unwrap_or_default()),
        order: map_order(params.order.unwrap_or_default()),
        page: params.page.unwrap_or(1),
        page_size: params.page_size.unwrap_or(50),
    };

    let page = state.engine.ledger_page(id, &query).await?;

    Ok(Json(LedgerPageResponse {
        entries: page.entries.into_iter().map(entry_view).collect(),
        final_balance: page.final_balance,
        pagination: PaginationView {
            total_items: page.pagination.total_items,
            total_pages: page.pagination.total_pages,
            page: page.pagination.page,
            page_size: page.pagination.page_size,
            has_next: page.pagination.has_next,
            has_prev: page.pagination.has_prev,
        },
    }))
}

pub async fn resync(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResyncResponse>, ServerError> {
    let balance = state.engine.resync_balance(id).await?;
    Ok(Json(ResyncResponse { balance }))
}
