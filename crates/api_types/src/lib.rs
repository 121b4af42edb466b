use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    In,
    Out,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Stock,
    Cash,
}

pub mod client {
    use super::*;

    /// Side of the business relationship.
    ///
    /// The server treats roles as:
    /// - `customer`: we sell to them, they owe us.
    /// - `supplier`: we buy from them, we owe them.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ClientRole {
        Customer,
        Supplier,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientNew {
        pub name: String,
        pub role: ClientRole,
        pub phone: Option<String>,
        pub address: Option<String>,
    }

    /// Request body for PATCHing a client.
    ///
    /// `name` and `role` keep their current value when absent. `phone` and
    /// `address` are stored as sent, so omitting them clears them.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientUpdate {
        pub name: Option<String>,
        pub role: Option<ClientRole>,
        pub phone: Option<String>,
        pub address: Option<String>,
        pub active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientView {
        pub id: Uuid,
        pub name: String,
        pub role: ClientRole,
        pub phone: Option<String>,
        pub address: Option<String>,
        /// Stored running total. Serialized as a decimal string in JSON.
        pub balance: Decimal,
        pub active: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientsResponse {
        pub clients: Vec<ClientView>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ClientListQuery {
        pub include_inactive: Option<bool>,
    }
}

pub mod moves {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockMoveNew {
        pub client_id: Option<Uuid>,
        pub direction: MoveDirection,
        pub item: Option<String>,
        pub quantity: Decimal,
        pub rate: Decimal,
        /// Business date (`YYYY-MM-DD`), not the wall clock.
        pub occurred_on: NaiveDate,
    }

    /// Request body for PATCHing a stock movement. Absent fields keep their
    /// current value; `clear_client: true` detaches the movement instead.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StockMoveUpdate {
        pub client_id: Option<Uuid>,
        pub clear_client: Option<bool>,
        pub direction: Option<MoveDirection>,
        pub item: Option<String>,
        pub quantity: Option<Decimal>,
        pub rate: Option<Decimal>,
        pub occurred_on: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockMoveView {
        pub id: Uuid,
        pub client_id: Option<Uuid>,
        pub direction: MoveDirection,
        pub item: Option<String>,
        pub quantity: Decimal,
        pub rate: Decimal,
        /// Always `quantity * rate`, derived server side.
        pub amount: Decimal,
        pub occurred_on: NaiveDate,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CashMoveNew {
        pub client_id: Option<Uuid>,
        pub direction: MoveDirection,
        pub amount: Decimal,
        pub category: String,
        pub note: Option<String>,
        /// Business date (`YYYY-MM-DD`), not the wall clock.
        pub occurred_on: NaiveDate,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CashMoveUpdate {
        pub client_id: Option<Uuid>,
        pub clear_client: Option<bool>,
        pub direction: Option<MoveDirection>,
        pub amount: Option<Decimal>,
        pub category: Option<String>,
        pub note: Option<String>,
        pub occurred_on: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CashMoveView {
        pub id: Uuid,
        pub client_id: Option<Uuid>,
        pub direction: MoveDirection,
        pub amount: Decimal,
        pub category: String,
        pub note: Option<String>,
        pub occurred_on: NaiveDate,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MoveCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockMovesResponse {
        pub moves: Vec<StockMoveView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CashMovesResponse {
        pub moves: Vec<CashMoveView>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct MoveListQuery {
        pub client_id: Option<Uuid>,
        /// Inclusive business date bounds.
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub direction: Option<MoveDirection>,
        pub limit: Option<u64>,
    }
}

pub mod ledger {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ShowStreams {
        #[default]
        Both,
        Stock,
        Cash,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SortField {
        #[default]
        Date,
        Amount,
        Kind,
        Direction,
        Balance,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SortOrder {
        #[default]
        Asc,
        Desc,
    }

    /// Query string for the statement endpoint. Everything is optional;
    /// defaults are date ascending, both streams, first page of fifty.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LedgerQueryParams {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub show: Option<ShowStreams>,
        pub sort: Option<SortField>,
        pub order: Option<SortOrder>,
        pub page: Option<u64>,
        pub page_size: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerEntryView {
        /// Id of the movement the line was built from.
        pub source_id: Uuid,
        pub kind: StreamKind,
        pub direction: MoveDirection,
        pub occurred_on: NaiveDate,
        pub created_at: DateTime<Utc>,
        /// Item name for stock lines, category for cash lines.
        pub particulars: Option<String>,
        pub quantity: Option<Decimal>,
        pub rate: Option<Decimal>,
        pub debit: Option<Decimal>,
        pub credit: Option<Decimal>,
        pub running_balance: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaginationView {
        pub total_items: u64,
        pub total_pages: u64,
        pub page: u64,
        pub page_size: u64,
        pub has_next: bool,
        pub has_prev: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerPageResponse {
        pub entries: Vec<LedgerEntryView>,
        /// Closing balance of the full fetched window, regardless of the
        /// `show` filter or the page requested.
        pub final_balance: Decimal,
        pub pagination: PaginationView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResyncResponse {
        pub balance: Decimal,
    }
}
