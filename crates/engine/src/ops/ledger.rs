//! Ledger reads: statement replay and display-shaped pages.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    CashMove, LedgerEntry, Movement, ResultEngine, StockMove, StreamKind, StreamSelection,
    cash_moves, ledger, statement,
    statement::{LedgerPage, SortField, SortOrder},
    stock_moves,
};

use super::{Engine, validate_date_range};

/// Parameters for a ledger page read.
///
/// `from`/`to` narrow the fetched window (inclusive business dates). `show`
/// is a display filter applied after the replay; it never narrows the fetch,
/// so running balances always come from both streams.
#[derive(Clone, Debug)]
pub struct LedgerQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub show: StreamSelection,
    pub sort: SortField,
    pub order: SortOrder,
    pub page: u64,
    pub page_size: u64,
}

impl Default for LedgerQuery {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            show: StreamSelection::Both,
            sort: SortField::Date,
            order: SortOrder::Asc,
            page: 1,
            page_size: 50,
        }
    }
}

impl Engine {
    /// Chronological client statement with running balances.
    ///
    /// Both streams are fetched concurrently, merged and replayed in
    /// (business date, creation timestamp) order. Returns the entries plus
    /// the final balance of the fetched window; a client without movements
    /// gets an empty statement at balance zero, not an error.
    pub async fn ledger_statement(
        &self,
        client_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        streams: StreamSelection,
    ) -> ResultEngine<(Vec<LedgerEntry>, Decimal)> {
        validate_date_range(from, to)?;
        let client = self.client(client_id).await?;
        let movements = self.fetch_movements(client_id, from, to, streams).await?;
        Ok(ledger::replay(client_id, client.role, movements))
    }

    /// Display-shaped ledger page.
    ///
    /// The entries and the final balance always come from a full two-stream
    /// replay of the fetched window; `show`, sort and pagination only shape
    /// what is returned.
    pub async fn ledger_page(
        &self,
        client_id: Uuid,
        query: &LedgerQuery,
    ) -> ResultEngine<LedgerPage> {
        let (entries, final_balance) = self
            .ledger_statement(client_id, query.from, query.to, StreamSelection::Both)
            .await?;

        let entries = statement::filter_by_stream(entries, query.show);
        let entries = statement::sorted(entries, query.sort, query.order);
        let (entries, pagination) = statement::paginate(entries, query.page, query.page_size)?;

        Ok(LedgerPage {
            entries,
            final_balance,
            pagination,
        })
    }

    pub(super) async fn fetch_movements(
        &self,
        client_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        streams: StreamSelection,
    ) -> ResultEngine<Vec<Movement>> {
        let (stock, cash) = tokio::try_join!(
            self.fetch_stock_stream(client_id, from, to, streams.includes(StreamKind::Stock)),
            self.fetch_cash_stream(client_id, from, to, streams.includes(StreamKind::Cash)),
        )?;

        let mut movements = Vec::with_capacity(stock.len() + cash.len());
        movements.extend(stock.into_iter().map(Movement::Stock));
        movements.extend(cash.into_iter().map(Movement::Cash));
        Ok(movements)
    }

    // Fetches carry no ORDER BY; the replay sorts the merged union itself.

    async fn fetch_stock_stream(
        &self,
        client_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        include: bool,
    ) -> ResultEngine<Vec<StockMove>> {
        if !include {
            return Ok(Vec::new());
        }

        let mut query = stock_moves::Entity::find()
            .filter(stock_moves::Column::ClientId.eq(client_id.to_string()));
        if let Some(from) = from {
            query = query.filter(stock_moves::Column::OccurredOn.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(stock_moves::Column::OccurredOn.lte(to));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(StockMove::try_from).collect()
    }

    async fn fetch_cash_stream(
        &self,
        client_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        include: bool,
    ) -> ResultEngine<Vec<CashMove>> {
        if !include {
            return Ok(Vec::new());
        }

        let mut query = cash_moves::Entity::find()
            .filter(cash_moves::Column::ClientId.eq(client_id.to_string()));
        if let Some(from) = from {
            query = query.filter(cash_moves::Column::OccurredOn.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(cash_moves::Column::OccurredOn.lte(to));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(CashMove::try_from).collect()
    }
}
