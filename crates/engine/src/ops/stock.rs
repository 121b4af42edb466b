//! Stock day book operations.
//!
//! Every mutation that can move a client balance triggers a resync of the
//! touched clients after its transaction commits; reassigning a movement
//! resyncs both the old and the new client.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{EngineError, MoveDirection, ResultEngine, StockMove, stock_moves};

use super::{ClientPatch, Engine, MoveListFilter, normalize_optional_text, validate_date_range, with_tx};

/// Fields for recording a stock movement.
#[derive(Clone, Debug)]
pub struct NewStockMoveCmd {
    pub client_id: Option<Uuid>,
    pub direction: MoveDirection,
    pub item: Option<String>,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub occurred_on: NaiveDate,
}

/// Patch for an existing stock movement.
///
/// `None` keeps the current value; `item` is stored as sent. The amount is
/// re-derived from the effective quantity and rate on every update.
#[derive(Clone, Debug, Default)]
pub struct UpdateStockMoveCmd {
    pub move_id: Uuid,
    pub client: ClientPatch,
    pub direction: Option<MoveDirection>,
    pub item: Option<String>,
    pub quantity: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub occurred_on: Option<NaiveDate>,
}

impl Engine {
    pub async fn new_stock_move(&self, cmd: NewStockMoveCmd) -> ResultEngine<Uuid> {
        let stock_move = StockMove::new(
            cmd.client_id,
            cmd.direction,
            normalize_optional_text(cmd.item.as_deref()),
            cmd.quantity,
            cmd.rate,
            cmd.occurred_on,
        )?;

        let id = with_tx!(self, |db_tx| {
            if let Some(client_id) = cmd.client_id {
                self.require_client(&db_tx, client_id).await?;
            }
            stock_moves::ActiveModel::from(&stock_move)
                .insert(&db_tx)
                .await?;
            Ok(stock_move.id)
        })?;

        if let Some(client_id) = cmd.client_id {
            self.resync_after_mutation(client_id).await;
        }
        Ok(id)
    }

    pub async fn stock_move(&self, move_id: Uuid) -> ResultEngine<StockMove> {
        let model = stock_moves::Entity::find_by_id(move_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("stock move not exists".to_string()))?;
        StockMove::try_from(model)
    }

    /// Day book listing, newest first.
    pub async fn list_stock_moves(
        &self,
        filter: &MoveListFilter,
        limit: u64,
    ) -> ResultEngine<Vec<StockMove>> {
        validate_date_range(filter.from, filter.to)?;

        let mut query = stock_moves::Entity::find()
            .order_by_desc(stock_moves::Column::OccurredOn)
            .order_by_desc(stock_moves::Column::CreatedAt)
            .limit(limit);
        if let Some(client_id) = filter.client_id {
            query = query.filter(stock_moves::Column::ClientId.eq(client_id.to_string()));
        }
        if let Some(from) = filter.from {
            query = query.filter(stock_moves::Column::OccurredOn.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(stock_moves::Column::OccurredOn.lte(to));
        }
        if let Some(direction) = filter.direction {
            query = query.filter(stock_moves::Column::Direction.eq(direction.as_str()));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(StockMove::try_from).collect()
    }

    pub async fn update_stock_move(&self, cmd: UpdateStockMoveCmd) -> ResultEngine<()> {
        let (old_client, new_client, balance_changed) = with_tx!(self, |db_tx| {
            let model = stock_moves::Entity::find_by_id(cmd.move_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("stock move not exists".to_string()))?;
            let current = StockMove::try_from(model)?;

            let client_id = match cmd.client {
                ClientPatch::Keep => current.client_id,
                ClientPatch::Assign(id) => {
                    self.require_client(&db_tx, id).await?;
                    Some(id)
                }
                ClientPatch::Clear => None,
            };
            let direction = cmd.direction.unwrap_or(current.direction);
            let quantity = cmd.quantity.unwrap_or(current.quantity);
            let rate = cmd.rate.unwrap_or(current.rate);
            let occurred_on = cmd.occurred_on.unwrap_or(current.occurred_on);
            let amount = StockMove::derive_amount(quantity, rate)?;

            let active = stock_moves::ActiveModel {
                id: ActiveValue::Set(current.id.to_string()),
                client_id: ActiveValue::Set(client_id.map(|id| id.to_string())),
                direction: ActiveValue::Set(direction.as_str().to_string()),
                item: ActiveValue::Set(normalize_optional_text(cmd.item.as_deref())),
                quantity: ActiveValue::Set(quantity.to_string()),
                rate: ActiveValue::Set(rate.to_string()),
                amount: ActiveValue::Set(amount.to_string()),
                occurred_on: ActiveValue::Set(occurred_on),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            let balance_changed = direction != current.direction
                || amount != current.amount
                || client_id != current.client_id;

            Ok((current.client_id, client_id, balance_changed))
        })?;

        if balance_changed {
            if let Some(client_id) = old_client {
                self.resync_after_mutation(client_id).await;
            }
            if let Some(client_id) = new_client
                && new_client != old_client
            {
                self.resync_after_mutation(client_id).await;
            }
        }
        Ok(())
    }

    pub async fn delete_stock_move(&self, move_id: Uuid) -> ResultEngine<()> {
        let client_id = with_tx!(self, |db_tx| {
            let model = stock_moves::Entity::find_by_id(move_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("stock move not exists".to_string()))?;

            // Parse leniently so a corrupt row can still be removed.
            let client_id = model.client_id.as_deref().and_then(|s| Uuid::parse_str(s).ok());

            stock_moves::Entity::delete_by_id(move_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(client_id)
        })?;

        if let Some(client_id) = client_id {
            self.resync_after_mutation(client_id).await;
        }
        Ok(())
    }
}
