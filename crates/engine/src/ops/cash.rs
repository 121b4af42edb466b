//! Cash day book operations.
//!
//! Mirrors the stock ops: balance-moving mutations resync the touched
//! clients after commit, reassignment resyncs both sides.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{CashMove, EngineError, MoveDirection, ResultEngine, cash_moves};

use super::{ClientPatch, Engine, MoveListFilter, normalize_optional_text, validate_date_range, with_tx};

/// Fields for recording a cash movement.
#[derive(Clone, Debug)]
pub struct NewCashMoveCmd {
    pub client_id: Option<Uuid>,
    pub direction: MoveDirection,
    pub amount: Decimal,
    pub category: String,
    pub note: Option<String>,
    pub occurred_on: NaiveDate,
}

/// Patch for an existing cash movement.
///
/// `None` keeps the current value; `note` is stored as sent.
#[derive(Clone, Debug, Default)]
pub struct UpdateCashMoveCmd {
    pub move_id: Uuid,
    pub client: ClientPatch,
    pub direction: Option<MoveDirection>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub occurred_on: Option<NaiveDate>,
}

impl Engine {
    pub async fn new_cash_move(&self, cmd: NewCashMoveCmd) -> ResultEngine<Uuid> {
        let cash_move = CashMove::new(
            cmd.client_id,
            cmd.direction,
            cmd.amount,
            cmd.category,
            normalize_optional_text(cmd.note.as_deref()),
            cmd.occurred_on,
        )?;

        let id = with_tx!(self, |db_tx| {
            if let Some(client_id) = cmd.client_id {
                self.require_client(&db_tx, client_id).await?;
            }
            cash_moves::ActiveModel::from(&cash_move)
                .insert(&db_tx)
                .await?;
            Ok(cash_move.id)
        })?;

        if let Some(client_id) = cmd.client_id {
            self.resync_after_mutation(client_id).await;
        }
        Ok(id)
    }

    pub async fn cash_move(&self, move_id: Uuid) -> ResultEngine<CashMove> {
        let model = cash_moves::Entity::find_by_id(move_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("cash move not exists".to_string()))?;
        CashMove::try_from(model)
    }

    /// Day book listing, newest first.
    pub async fn list_cash_moves(
        &self,
        filter: &MoveListFilter,
        limit: u64,
    ) -> ResultEngine<Vec<CashMove>> {
        validate_date_range(filter.from, filter.to)?;

        let mut query = cash_moves::Entity::find()
            .order_by_desc(cash_moves::Column::OccurredOn)
            .order_by_desc(cash_moves::Column::CreatedAt)
            .limit(limit);
        if let Some(client_id) = filter.client_id {
            query = query.filter(cash_moves::Column::ClientId.eq(client_id.to_string()));
        }
        if let Some(from) = filter.from {
            query = query.filter(cash_moves::Column::OccurredOn.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(cash_moves::Column::OccurredOn.lte(to));
        }
        if let Some(direction) = filter.direction {
            query = query.filter(cash_moves::Column::Direction.eq(direction.as_str()));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(CashMove::try_from).collect()
    }

    pub async fn update_cash_move(&self, cmd: UpdateCashMoveCmd) -> ResultEngine<()> {
        let (old_client, new_client, balance_changed) = with_tx!(self, |db_tx| {
            let model = cash_moves::Entity::find_by_id(cmd.move_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("cash move not exists".to_string()))?;
            let current = CashMove::try_from(model)?;

            let client_id = match cmd.client {
                ClientPatch::Keep => current.client_id,
                ClientPatch::Assign(id) => {
                    self.require_client(&db_tx, id).await?;
                    Some(id)
                }
                ClientPatch::Clear => None,
            };
            let direction = cmd.direction.unwrap_or(current.direction);
            let amount = cmd.amount.unwrap_or(current.amount);
            if amount <= Decimal::ZERO {
                return Err(EngineError::InvalidAmount("amount must be > 0".to_string()));
            }
            let category = match cmd.category {
                Some(ref raw) => {
                    let category = raw.trim().to_string();
                    if category.is_empty() {
                        return Err(EngineError::InvalidAmount(
                            "category must not be empty".to_string(),
                        ));
                    }
                    category
                }
                None => current.category.clone(),
            };
            let occurred_on = cmd.occurred_on.unwrap_or(current.occurred_on);

            let active = cash_moves::ActiveModel {
                id: ActiveValue::Set(current.id.to_string()),
                client_id: ActiveValue::Set(client_id.map(|id| id.to_string())),
                direction: ActiveValue::Set(direction.as_str().to_string()),
                amount: ActiveValue::Set(amount.to_string()),
                category: ActiveValue::Set(category),
                note: ActiveValue::Set(normalize_optional_text(cmd.note.as_deref())),
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

    pub async fn delete_cash_move(&self, move_id: Uuid) -> ResultEngine<()> {
        let client_id = with_tx!(self, |db_tx| {
            let model = cash_moves::Entity::find_by_id(move_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("cash move not exists".to_string()))?;

            // Parse leniently so a corrupt row can still be removed.
            let client_id = model.client_id.as_deref().and_then(|s| Uuid::parse_str(s).ok());

            cash_moves::Entity::delete_by_id(move_id.to_string())
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
