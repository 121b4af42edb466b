//! Stock day book primitives.
//!
//! A `StockMove` records goods entering or leaving the business on a given
//! day. The ledger amount is always derived from quantity and rate, never
//! entered by hand, so an edit of either re-derives it.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoveDirection, ResultEngine};

/// A dated goods movement, optionally booked against a client.
///
/// Movements without a client belong to the day book only and never appear
/// on a ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMove {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub direction: MoveDirection,
    pub item: Option<String>,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
    pub occurred_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl StockMove {
    pub fn new(
        client_id: Option<Uuid>,
        direction: MoveDirection,
        item: Option<String>,
        quantity: Decimal,
        rate: Decimal,
        occurred_on: NaiveDate,
    ) -> ResultEngine<Self> {
        let amount = Self::derive_amount(quantity, rate)?;
        Ok(Self {
            id: Uuid::new_v4(),
            client_id,
            direction,
            item,
            quantity,
            rate,
            amount,
            occurred_on,
            created_at: Utc::now(),
        })
    }

    /// Validates quantity and rate, then derives the movement amount as
    /// `quantity × rate` rounded to two decimal places.
    pub fn derive_amount(quantity: Decimal, rate: Decimal) -> ResultEngine<Decimal> {
        if quantity <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount(
                "quantity must be > 0".to_string(),
            ));
        }
        if rate < Decimal::ZERO {
            return Err(EngineError::InvalidAmount("rate must be >= 0".to_string()));
        }
        Ok((quantity * rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stock_moves")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub client_id: Option<String>,
    pub direction: String,
    pub item: Option<String>,
    pub quantity: String,
    pub rate: String,
    pub amount: String,
    pub occurred_on: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&StockMove> for ActiveModel {
    fn from(stock_move: &StockMove) -> Self {
        Self {
            id: ActiveValue::Set(stock_move.id.to_string()),
            client_id: ActiveValue::Set(stock_move.client_id.map(|id| id.to_string())),
            direction: ActiveValue::Set(stock_move.direction.as_str().to_string()),
            item: ActiveValue::Set(stock_move.item.clone()),
            quantity: ActiveValue::Set(stock_move.quantity.to_string()),
            rate: ActiveValue::Set(stock_move.rate.to_string()),
            amount: ActiveValue::Set(stock_move.amount.to_string()),
            occurred_on: ActiveValue::Set(stock_move.occurred_on),
            created_at: ActiveValue::Set(stock_move.created_at),
        }
    }
}

impl TryFrom<Model> for StockMove {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::DataIntegrity(format!("stock move {}: bad id", model.id)))?;
        let client_id = model
            .client_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|_| {
                EngineError::DataIntegrity(format!("stock move {id}: bad client reference"))
            })?;
        let quantity = model
            .quantity
            .parse::<Decimal>()
            .map_err(|_| EngineError::DataIntegrity(format!("stock move {id}: bad quantity")))?;
        let rate = model
            .rate
            .parse::<Decimal>()
            .map_err(|_| EngineError::DataIntegrity(format!("stock move {id}: bad rate")))?;
        let amount = model
            .amount
            .parse::<Decimal>()
            .map_err(|_| EngineError::DataIntegrity(format!("stock move {id}: bad amount")))?;
        Ok(Self {
            id,
            client_id,
            direction: MoveDirection::try_from(model.direction.as_str())?,
            item: model.item,
            quantity,
            rate,
            amount,
            occurred_on: model.occurred_on,
            created_at: model.created_at,
        })
    }
}
