//! Cash day book primitives.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoveDirection, ResultEngine};

/// A dated cash movement, optionally booked against a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashMove {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub direction: MoveDirection,
    pub amount: Decimal,
    pub category: String,
    pub note: Option<String>,
    pub occurred_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl CashMove {
    pub fn new(
        client_id: Option<Uuid>,
        direction: MoveDirection,
        amount: Decimal,
        category: String,
        note: Option<String>,
        occurred_on: NaiveDate,
    ) -> ResultEngine<Self> {
        if amount <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount("amount must be > 0".to_string()));
        }
        let category = category.trim().to_string();
        if category.is_empty() {
            return Err(EngineError::InvalidAmount(
                "category must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            client_id,
            direction,
            amount,
            category,
            note,
            occurred_on,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cash_moves")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub client_id: Option<String>,
    pub direction: String,
    pub amount: String,
    pub category: String,
    pub note: Option<String>,
    pub occurred_on: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CashMove> for ActiveModel {
    fn from(cash_move: &CashMove) -> Self {
        Self {
            id: ActiveValue::Set(cash_move.id.to_string()),
            client_id: ActiveValue::Set(cash_move.client_id.map(|id| id.to_string())),
            direction: ActiveValue::Set(cash_move.direction.as_str().to_string()),
            amount: ActiveValue::Set(cash_move.amount.to_string()),
            category: ActiveValue::Set(cash_move.category.clone()),
            note: ActiveValue::Set(cash_move.note.clone()),
            occurred_on: ActiveValue::Set(cash_move.occurred_on),
            created_at: ActiveValue::Set(cash_move.created_at),
        }
    }
}

impl TryFrom<Model> for CashMove {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::DataIntegrity(format!("cash move {}: bad id", model.id)))?;
        let client_id = model
            .client_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|_| {
                EngineError::DataIntegrity(format!("cash move {id}: bad client reference"))
            })?;
        let amount = model
            .amount
            .parse::<Decimal>()
            .map_err(|_| EngineError::DataIntegrity(format!("cash move {id}: bad amount")))?;
        Ok(Self {
            id,
            client_id,
            direction: MoveDirection::try_from(model.direction.as_str())?,
            amount,
            category: model.category,
            note: model.note,
            occurred_on: model.occurred_on,
            created_at: model.created_at,
        })
    }
}
