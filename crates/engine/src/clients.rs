//! Client primitives.
//!
//! A `Client` is a counter-party of the business, either a customer we sell
//! to or a supplier we buy from. The role decides how its movements land on
//! the ledger, so it is stored alongside the cached balance.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientRole {
    Customer,
    Supplier,
}

impl ClientRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Supplier => "supplier",
        }
    }
}

impl TryFrom<&str> for ClientRole {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "customer" => Ok(Self::Customer),
            "supplier" => Ok(Self::Supplier),
            other => Err(EngineError::DataIntegrity(format!(
                "invalid client role: {other}"
            ))),
        }
    }
}

/// A counter-party with its cached ledger balance.
///
/// `cached_balance` is a stored copy of the full-replay balance; it is only
/// ever written by a resync and a positive value always reads "the customer
/// owes us" / "we owe the supplier".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub role: ClientRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub cached_balance: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn new(
        name: String,
        role: ClientRole,
        phone: Option<String>,
        address: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            role,
            phone,
            address,
            cached_balance: Decimal::ZERO,
            active: true,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub cached_balance: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Client> for ActiveModel {
    fn from(client: &Client) -> Self {
        Self {
            id: ActiveValue::Set(client.id.to_string()),
            name: ActiveValue::Set(client.name.clone()),
            role: ActiveValue::Set(client.role.as_str().to_string()),
            phone: ActiveValue::Set(client.phone.clone()),
            address: ActiveValue::Set(client.address.clone()),
            cached_balance: ActiveValue::Set(client.cached_balance.to_string()),
            active: ActiveValue::Set(client.active),
            created_at: ActiveValue::Set(client.created_at),
        }
    }
}

impl TryFrom<Model> for Client {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::DataIntegrity(format!("client {}: bad id", model.id)))?;
        let cached_balance = model.cached_balance.parse::<Decimal>().map_err(|_| {
            EngineError::DataIntegrity(format!("client {id}: bad cached balance"))
        })?;
        Ok(Self {
            id,
            name: model.name,
            role: ClientRole::try_from(model.role.as_str())?,
            phone: model.phone,
            address: model.address,
            cached_balance,
            active: model.active,
            created_at: model.created_at,
        })
    }
}
