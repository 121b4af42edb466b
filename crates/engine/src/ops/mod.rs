use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{EngineError, MoveDirection, ResultEngine};

mod cash;
mod clients;
mod ledger;
mod stock;
mod sync;

pub use cash::{NewCashMoveCmd, UpdateCashMoveCmd};
pub use clients::{NewClientCmd, UpdateClientCmd};
pub use ledger::LedgerQuery;
pub use stock::{NewStockMoveCmd, UpdateStockMoveCmd};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result: crate::ResultEngine<_> = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// How an update touches a movement's client reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClientPatch {
    #[default]
    Keep,
    Assign(Uuid),
    Clear,
}

/// Column filters for day book listings.
///
/// `from`/`to` are inclusive business dates.
#[derive(Clone, Debug, Default)]
pub struct MoveListFilter {
    pub client_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub direction: Option<MoveDirection>,
}

fn validate_date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(EngineError::InvalidAmount(
            "invalid range: from must be <= to".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    resync_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Lock serializing resyncs of one client. Different clients get
    /// different locks, so their resyncs run in parallel.
    async fn resync_lock(&self, client_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.resync_locks.lock().await;
        locks.entry(client_id).or_default().clone()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            resync_locks: Mutex::new(HashMap::new()),
        })
    }
}
