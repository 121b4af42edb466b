//! Cached balance resync.
//!
//! The cached balance is only ever written here, and only as the result of a
//! full unfiltered replay of both streams. It is never nudged incrementally,
//! so one successful resync always lands on the replay truth no matter what
//! state the cache was in before.

use std::time::Duration;

use rust_decimal::Decimal;
use sea_orm::{ActiveValue, DbErr, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, StreamSelection, clients, ledger};

use super::Engine;

const RESYNC_ATTEMPTS: u32 = 3;
const RESYNC_BACKOFF: Duration = Duration::from_millis(50);

fn is_transient(err: &EngineError) -> bool {
    matches!(
        err,
        EngineError::Database(DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
    )
}

impl Engine {
    /// Recomputes one client's cached balance from its full movement history
    /// and stores it. Returns the stored balance.
    ///
    /// Resyncs of the same client are serialized; different clients run in
    /// parallel. Replaying an unchanged history is idempotent. Transient
    /// store failures are retried with a doubling backoff before the error
    /// surfaces; validation and not-found errors surface immediately.
    pub async fn resync_balance(&self, client_id: Uuid) -> ResultEngine<Decimal> {
        let lock = self.resync_lock(client_id).await;
        let _guard = lock.lock().await;

        let mut backoff = RESYNC_BACKOFF;
        let mut attempt = 1;
        loop {
            match self.replay_and_store(client_id).await {
                Ok(balance) => return Ok(balance),
                Err(err) if is_transient(&err) && attempt < RESYNC_ATTEMPTS => {
                    tracing::warn!(
                        "transient store error while resyncing client {client_id} \
                         (attempt {attempt}/{RESYNC_ATTEMPTS}): {err}"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Post-mutation trigger. The mutation is already committed when this
    /// runs, so a failure is reported and swallowed rather than rolled back;
    /// the cache stays stale until the next successful resync.
    pub(super) async fn resync_after_mutation(&self, client_id: Uuid) {
        if let Err(err) = self.resync_balance(client_id).await {
            tracing::error!("balance resync failed for client {client_id}: {err}");
        }
    }

    async fn replay_and_store(&self, client_id: Uuid) -> ResultEngine<Decimal> {
        let client = self.client(client_id).await?;
        let movements = self
            .fetch_movements(client_id, None, None, StreamSelection::Both)
            .await?;
        let (_, balance) = ledger::replay(client_id, client.role, movements);

        let model = clients::ActiveModel {
            id: ActiveValue::Set(client_id.to_string()),
            cached_balance: ActiveValue::Set(balance.to_string()),
            ..Default::default()
        };
        model.update(&self.database).await?;

        Ok(balance)
    }
}
