//! Client registry operations.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{Client, ClientRole, EngineError, ResultEngine, cash_moves, clients, stock_moves};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

/// Fields for registering a client.
#[derive(Clone, Debug)]
pub struct NewClientCmd {
    pub name: String,
    pub role: ClientRole,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Patch for an existing client.
///
/// `None` keeps the current name and role; phone and address are stored as
/// sent, so omitting them clears them.
#[derive(Clone, Debug, Default)]
pub struct UpdateClientCmd {
    pub client_id: Uuid,
    pub name: Option<String>,
    pub role: Option<ClientRole>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Engine {
    /// Registers a new client. Names are unique, compared case-insensitively.
    pub async fn new_client(&self, cmd: NewClientCmd) -> ResultEngine<Uuid> {
        let name = normalize_required_name(&cmd.name, "client")?;
        let client = Client::new(
            name.clone(),
            cmd.role,
            normalize_optional_text(cmd.phone.as_deref()),
            normalize_optional_text(cmd.address.as_deref()),
        );

        with_tx!(self, |db_tx| {
            let exists = clients::Entity::find()
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            clients::ActiveModel::from(&client).insert(&db_tx).await?;
            Ok(client.id)
        })
    }

    pub async fn client(&self, client_id: Uuid) -> ResultEngine<Client> {
        let model = clients::Entity::find_by_id(client_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("client not exists".to_string()))?;
        Client::try_from(model)
    }

    /// Clients ordered by name. Deactivated ones are hidden unless asked for.
    pub async fn list_clients(&self, include_inactive: bool) -> ResultEngine<Vec<Client>> {
        let mut query = clients::Entity::find().order_by_asc(clients::Column::Name);
        if !include_inactive {
            query = query.filter(clients::Column::Active.eq(true));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Client::try_from).collect()
    }

    pub async fn update_client(&self, cmd: UpdateClientCmd) -> ResultEngine<()> {
        let role_changed = with_tx!(self, |db_tx| {
            let model = self.require_client(&db_tx, cmd.client_id).await?;
            let current = Client::try_from(model)?;

            let name = match cmd.name {
                Some(ref raw) => {
                    let name = normalize_required_name(raw, "client")?;
                    if !name.eq_ignore_ascii_case(&current.name) {
                        let exists = clients::Entity::find()
                            .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                            .one(&db_tx)
                            .await?
                            .is_some();
                        if exists {
                            return Err(EngineError::ExistingKey(name));
                        }
                    }
                    name
                }
                None => current.name.clone(),
            };
            let role = cmd.role.unwrap_or(current.role);
            let role_changed = role != current.role;

            let active = clients::ActiveModel {
                id: ActiveValue::Set(cmd.client_id.to_string()),
                name: ActiveValue::Set(name),
                role: ActiveValue::Set(role.as_str().to_string()),
                phone: ActiveValue::Set(normalize_optional_text(cmd.phone.as_deref())),
                address: ActiveValue::Set(normalize_optional_text(cmd.address.as_deref())),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            Ok(role_changed)
        })?;

        // Debit and credit meaning hang off the role, so a role change moves
        // every entry's sign and the cached balance with it.
        if role_changed {
            self.resync_after_mutation(cmd.client_id).await;
        }
        Ok(())
    }

    /// Hides or un-hides a client from day-to-day lists. Movements and the
    /// ledger are untouched.
    pub async fn set_client_active(&self, client_id: Uuid, active: bool) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_client(&db_tx, client_id).await?;

            let model = clients::ActiveModel {
                id: ActiveValue::Set(client_id.to_string()),
                active: ActiveValue::Set(active),
                ..Default::default()
            };
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Removes a client outright. Refused while any movement still books
    /// against it; deactivate instead to keep the history.
    pub async fn delete_client(&self, client_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_client(&db_tx, client_id).await?;

            let id = client_id.to_string();
            let in_stock = stock_moves::Entity::find()
                .filter(stock_moves::Column::ClientId.eq(id.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            let in_cash = cash_moves::Entity::find()
                .filter(cash_moves::Column::ClientId.eq(id.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if in_stock || in_cash {
                return Err(EngineError::ClientInUse(model.name));
            }

            clients::Entity::delete_by_id(id).exec(&db_tx).await?;
            Ok(())
        })
    }

    pub(super) async fn require_client(
        &self,
        db_tx: &DatabaseTransaction,
        client_id: Uuid,
    ) -> ResultEngine<clients::Model> {
        clients::Entity::find_by_id(client_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("client not exists".to_string()))
    }

    /// Stored balance copy, written only by [`Engine::resync_balance`].
    pub async fn cached_balance(&self, client_id: Uuid) -> ResultEngine<Decimal> {
        Ok(self.client(client_id).await?.cached_balance)
    }
}
