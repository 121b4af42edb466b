use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use engine::{
    ClientRole, Engine, EngineError, MoveDirection, NewCashMoveCmd, NewClientCmd, NewStockMoveCmd,
    UpdateClientCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
}

#[tokio::test]
async fn new_client_starts_active_at_zero() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .new_client(NewClientCmd {
            name: "  Rahim Traders  ".to_string(),
            role: ClientRole::Customer,
            phone: Some("0171-000000".to_string()),
            address: None,
        })
        .await
        .unwrap();

    let created = engine.client(id).await.unwrap();
    assert_eq!(created.name, "Rahim Traders");
    assert_eq!(created.role, ClientRole::Customer);
    assert_eq!(created.phone, Some("0171-000000".to_string()));
    assert_eq!(created.cached_balance, dec!(0));
    assert!(created.active);
}

#[tokio::test]
async fn names_are_unique_case_insensitively() {
    let (engine, _db) = engine_with_db().await;

    engine
        .new_client(NewClientCmd {
            name: "Rahim Traders".to_string(),
            role: ClientRole::Customer,
            phone: None,
            address: None,
        })
        .await
        .unwrap();

    let err = engine
        .new_client(NewClientCmd {
            name: "rahim traders".to_string(),
            role: ClientRole::Supplier,
            phone: None,
            address: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::ExistingKey("rahim traders".to_string()));
}

#[tokio::test]
async fn empty_name_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_client(NewClientCmd {
            name: "   ".to_string(),
            role: ClientRole::Customer,
            phone: None,
            address: None,
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::InvalidAmount("client name must not be empty".to_string())
    );
}

#[tokio::test]
async fn listing_hides_inactive_unless_asked() {
    let (engine, _db) = engine_with_db().await;

    let rahim = engine
        .new_client(NewClientCmd {
            name: "Rahim Traders".to_string(),
            role: ClientRole::Customer,
            phone: None,
            address: None,
        })
        .await
        .unwrap();
    engine
        .new_client(NewClientCmd {
            name: "Karim & Sons".to_string(),
            role: ClientRole::Supplier,
            phone: None,
            address: None,
        })
        .await
        .unwrap();

    engine.set_client_active(rahim, false).await.unwrap();

    let active = engine.list_clients(false).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Karim & Sons");

    let all = engine.list_clients(true).await.unwrap();
    assert_eq!(all.len(), 2);
    // Ordered by name.
    assert_eq!(all[0].name, "Karim & Sons");
    assert_eq!(all[1].name, "Rahim Traders");
}

#[tokio::test]
async fn update_persists_fields() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .new_client(NewClientCmd {
            name: "Rahim Traders".to_string(),
            role: ClientRole::Customer,
            phone: Some("0171-000000".to_string()),
            address: None,
        })
        .await
        .unwrap();

    engine
        .update_client(UpdateClientCmd {
            client_id: id,
            name: Some("Rahim & Brothers".to_string()),
            role: None,
            phone: Some("0199-111111".to_string()),
            address: Some("Station Road".to_string()),
        })
        .await
        .unwrap();

    let updated = engine.client(id).await.unwrap();
    assert_eq!(updated.name, "Rahim & Brothers");
    assert_eq!(updated.role, ClientRole::Customer);
    assert_eq!(updated.phone, Some("0199-111111".to_string()));
    assert_eq!(updated.address, Some("Station Road".to_string()));
}

#[tokio::test]
async fn rename_onto_taken_name_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    engine
        .new_client(NewClientCmd {
            name: "Rahim Traders".to_string(),
            role: ClientRole::Customer,
            phone: None,
            address: None,
        })
        .await
        .unwrap();
    let karim = engine
        .new_client(NewClientCmd {
            name: "Karim & Sons".to_string(),
            role: ClientRole::Supplier,
            phone: None,
            address: None,
        })
        .await
        .unwrap();

    let err = engine
        .update_client(UpdateClientCmd {
            client_id: karim,
            name: Some("RAHIM TRADERS".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::ExistingKey("RAHIM TRADERS".to_string()));
}

#[tokio::test]
async fn role_change_resyncs_the_balance() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .new_client(NewClientCmd {
            name: "Rahim Traders".to_string(),
            role: ClientRole::Customer,
            phone: None,
            address: None,
        })
        .await
        .unwrap();
    engine
        .new_stock_move(NewStockMoveCmd {
            client_id: Some(id),
            direction: MoveDirection::Out,
            item: None,
            quantity: dec!(10),
            rate: dec!(100),
            occurred_on: day(1),
        })
        .await
        .unwrap();
    assert_eq!(engine.client(id).await.unwrap().cached_balance, dec!(1000));

    // Goods OUT flips from "customer owes us" to "we are owed less".
    engine
        .update_client(UpdateClientCmd {
            client_id: id,
            role: Some(ClientRole::Supplier),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(engine.client(id).await.unwrap().cached_balance, dec!(-1000));
}

#[tokio::test]
async fn delete_refused_while_movements_reference_the_client() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .new_client(NewClientCmd {
            name: "Rahim Traders".to_string(),
            role: ClientRole::Customer,
            phone: None,
            address: None,
        })
        .await
        .unwrap();
    let move_id = engine
        .new_cash_move(NewCashMoveCmd {
            client_id: Some(id),
            direction: MoveDirection::In,
            amount: dec!(100),
            category: "Payment".to_string(),
            note: None,
            occurred_on: day(1),
        })
        .await
        .unwrap();

    let err = engine.delete_client(id).await.unwrap_err();
    assert_eq!(err, EngineError::ClientInUse("Rahim Traders".to_string()));

    engine.delete_cash_move(move_id).await.unwrap();
    engine.delete_client(id).await.unwrap();

    assert_eq!(
        engine.client(id).await.unwrap_err(),
        EngineError::KeyNotFound("client not exists".to_string())
    );
}

#[tokio::test]
async fn missing_client_operations_are_not_found() {
    let (engine, _db) = engine_with_db().await;
    let ghost = Uuid::new_v4();

    assert_eq!(
        engine.client(ghost).await.unwrap_err(),
        EngineError::KeyNotFound("client not exists".to_string())
    );
    assert_eq!(
        engine.set_client_active(ghost, false).await.unwrap_err(),
        EngineError::KeyNotFound("client not exists".to_string())
    );
    assert_eq!(
        engine.delete_client(ghost).await.unwrap_err(),
        EngineError::KeyNotFound("client not exists".to_string())
    );
    assert_eq!(
        engine.resync_balance(ghost).await.unwrap_err(),
        EngineError::KeyNotFound("client not exists".to_string())
    );
}
