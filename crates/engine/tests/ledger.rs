use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    ClientRole, Engine, EngineError, LedgerQuery, MoveDirection, NewCashMoveCmd, NewClientCmd,
    NewStockMoveCmd, SortField, SortOrder, StreamKind, StreamSelection,
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
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

async fn client(engine: &Engine, name: &str, role: ClientRole) -> Uuid {
    engine
        .new_client(NewClientCmd {
            name: name.to_string(),
            role,
            phone: None,
            address: None,
        })
        .await
        .unwrap()
}

async fn add_stock(
    engine: &Engine,
    client_id: Uuid,
    direction: MoveDirection,
    quantity: Decimal,
    rate: Decimal,
    occurred_on: NaiveDate,
) -> Uuid {
    engine
        .new_stock_move(NewStockMoveCmd {
            client_id: Some(client_id),
            direction,
            item: Some("widgets".to_string()),
            quantity,
            rate,
            occurred_on,
        })
        .await
        .unwrap()
}

async fn add_cash(
    engine: &Engine,
    client_id: Uuid,
    direction: MoveDirection,
    amount: Decimal,
    occurred_on: NaiveDate,
) -> Uuid {
    engine
        .new_cash_move(NewCashMoveCmd {
            client_id: Some(client_id),
            direction,
            amount,
            category: "Payment".to_string(),
            note: None,
            occurred_on,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn customer_statement_runs_a_balance() {
    let (engine, _db) = engine_with_db().await;
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;

    add_stock(&engine, id, MoveDirection::Out, dec!(10), dec!(100), day(1)).await;
    add_cash(&engine, id, MoveDirection::In, dec!(400), day(2)).await;

    let (entries, balance) = engine
        .ledger_statement(id, None, None, StreamSelection::Both)
        .await
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, StreamKind::Stock);
    assert_eq!(entries[0].debit, Some(dec!(1000)));
    assert_eq!(entries[0].credit, None);
    assert_eq!(entries[0].running_balance, dec!(1000));
    assert_eq!(entries[1].kind, StreamKind::Cash);
    assert_eq!(entries[1].credit, Some(dec!(400)));
    assert_eq!(entries[1].running_balance, dec!(600));
    assert_eq!(balance, dec!(600));

    // The mutation triggers already synced the stored copy.
    assert_eq!(engine.client(id).await.unwrap().cached_balance, dec!(600));
}

#[tokio::test]
async fn supplier_purchase_and_payment_settle() {
    let (engine, _db) = engine_with_db().await;
    let id = client(&engine, "Karim & Sons", ClientRole::Supplier).await;

    add_stock(&engine, id, MoveDirection::In, dec!(50), dec!(100), day(1)).await;
    add_cash(&engine, id, MoveDirection::Out, dec!(5000), day(2)).await;

    let (entries, balance) = engine
        .ledger_statement(id, None, None, StreamSelection::Both)
        .await
        .unwrap();

    assert_eq!(entries[0].debit, Some(dec!(5000)));
    assert_eq!(entries[0].running_balance, dec!(5000));
    assert_eq!(entries[1].debit, Some(dec!(5000)));
    assert_eq!(entries[1].running_balance, dec!(0));
    assert_eq!(balance, dec!(0));
    assert_eq!(engine.client(id).await.unwrap().cached_balance, dec!(0));
}

#[tokio::test]
async fn deleting_a_movement_reshapes_the_statement() {
    let (engine, _db) = engine_with_db().await;
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;

    let sale = add_stock(&engine, id, MoveDirection::Out, dec!(10), dec!(100), day(1)).await;
    add_cash(&engine, id, MoveDirection::In, dec!(1000), day(2)).await;
    assert_eq!(engine.client(id).await.unwrap().cached_balance, dec!(0));

    engine.delete_stock_move(sale).await.unwrap();

    let (entries, balance) = engine
        .ledger_statement(id, None, None, StreamSelection::Both)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].credit, Some(dec!(1000)));
    assert_eq!(entries[0].running_balance, dec!(-1000));
    assert_eq!(balance, dec!(-1000));
    assert_eq!(engine.client(id).await.unwrap().cached_balance, dec!(-1000));
}

#[tokio::test]
async fn same_day_entries_follow_creation_order() {
    let (engine, _db) = engine_with_db().await;
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;

    let first = add_cash(&engine, id, MoveDirection::In, dec!(100), day(7)).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = add_stock(&engine, id, MoveDirection::Out, dec!(1), dec!(300), day(7)).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let third = add_cash(&engine, id, MoveDirection::In, dec!(50), day(7)).await;

    let (entries, _) = engine
        .ledger_statement(id, None, None, StreamSelection::Both)
        .await
        .unwrap();

    let order: Vec<Uuid> = entries.iter().map(|e| e.source_id).collect();
    assert_eq!(order, vec![first, second, third]);
}

#[tokio::test]
async fn repeated_reads_replay_identically() {
    let (engine, _db) = engine_with_db().await;
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;

    add_stock(&engine, id, MoveDirection::Out, dec!(3), dec!(150), day(1)).await;
    add_cash(&engine, id, MoveDirection::In, dec!(200), day(2)).await;
    add_stock(&engine, id, MoveDirection::In, dec!(1), dec!(150), day(3)).await;

    let first = engine
        .ledger_statement(id, None, None, StreamSelection::Both)
        .await
        .unwrap();
    let second = engine
        .ledger_statement(id, None, None, StreamSelection::Both)
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn statement_without_movements_is_empty_at_zero() {
    let (engine, _db) = engine_with_db().await;
    let id = client(&engine, "Fresh Client", ClientRole::Customer).await;

    let (entries, balance) = engine
        .ledger_statement(id, None, None, StreamSelection::Both)
        .await
        .unwrap();

    assert!(entries.is_empty());
    assert_eq!(balance, Decimal::ZERO);
}

#[tokio::test]
async fn unknown_client_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .ledger_statement(Uuid::new_v4(), None, None, StreamSelection::Both)
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::KeyNotFound("client not exists".to_string()));
}

#[tokio::test]
async fn date_window_narrows_the_fetch() {
    let (engine, _db) = engine_with_db().await;
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;

    add_stock(&engine, id, MoveDirection::Out, dec!(10), dec!(100), day(1)).await;
    add_cash(&engine, id, MoveDirection::In, dec!(400), day(10)).await;
    add_cash(&engine, id, MoveDirection::In, dec!(100), day(20)).await;

    let (entries, balance) = engine
        .ledger_statement(id, Some(day(5)), Some(day(15)), StreamSelection::Both)
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].credit, Some(dec!(400)));
    assert_eq!(balance, dec!(-400));
}

#[tokio::test]
async fn backwards_date_range_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;

    let err = engine
        .ledger_statement(id, Some(day(20)), Some(day(5)), StreamSelection::Both)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::InvalidAmount("invalid range: from must be <= to".to_string())
    );
}

#[tokio::test]
async fn stream_selection_narrows_the_statement_fetch() {
    let (engine, _db) = engine_with_db().await;
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;

    add_stock(&engine, id, MoveDirection::Out, dec!(10), dec!(100), day(1)).await;
    add_cash(&engine, id, MoveDirection::In, dec!(400), day(2)).await;

    let (entries, balance) = engine
        .ledger_statement(id, None, None, StreamSelection::Cash)
        .await
        .unwrap();

    // A fetch-level filter replays only what it fetched.
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].running_balance, dec!(-400));
    assert_eq!(balance, dec!(-400));
}

#[tokio::test]
async fn page_show_filter_keeps_two_stream_balances() {
    let (engine, _db) = engine_with_db().await;
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;

    add_stock(&engine, id, MoveDirection::Out, dec!(10), dec!(100), day(1)).await;
    add_cash(&engine, id, MoveDirection::In, dec!(400), day(2)).await;

    let page = engine
        .ledger_page(
            id,
            &LedgerQuery {
                show: StreamSelection::Cash,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Display filtering hides the stock entry but keeps its effect on the
    // running balance and the final balance.
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].kind, StreamKind::Cash);
    assert_eq!(page.entries[0].running_balance, dec!(600));
    assert_eq!(page.final_balance, dec!(600));
    assert_eq!(page.pagination.total_items, 1);
}

#[tokio::test]
async fn second_page_of_fifteen_entries() {
    let (engine, _db) = engine_with_db().await;
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;

    for d in 1..=15 {
        add_cash(&engine, id, MoveDirection::In, dec!(10), day(d)).await;
    }

    let page = engine
        .ledger_page(
            id,
            &LedgerQuery {
                page: 2,
                page_size: 10,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(page.entries.len(), 5);
    assert_eq!(page.pagination.total_items, 15);
    assert_eq!(page.pagination.total_pages, 2);
    assert!(!page.pagination.has_next);
    assert!(page.pagination.has_prev);
    assert_eq!(page.final_balance, dec!(-150));
}

#[tokio::test]
async fn page_past_the_end_is_empty_with_metadata() {
    let (engine, _db) = engine_with_db().await;
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;

    for d in 1..=15 {
        add_cash(&engine, id, MoveDirection::In, dec!(10), day(d)).await;
    }

    let page = engine
        .ledger_page(
            id,
            &LedgerQuery {
                page: 9,
                page_size: 10,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(page.entries.is_empty());
    assert_eq!(page.pagination.total_items, 15);
    assert_eq!(page.pagination.total_pages, 2);
    assert!(!page.pagination.has_next);
    assert!(page.pagination.has_prev);
}

#[tokio::test]
async fn sorting_reorders_without_touching_balances() {
    let (engine, _db) = engine_with_db().await;
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;

    add_stock(&engine, id, MoveDirection::Out, dec!(1), dec!(500), day(1)).await;
    add_cash(&engine, id, MoveDirection::In, dec!(200), day(2)).await;
    add_stock(&engine, id, MoveDirection::Out, dec!(1), dec!(50), day(3)).await;

    let page = engine
        .ledger_page(
            id,
            &LedgerQuery {
                sort: SortField::Amount,
                order: SortOrder::Desc,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let amounts: Vec<Decimal> = page.entries.iter().map(engine::LedgerEntry::amount).collect();
    assert_eq!(amounts, vec![dec!(500), dec!(200), dec!(50)]);

    let balances: Vec<Decimal> = page.entries.iter().map(|e| e.running_balance).collect();
    assert_eq!(balances, vec![dec!(500), dec!(300), dec!(350)]);
    assert_eq!(page.final_balance, dec!(350));
}

#[tokio::test]
async fn corrupt_quantity_surfaces_as_data_integrity() {
    let (engine, db) = engine_with_db().await;
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;
    let move_id = add_stock(&engine, id, MoveDirection::Out, dec!(10), dec!(100), day(1)).await;

    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE stock_moves SET quantity = ? WHERE id = ?;",
        ["garbage".into(), move_id.to_string().into()],
    ))
    .await
    .unwrap();

    let err = engine
        .ledger_statement(id, None, None, StreamSelection::Both)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::DataIntegrity(format!("stock move {move_id}: bad quantity"))
    );
}

#[tokio::test]
async fn resync_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;

    add_stock(&engine, id, MoveDirection::Out, dec!(10), dec!(100), day(1)).await;
    add_cash(&engine, id, MoveDirection::In, dec!(400), day(2)).await;

    let first = engine.resync_balance(id).await.unwrap();
    let second = engine.resync_balance(id).await.unwrap();

    assert_eq!(first, dec!(600));
    assert_eq!(second, dec!(600));
    assert_eq!(engine.client(id).await.unwrap().cached_balance, dec!(600));
}

#[tokio::test]
async fn resync_repairs_a_tampered_cache() {
    let (engine, db) = engine_with_db().await;
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;
    add_stock(&engine, id, MoveDirection::Out, dec!(10), dec!(100), day(1)).await;

    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE clients SET cached_balance = ? WHERE id = ?;",
        ["123456".into(), id.to_string().into()],
    ))
    .await
    .unwrap();

    let balance = engine.resync_balance(id).await.unwrap();

    assert_eq!(balance, dec!(1000));
    assert_eq!(engine.client(id).await.unwrap().cached_balance, dec!(1000));
}

#[tokio::test]
async fn concurrent_mutations_converge_on_the_replay_balance() {
    let (engine, _db) = engine_with_db().await;
    let engine = Arc::new(engine);
    let id = client(&engine, "Rahim Traders", ClientRole::Customer).await;

    let mut handles = Vec::new();
    for d in 1..=4 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine
                .new_cash_move(NewCashMoveCmd {
                    client_id: Some(id),
                    direction: MoveDirection::In,
                    amount: dec!(100),
                    category: "Payment".to_string(),
                    note: None,
                    occurred_on: day(d),
                })
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let (_, balance) = engine
        .ledger_statement(id, None, None, StreamSelection::Both)
        .await
        .unwrap();
    assert_eq!(balance, dec!(-400));
    assert_eq!(engine.client(id).await.unwrap().cached_balance, dec!(-400));
}
