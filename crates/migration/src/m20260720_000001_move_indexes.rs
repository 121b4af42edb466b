//! Composite (client_id, occurred_on) indexes on both movement tables.
//!
//! Statement reads filter by client and an inclusive date window; the
//! single-column client indexes from the initial schema are not enough once
//! day books grow past a few thousand rows.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum StockMoves {
    Table,
    ClientId,
    OccurredOn,
}

#[derive(Iden)]
enum CashMoves {
    Table,
    ClientId,
    OccurredOn,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx-stock_moves-client_id-occurred_on")
                    .table(StockMoves::Table)
                    .col(StockMoves::ClientId)
                    .col(StockMoves::OccurredOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cash_moves-client_id-occurred_on")
                    .table(CashMoves::Table)
                    .col(CashMoves::ClientId)
                    .col(CashMoves::OccurredOn)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx-cash_moves-client_id-occurred_on")
                    .table(CashMoves::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx-stock_moves-client_id-occurred_on")
                    .table(StockMoves::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
