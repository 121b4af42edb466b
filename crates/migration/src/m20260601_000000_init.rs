//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Munim:
//!
//! - `clients`: customers and suppliers with a cached running balance
//! - `stock_moves`: goods in/out with quantity, rate and derived amount
//! - `cash_moves`: money in/out with a category

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Clients {
    Table,
    Id,
    Name,
    Role,
    Phone,
    Address,
    CachedBalance,
    Active,
    CreatedAt,
}

#[derive(Iden)]
enum StockMoves {
    Table,
    Id,
    ClientId,
    Direction,
    Item,
    Quantity,
    Rate,
    Amount,
    OccurredOn,
    CreatedAt,
}

#[derive(Iden)]
enum CashMoves {
    Table,
    Id,
    ClientId,
    Direction,
    Amount,
    Category,
    Note,
    OccurredOn,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Clients
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clients::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clients::Name).string().not_null())
                    .col(ColumnDef::new(Clients::Role).string().not_null())
                    .col(ColumnDef::new(Clients::Phone).string())
                    .col(ColumnDef::new(Clients::Address).string())
                    .col(
                        ColumnDef::new(Clients::CachedBalance)
                            .string()
                            .not_null()
                            .default("0"),
                    )
                    .col(ColumnDef::new(Clients::Active).boolean().not_null())
                    .col(ColumnDef::new(Clients::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-clients-name-unique")
                    .table(Clients::Table)
                    .col(Clients::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Stock moves
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(StockMoves::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockMoves::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StockMoves::ClientId).string())
                    .col(ColumnDef::new(StockMoves::Direction).string().not_null())
                    .col(ColumnDef::new(StockMoves::Item).string())
                    .col(ColumnDef::new(StockMoves::Quantity).string().not_null())
                    .col(ColumnDef::new(StockMoves::Rate).string().not_null())
                    .col(ColumnDef::new(StockMoves::Amount).string().not_null())
                    .col(ColumnDef::new(StockMoves::OccurredOn).date().not_null())
                    .col(
                        ColumnDef::new(StockMoves::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stock_moves-client_id")
                            .from(StockMoves::Table, StockMoves::ClientId)
                            .to(Clients::Table, Clients::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-stock_moves-client_id")
                    .table(StockMoves::Table)
                    .col(StockMoves::ClientId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Cash moves
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CashMoves::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashMoves::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CashMoves::ClientId).string())
                    .col(ColumnDef::new(CashMoves::Direction).string().not_null())
                    .col(ColumnDef::new(CashMoves::Amount).string().not_null())
                    .col(ColumnDef::new(CashMoves::Category).string().not_null())
                    .col(ColumnDef::new(CashMoves::Note).string())
                    .col(ColumnDef::new(CashMoves::OccurredOn).date().not_null())
                    .col(ColumnDef::new(CashMoves::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cash_moves-client_id")
                            .from(CashMoves::Table, CashMoves::ClientId)
                            .to(Clients::Table, Clients::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cash_moves-client_id")
                    .table(CashMoves::Table)
                    .col(CashMoves::ClientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(CashMoves::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StockMoves::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await?;
        Ok(())
    }
}
