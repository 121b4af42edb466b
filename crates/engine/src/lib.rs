pub use cash_moves::CashMove;
pub use clients::{Client, ClientRole};
pub use error::EngineError;
pub use ledger::{
    LedgerEntry, LedgerSide, MoveDirection, Movement, SignConvention, StreamKind, StreamSelection,
    replay, resolve,
};
pub use ops::{
    ClientPatch, Engine, EngineBuilder, LedgerQuery, MoveListFilter, NewCashMoveCmd, NewClientCmd,
    NewStockMoveCmd, UpdateCashMoveCmd, UpdateClientCmd, UpdateStockMoveCmd,
};
pub use statement::{LedgerPage, Pagination, SortField, SortOrder};
pub use stock_moves::StockMove;

mod cash_moves;
mod clients;
mod error;
mod ledger;
mod ops;
pub mod statement;
mod stock_moves;

type ResultEngine<T> = Result<T, EngineError>;
