//! Ledger construction: sign conventions, stream merge, running balance.
//!
//! Everything in this module is synchronous and side-effect free. The ops
//! layer fetches movements from the store, hands them to [`replay`] and
//! persists nothing here but the final balance it gets back.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CashMove, ClientRole, EngineError, StockMove};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Stock,
    Cash,
}

impl StreamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Cash => "cash",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    In,
    Out,
}

impl MoveDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl TryFrom<&str> for MoveDirection {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            other => Err(EngineError::DataIntegrity(format!(
                "invalid move direction: {other}"
            ))),
        }
    }
}

/// Statement column an amount is printed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerSide {
    Debit,
    Credit,
}

/// How one movement lands on a statement: the column it is printed under and
/// whether it raises or settles the balance.
///
/// The two are independent. A positive balance always reads "the customer
/// owes us" / "we owe the supplier", while the printed column for supplier
/// cash follows the cash book, so there a debit entry can settle the balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignConvention {
    pub side: LedgerSide,
    pub raises_balance: bool,
}

impl SignConvention {
    pub fn signed_delta(self, amount: Decimal) -> Decimal {
        if self.raises_balance { amount } else { -amount }
    }
}

/// Maps (role, stream, direction) to its statement convention.
///
/// All eight combinations are spelled out on purpose; collapsing arms here
/// silently reverses who owes whom.
pub fn resolve(role: ClientRole, kind: StreamKind, direction: MoveDirection) -> SignConvention {
    use ClientRole::{Customer, Supplier};
    use LedgerSide::{Credit, Debit};
    use MoveDirection::{In, Out};
    use StreamKind::{Cash, Stock};

    let (side, raises_balance) = match (role, kind, direction) {
        // Goods to a customer raise what they owe; returns settle it.
        (Customer, Stock, Out) => (Debit, true),
        (Customer, Stock, In) => (Credit, false),
        // Goods from a supplier raise what we owe; returns settle it.
        (Supplier, Stock, In) => (Debit, true),
        (Supplier, Stock, Out) => (Credit, false),
        // Customer cash: payments settle, payouts raise.
        (Customer, Cash, In) => (Credit, false),
        (Customer, Cash, Out) => (Debit, true),
        // Supplier cash: the column tracks the cash book, the balance the
        // debt, so side and sign disagree on these two rows.
        (Supplier, Cash, In) => (Credit, true),
        (Supplier, Cash, Out) => (Debit, false),
    };

    SignConvention {
        side,
        raises_balance,
    }
}

/// Which movement streams a ledger read covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamSelection {
    #[default]
    Both,
    Stock,
    Cash,
}

impl StreamSelection {
    pub fn includes(self, kind: StreamKind) -> bool {
        match self {
            Self::Both => true,
            Self::Stock => kind == StreamKind::Stock,
            Self::Cash => kind == StreamKind::Cash,
        }
    }
}

/// One fetched movement, tagged with the stream it came from.
#[derive(Clone, Debug, PartialEq)]
pub enum Movement {
    Stock(StockMove),
    Cash(CashMove),
}

impl Movement {
    pub fn kind(&self) -> StreamKind {
        match self {
            Self::Stock(_) => StreamKind::Stock,
            Self::Cash(_) => StreamKind::Cash,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Stock(m) => m.id,
            Self::Cash(m) => m.id,
        }
    }

    pub fn direction(&self) -> MoveDirection {
        match self {
            Self::Stock(m) => m.direction,
            Self::Cash(m) => m.direction,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Self::Stock(m) => m.amount,
            Self::Cash(m) => m.amount,
        }
    }

    pub fn occurred_on(&self) -> NaiveDate {
        match self {
            Self::Stock(m) => m.occurred_on,
            Self::Cash(m) => m.occurred_on,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Stock(m) => m.created_at,
            Self::Cash(m) => m.created_at,
        }
    }
}

/// One line of a client statement, carrying the balance after itself.
///
/// Exactly one of `debit`/`credit` is set. `quantity` and `rate` are only
/// present for stock lines; `particulars` holds the item or cash category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub client_id: Uuid,
    pub source_id: Uuid,
    pub kind: StreamKind,
    pub direction: MoveDirection,
    pub occurred_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub particulars: Option<String>,
    pub quantity: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
    pub running_balance: Decimal,
}

impl LedgerEntry {
    pub fn amount(&self) -> Decimal {
        self.debit.or(self.credit).unwrap_or_default()
    }
}

/// Replays `movements` for one client into a balanced statement.
///
/// Movements are sorted by (business date, creation timestamp, id) and
/// walked once with an accumulator seeded at zero; each produced entry
/// carries the balance after itself and the second return value is the final
/// balance of the replayed window. The input order does not matter, only the
/// sort decides replay order, so the result is deterministic for a given set
/// of movements. No movements yield an empty statement at balance zero.
pub fn replay(
    client_id: Uuid,
    role: ClientRole,
    mut movements: Vec<Movement>,
) -> (Vec<LedgerEntry>, Decimal) {
    movements.sort_by_key(|m| (m.occurred_on(), m.created_at(), m.id()));

    let mut entries = Vec::with_capacity(movements.len());
    let mut balance = Decimal::ZERO;

    for movement in movements {
        let convention = resolve(role, movement.kind(), movement.direction());
        let amount = movement.amount();
        balance += convention.signed_delta(amount);

        let (debit, credit) = match convention.side {
            LedgerSide::Debit => (Some(amount), None),
            LedgerSide::Credit => (None, Some(amount)),
        };

        let (particulars, quantity, rate) = match &movement {
            Movement::Stock(m) => (m.item.clone(), Some(m.quantity), Some(m.rate)),
            Movement::Cash(m) => (Some(m.category.clone()), None, None),
        };

        entries.push(LedgerEntry {
            client_id,
            source_id: movement.id(),
            kind: movement.kind(),
            direction: movement.direction(),
            occurred_on: movement.occurred_on(),
            created_at: movement.created_at(),
            particulars,
            quantity,
            rate,
            debit,
            credit,
            running_balance: balance,
        });
    }

    (entries, balance)
}
