//! Display shaping for balanced statements.
//!
//! Everything here runs after the replay. Filtering, sorting and paging only
//! decide which entries are shown and in what order; `debit`, `credit` and
//! `running_balance` are carried through untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EngineError, LedgerEntry, ResultEngine, StreamSelection};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Kind,
    Direction,
    Balance,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Page metadata, always computed from the pre-slice entry count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_items: u64,
    pub total_pages: u64,
    pub page: u64,
    pub page_size: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// A display-shaped slice of a client statement.
///
/// `final_balance` is the balance of the whole replayed window, not of the
/// slice; it does not move when the view is filtered or re-sorted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LedgerPage {
    pub entries: Vec<LedgerEntry>,
    pub final_balance: Decimal,
    pub pagination: Pagination,
}

/// Drops entries of streams the view does not show. Running balances keep
/// the values they were replayed with.
pub fn filter_by_stream(entries: Vec<LedgerEntry>, selection: StreamSelection) -> Vec<LedgerEntry> {
    match selection {
        StreamSelection::Both => entries,
        _ => entries
            .into_iter()
            .filter(|entry| selection.includes(entry.kind))
            .collect(),
    }
}

/// Reorders entries by one field.
///
/// The sort is stable, so entries that compare equal keep the chronological
/// order they were replayed in.
pub fn sorted(mut entries: Vec<LedgerEntry>, field: SortField, order: SortOrder) -> Vec<LedgerEntry> {
    entries.sort_by(|a, b| {
        let cmp = match field {
            SortField::Date => a.occurred_on.cmp(&b.occurred_on),
            SortField::Amount => a.amount().cmp(&b.amount()),
            SortField::Kind => a.kind.as_str().cmp(b.kind.as_str()),
            SortField::Direction => a.direction.as_str().cmp(b.direction.as_str()),
            SortField::Balance => a.running_balance.cmp(&b.running_balance),
        };
        match order {
            SortOrder::Asc => cmp,
            SortOrder::Desc => cmp.reverse(),
        }
    });
    entries
}

/// Slices one page out of `entries`.
///
/// Pages are 1-based. A page past the end yields no entries but still full
/// metadata, so a client that trims its page number can recover.
pub fn paginate(
    entries: Vec<LedgerEntry>,
    page: u64,
    page_size: u64,
) -> ResultEngine<(Vec<LedgerEntry>, Pagination)> {
    if page == 0 {
        return Err(EngineError::InvalidAmount("page must be >= 1".to_string()));
    }
    if page_size == 0 {
        return Err(EngineError::InvalidAmount(
            "page_size must be >= 1".to_string(),
        ));
    }

    let total_items = entries.len() as u64;
    let total_pages = total_items.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size);

    let page_entries = entries
        .into_iter()
        .skip(start as usize)
        .take(page_size as usize)
        .collect();

    let pagination = Pagination {
        total_items,
        total_pages,
        page,
        page_size,
        has_next: page < total_pages,
        has_prev: page > 1 && total_pages > 0,
    };

    Ok((page_entries, pagination))
}
