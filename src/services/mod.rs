pub mod artist;
pub mod error;
pub mod show;
pub mod venue;

use chrono::{DateTime, Utc};
use sea_orm::{
    DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect, TransactionError,
};

use crate::services::error::BookingError;

/// One row of a name search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Default)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

impl From<Vec<SearchHit>> for SearchResults {
    fn from(data: Vec<SearchHit>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Case-insensitive substring search on `name_column`, hits ordered by `id_column`.
///
/// SQLite's `LIKE` and `lower()` only fold ASCII, so matching happens here
/// on Unicode-lowercased names. An empty term matches every row.
pub async fn search_by_name<E>(
    conn: &DatabaseConnection,
    id_column: E::Column,
    name_column: E::Column,
    search_term: &str,
) -> Result<SearchResults, DbErr>
where
    E: EntityTrait,
{
    let rows: Vec<(i64, String)> = E::find()
        .select_only()
        .column(id_column)
        .column(name_column)
        .order_by_asc(id_column)
        .into_tuple()
        .all(conn)
        .await?;

    let needle = search_term.to_lowercase();
    Ok(rows
        .into_iter()
        .filter(|(_, name)| name_matches(name, &needle))
        .map(|(id, name)| SearchHit { id, name })
        .collect::<Vec<_>>()
        .into())
}

fn name_matches(name: &str, lowercase_term: &str) -> bool {
    name.to_lowercase().contains(lowercase_term)
}

/// Shows split around a reference instant. A show starting exactly at
/// that instant is in neither list.
#[derive(Clone, Debug)]
pub struct ShowsByTime<T> {
    pub past: Vec<T>,
    pub upcoming: Vec<T>,
}

impl<T> ShowsByTime<T> {
    pub fn partition(
        shows: impl IntoIterator<Item = T>,
        start_time: impl Fn(&T) -> DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut past = Vec::new();
        let mut upcoming = Vec::new();

        for show in shows {
            let start = start_time(&show);
            if start < now {
                past.push(show);
            } else if start > now {
                upcoming.push(show);
            }
        }

        Self { past, upcoming }
    }
}

/// Map the outcome of a failed `transaction` call. Errors raised inside the
/// callback keep their type; connection-level failures become persistence errors.
pub(crate) fn transaction_failed(
    action: &str,
    err: TransactionError<color_eyre::Report>,
) -> color_eyre::Report {
    let report = match err {
        TransactionError::Connection(source) => BookingError::persistence(action, source),
        TransactionError::Transaction(report) => report,
    };
    log::error!("Rolled back: failed to {}: {:?}", action, report);
    report
}

/// Wrap a store error raised inside a transaction callback
pub(crate) fn db_failed(action: &str) -> impl FnOnce(sea_orm::DbErr) -> color_eyre::Report + '_ {
    move |source| BookingError::persistence(action, source)
}
