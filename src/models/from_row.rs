use rusqlite::Row;

/// Mapping from a SQLite result row, named-column based so queries can
/// alias joined columns.
pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}
