use rusqlite::{types::Type, Row};

/// Build a model from a `SELECT *` row of its table.
pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Read a column holding a short text code (a unit, say) and decode it,
/// failing the row on codes `parse` does not know.
pub(crate) fn code_column<T>(
    row: &Row,
    column: &str,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(column)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            format!("unknown code {raw:?} in column {column}").into(),
        )
    })
}
