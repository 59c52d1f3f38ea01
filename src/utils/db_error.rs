/// Returns true if `e` is a unique violation on `urls.short_key`.
///
/// SQLite does not report constraint names, so the failing column is read
/// from the message (`UNIQUE constraint failed: urls.short_key`).
pub fn is_unique_violation_on_key(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.message().contains("short_key")
}
