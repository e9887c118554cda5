//! Chunked multi-row inserts

use sqlx::{query_builder::Separated, PgConnection, Postgres, QueryBuilder};

/// Rows per INSERT statement. Postgres caps bind parameters at 65535, so
/// 3000 rows leaves room for tables with up to 21 columns.
pub const BULK_INSERT_CHUNK_SIZE: usize = 3000;

/// Insert `rows` with one statement per chunk. `insert_head` is everything up
/// to `VALUES`, e.g. `INSERT INTO copies (id, isbn) `. Returns rows written.
pub async fn insert_chunked<T, F>(
    conn: &mut PgConnection,
    insert_head: &str,
    rows: &[T],
    mut push_row: F,
) -> Result<u64, sqlx::Error>
where
    F: FnMut(Separated<'_, '_, Postgres, &'static str>, &T),
{
    let mut written = 0;
    for chunk in rows.chunks(BULK_INSERT_CHUNK_SIZE) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(insert_head);
        builder.push_values(chunk, |b, row| push_row(b, row));
        written += builder.build().execute(&mut *conn).await?.rows_affected();
    }
    Ok(written)
}
