use crate::db::models::DbUser;
use crate::db::schema::{ColumnDef, SQLITE_INIT, TableDefinition, USERS_TABLE};
use crate::types::{NewUser, UserFilter, UserRecord, format_date};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Connection as _, Pool, QueryBuilder, Row, Sqlite, SqliteConnection};
use std::path::Path;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

/// A pooled connection. Returned to the pool when dropped.
pub type Connection = PoolConnection<Sqlite>;

const SELECT_USERS: &str = "SELECT id, first_name, last_name, date_of_birth FROM users";

/// Owns the database file and guarantees the `users` table exists.
#[derive(Clone)]
pub struct SchemaStore {
    pool: SqlitePool,
    table: TableDefinition,
}

impl SchemaStore {
    /// Open (creating if needed) the database file and make sure the table exists.
    ///
    /// An existing table is reflected as-is; nothing is altered or migrated.
    pub async fn initialize(database_file: impl AsRef<Path>) -> Result<Self, sqlx::Error> {
        let database_file = database_file.as_ref();
        let connect_opts = SqliteConnectOptions::new()
            .filename(database_file)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;

        if table_exists(&pool, USERS_TABLE).await? {
            info!(path = %database_file.display(), "database schema already exists; skipping initialization");
        } else {
            info!(path = %database_file.display(), "users table not found; creating schema");
            sqlx::query(SQLITE_INIT).execute(&pool).await?;
            info!(path = %database_file.display(), "database schema created");
        }

        let table = reflect_table(&pool, USERS_TABLE).await?;
        Ok(Self { pool, table })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn table(&self) -> &TableDefinition {
        &self.table
    }

    /// Check out a connection for one request.
    pub async fn acquire(&self) -> Result<Connection, sqlx::Error> {
        self.pool.acquire().await
    }

    /// Close every pooled connection; later `acquire` calls fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

async fn table_exists(pool: &SqlitePool, name: &str) -> Result<bool, sqlx::Error> {
    let found: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

async fn reflect_table(pool: &SqlitePool, name: &str) -> Result<TableDefinition, sqlx::Error> {
    // PRAGMA arguments cannot be bound.
    let rows = sqlx::query(&format!("PRAGMA table_info({name})"))
        .fetch_all(pool)
        .await?;
    let columns = rows
        .into_iter()
        .map(row_to_column)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TableDefinition {
        name: name.to_string(),
        columns,
    })
}

fn row_to_column(row: SqliteRow) -> Result<ColumnDef, sqlx::Error> {
    let name: String = row.try_get("name")?;
    let sql_type: String = row.try_get("type")?;
    let not_null: i64 = row.try_get("notnull")?;
    let pk: i64 = row.try_get("pk")?;
    Ok(ColumnDef {
        name,
        sql_type,
        not_null: not_null != 0,
        primary_key: pk != 0,
    })
}

/// Insert one user in its own transaction and read it back with its new id.
pub async fn insert_user(
    conn: &mut SqliteConnection,
    user: NewUser,
) -> Result<UserRecord, sqlx::Error> {
    let mut tx = conn.begin().await?;
    let id = sqlx::query(
        "INSERT INTO users (first_name, last_name, date_of_birth) VALUES (?, ?, ?)",
    )
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(format_date(user.date_of_birth))
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    // Read back before commit so a failed read leaves nothing stored.
    let record = get_user(&mut tx, id).await?;
    tx.commit().await?;
    Ok(record)
}

pub async fn get_user(conn: &mut SqliteConnection, id: i64) -> Result<UserRecord, sqlx::Error> {
    let row: DbUser = sqlx::query_as(&format!("{SELECT_USERS} WHERE id = ?"))
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    row.try_into()
}

/// All users matching every supplied field of `filter`, ordered by id.
pub async fn find_users(
    conn: &mut SqliteConnection,
    filter: &UserFilter,
) -> Result<Vec<UserRecord>, sqlx::Error> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_USERS);
    query.push(" WHERE 1 = 1");
    if let Some(first_name) = &filter.first_name {
        query.push(" AND first_name = ").push_bind(first_name.clone());
    }
    if let Some(last_name) = &filter.last_name {
        query.push(" AND last_name = ").push_bind(last_name.clone());
    }
    if let Some(date_of_birth) = filter.date_of_birth {
        query
            .push(" AND date_of_birth = ")
            .push_bind(format_date(date_of_birth));
    }
    query.push(" ORDER BY id");

    let rows = query
        .build_query_as::<DbUser>()
        .fetch_all(&mut *conn)
        .await?;
    rows.into_iter().map(UserRecord::try_from).collect()
}
