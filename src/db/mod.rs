//! Database module: schema store, row models and queries.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and conversions
//! - `schema.rs`: SQL DDL and the reflected table definition (SQLite-first)
//! - `sqlite.rs`: `SchemaStore` plus insert/select operations

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::DbUser;
pub use schema::{ColumnDef, SQLITE_INIT, TableDefinition, USERS_TABLE};
pub use sqlite::{Connection, SchemaStore, SqlitePool, find_users, get_user, insert_user};
