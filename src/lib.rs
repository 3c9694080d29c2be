pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod types;

pub use db::SchemaStore;
pub use error::{ApiError, UserError};
pub use router::{UsersState, users_router};
