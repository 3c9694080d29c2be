use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

use crate::db::SchemaStore;
use crate::handlers::{create_user, list_users};
use crate::middleware::{catch_unclassified, not_found};

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct UsersState {
    pub store: SchemaStore,
}

impl UsersState {
    pub fn new(store: SchemaStore) -> Self {
        Self { store }
    }
}

pub fn users_router(state: UsersState) -> Router {
    Router::new()
        .route("/users/", get(list_users).post(create_user))
        .route("/users", get(list_users).post(create_user))
        .fallback(not_found)
        .layer(middleware::from_fn(catch_unclassified))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
