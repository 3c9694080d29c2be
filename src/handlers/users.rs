use axum::{
    Json,
    extract::{OriginalUri, State},
};
use tracing::{error, info, warn};

use crate::db::{SchemaStore, find_users, insert_user};
use crate::error::{ApiError, UserError};
use crate::middleware::{ValidatedJson, ValidatedQuery};
use crate::router::UsersState;
use crate::types::{CreateUser, UserQuery, UserRead};

/// POST /users/ -> stores a new user and echoes it with its id.
pub async fn create_user(
    State(state): State<UsersState>,
    OriginalUri(uri): OriginalUri,
    ValidatedJson(payload): ValidatedJson<CreateUser>,
) -> Result<Json<UserRead>, ApiError> {
    create_record(&state.store, payload)
        .await
        .map(Json)
        .map_err(|e| ApiError::new(e, uri.path()))
}

/// GET /users/ -> every user matching the supplied filters; 404 when none do.
pub async fn list_users(
    State(state): State<UsersState>,
    OriginalUri(uri): OriginalUri,
    ValidatedQuery(query): ValidatedQuery<UserQuery>,
) -> Result<Json<Vec<UserRead>>, ApiError> {
    query_records(&state.store, query)
        .await
        .map(Json)
        .map_err(|e| ApiError::new(e, uri.path()))
}

pub async fn create_record(
    store: &SchemaStore,
    payload: CreateUser,
) -> Result<UserRead, UserError> {
    info!(
        first_name = %payload.first_name,
        last_name = %payload.last_name,
        date_of_birth = %payload.date_of_birth,
        "creating user"
    );

    let new_user = payload.into_new_user().inspect_err(|e| {
        warn!(input = %e.input(), "invalid date format");
    })?;

    let mut conn = store.acquire().await.inspect_err(log_storage_error)?;
    let record = insert_user(&mut conn, new_user)
        .await
        .inspect_err(log_storage_error)?;

    info!(id = record.id, "user created");
    Ok(record.into())
}

pub async fn query_records(
    store: &SchemaStore,
    query: UserQuery,
) -> Result<Vec<UserRead>, UserError> {
    info!(
        first_name = ?query.first_name,
        last_name = ?query.last_name,
        date_of_birth = ?query.date_of_birth,
        "fetching users"
    );

    let filter = query.to_filter().inspect_err(|e| {
        warn!(input = %e.input(), "invalid date format");
    })?;

    let mut conn = store.acquire().await.inspect_err(log_storage_error)?;
    let users = find_users(&mut conn, &filter)
        .await
        .inspect_err(log_storage_error)?;

    if users.is_empty() {
        return Err(UserError::RecordsNotFound);
    }

    info!(count = users.len(), "found users");
    Ok(users.into_iter().map(UserRead::from).collect())
}

fn log_storage_error(e: &sqlx::Error) {
    error!(error = %e, "database error");
}
