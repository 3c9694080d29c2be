pub mod users;

pub use users::{create_record, create_user, list_users, query_records};
