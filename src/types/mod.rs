//! Wire and domain types for user records.
//!
//! - `date.rs`: strict `YYYY-MM-DD` parsing and formatting
//! - `user.rs`: request, filter, record and response shapes

pub mod date;
pub mod user;

pub use date::{ValidationError, format_date, parse_date};
pub use user::{CreateUser, NewUser, UserFilter, UserQuery, UserRead, UserRecord, Validate};
