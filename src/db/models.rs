use crate::types::{UserRecord, parse_date};
use sqlx::FromRow;

/// Row shape of the `users` table. Dates travel as text.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
}

impl TryFrom<DbUser> for UserRecord {
    type Error = sqlx::Error;

    fn try_from(d: DbUser) -> Result<Self, Self::Error> {
        let date_of_birth =
            parse_date(&d.date_of_birth).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(UserRecord {
            id: d.id,
            first_name: d.first_name,
            last_name: d.last_name,
            date_of_birth,
        })
    }
}
