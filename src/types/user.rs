use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::date::{ValidationError, format_date, parse_date};

/// Shape checks run by the request extractors before a handler sees the value.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// A persisted user. `id` is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

/// A user about to be inserted; no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

/// `POST /users/` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[serde(alias = "first_name")]
    pub first_name: String,
    #[serde(alias = "last_name")]
    pub last_name: String,
    #[serde(alias = "date_of_birth")]
    pub date_of_birth: String,
}

impl Validate for CreateUser {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "firstName" });
        }
        if self.last_name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "lastName" });
        }
        parse_date(&self.date_of_birth).map(|_| ())
    }
}

impl CreateUser {
    /// Parse the date again and build the insertable record.
    pub fn into_new_user(self) -> Result<NewUser, ValidationError> {
        let date_of_birth = parse_date(&self.date_of_birth)?;
        Ok(NewUser {
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth,
        })
    }
}

/// `GET /users/` query string. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    #[serde(alias = "first_name")]
    pub first_name: Option<String>,
    #[serde(alias = "last_name")]
    pub last_name: Option<String>,
    #[serde(alias = "date_of_birth")]
    pub date_of_birth: Option<String>,
}

impl UserQuery {
    // An empty `dateOfBirth=` means "not supplied".
    fn date_text(&self) -> Option<&str> {
        self.date_of_birth.as_deref().filter(|s| !s.is_empty())
    }

    pub fn to_filter(&self) -> Result<UserFilter, ValidationError> {
        let date_of_birth = self.date_text().map(parse_date).transpose()?;
        Ok(UserFilter {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            date_of_birth,
        })
    }
}

impl Validate for UserQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.date_text() {
            Some(text) => parse_date(text).map(|_| ()),
            None => Ok(()),
        }
    }
}

/// Parsed filter. `None` leaves the column unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Response shape for both endpoints; the date is always text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRead {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
}

impl From<UserRecord> for UserRead {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            date_of_birth: format_date(r.date_of_birth),
        }
    }
}
