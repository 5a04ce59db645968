//! User model

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{MIN_USERNAME_LENGTH, UNASSIGNED_ID};

/// A person who submits exercises
///
/// The password lives only in the store and is never kept on the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct User {
    /// Surrogate key, `UNASSIGNED_ID` until the user has been persisted
    pub id: i64,
    #[validate(length(min = MIN_USERNAME_LENGTH))]
    pub username: String,
    pub firstname: String,
    pub lastname: String,
}

impl User {
    /// Create a user that has not been persisted yet
    pub fn new(
        username: impl Into<String>,
        firstname: impl Into<String>,
        lastname: impl Into<String>,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            username: username.into(),
            firstname: firstname.into(),
            lastname: lastname.into(),
        }
    }

    /// Check if the user has been assigned a surrogate key
    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.firstname, self.lastname)
    }
}

/// Row shape of the `User` table without the password column
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            firstname: row.firstname.unwrap_or_default(),
            lastname: row.lastname.unwrap_or_default(),
        }
    }
}
