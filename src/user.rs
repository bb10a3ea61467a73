use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type UserId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Customer,
    Employee,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: UserId,
    pub role: Role,
    #[serde(default)]
    pub blocked: bool,
    /// Max cumulative outgoing amount per UTC day.
    pub day_limit: Decimal,
    /// Max amount of a single transaction.
    pub transaction_limit: Decimal,
}

/// Authenticated caller, as handed over by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUser {
    pub id: UserId,
    pub role: Role,
    pub blocked: bool,
}

impl ActingUser {
    pub fn is_employee(&self) -> bool {
        self.role == Role::Employee
    }
}

impl From<&User> for ActingUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            blocked: user.blocked,
        }
    }
}
