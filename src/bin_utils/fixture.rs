use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    account::{Account, AccountId, AccountType},
    config::{ConfigError, EngineConfig},
    store::{StoreError, in_memory_store::InMemoryLedgerStore},
    user::{User, UserId},
};

#[derive(Debug, Deserialize)]
pub struct AccountSeed {
    pub id: AccountId,
    pub iban: String,
    #[serde(rename = "type")]
    pub kind: AccountType,
    pub owner: UserId,
    #[serde(default)]
    pub balance: Decimal,
    #[serde(default)]
    pub absolute_limit: Decimal,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

/// Engine settings and the initial users and accounts, read from TOML.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub engine: EngineConfig,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub accounts: Vec<AccountSeed>,
}

impl Fixture {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let fixture: Self = toml::from_str(source)?;
        fixture.engine.validate()?;
        Ok(fixture)
    }

    pub fn into_store(self) -> Result<(EngineConfig, InMemoryLedgerStore), StoreError> {
        let store = InMemoryLedgerStore::new();
        for user in self.users {
            store.insert_user(user)?;
        }
        let opened = Utc::now();
        for seed in self.accounts {
            let account = Account::open(
                seed.id,
                seed.iban,
                seed.kind,
                seed.owner,
                seed.absolute_limit,
                opened,
            )
            .with_balance(seed.balance)
            .with_active(seed.active);
            store.insert_account(account)?;
        }
        Ok((self.engine, store))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::{store::LedgerStore, user::Role};

    use super::*;

    const FIXTURE: &str = r#"
        [engine]
        house_account = 1
        max_attempts = 5

        [[users]]
        id = 1
        role = "EMPLOYEE"
        day_limit = "1000000"
        transaction_limit = "1000000"

        [[users]]
        id = 2
        role = "CUSTOMER"
        blocked = true
        day_limit = "2000"
        transaction_limit = "500.50"

        [[accounts]]
        id = 1
        iban = "NL01INHO0000000001"
        type = "CHECKING"
        owner = 1

        [[accounts]]
        id = 10
        iban = "NL10MAZE0000000010"
        type = "SAVINGS"
        owner = 2
        balance = "120.25"
        absolute_limit = "-50"
        active = false
    "#;

    #[test]
    fn seeds_store() {
        let fixture = Fixture::from_toml_str(FIXTURE).unwrap();
        assert_eq!(fixture.engine.max_attempts, 5);
        let (config, store) = fixture.into_store().unwrap();
        assert_eq!(config.house_account, 1);

        let user = store.user_by_id(2).unwrap().unwrap();
        assert_eq!(user.role, Role::Customer);
        assert!(user.blocked);
        assert_eq!(user.transaction_limit, dec!(500.50));

        let house = store.account_by_id(1).unwrap().unwrap();
        assert!(house.active);
        assert_eq!(house.balance(), Decimal::ZERO);

        let savings = store.account_by_iban("NL10MAZE0000000010").unwrap().unwrap();
        assert_eq!(savings.kind, AccountType::Savings);
        assert_eq!(savings.balance(), dec!(120.25));
        assert_eq!(savings.absolute_limit, dec!(-50));
        assert!(!savings.active);
    }

    #[test]
    fn engine_section_is_validated() {
        let err = Fixture::from_toml_str("[engine]\nhouse_account = 1\nmax_attempts = 0")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
