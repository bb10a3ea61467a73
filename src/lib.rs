/// Bank accounts and the balance events that move money in and out of them.
pub mod account;

/// Customers and employees, plus the authenticated caller handed in by the identity provider.
pub mod user;

/// Ledger entries and the projection returned to callers.
pub mod transaction;

/// Parses raw requests into commands that later are validated and executed.
pub mod command;

/// Day, transaction and absolute limit rules.
pub mod limits;

/// Ordered validation pipeline for transfers and ATM actions.
pub mod validator;

/// Turns a validated transaction into updated account rows.
pub mod mutator;

/// Ledger store interface, plus "in memory" implementation.
pub mod store;

/// Transaction engine interface and its implementation on top of a [`store::LedgerStore`].
/// Coordinates lookups, validation, mutation and commit.
pub mod processor;

/// Source of the current time and UTC day, swappable in tests.
pub mod clock;

/// Engine settings loaded from TOML.
pub mod config;

/// Bootstraps the engine from a TOML fixture and replays CSV operations against it.
/// Lives in the library so integration tests can drive it.
pub mod bin_utils;
