//! Users service rules: users plus the roles and countries they reference.

pub mod user;

pub use user::{COUNTRIES, ROLES, USER_STATUSES, USERS, UserRules, UserService};
