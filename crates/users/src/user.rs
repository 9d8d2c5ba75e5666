use serde_json::Value;

use mockrest_core::{
    AllowedValues, DomainError, DomainResult, Interceptor, Record, Sequence, WriteContext,
    default_create, exists, is_present, new_entity, stamp_updated, unique_ci, with_leading_id,
};

pub const USERS: &str = "users";
pub const ROLES: &str = "roles";
pub const COUNTRIES: &str = "countries";

pub const USER_STATUSES: AllowedValues =
    AllowedValues::new("status", &["active", "inactive", "suspended"])
        .with_hint(AllowedValues::USE_ONE_OF);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRules {
    pub statuses: AllowedValues,
}

impl Default for UserRules {
    fn default() -> Self {
        Self {
            statuses: USER_STATUSES,
        }
    }
}

/// Users service interceptor.
#[derive(Debug, Clone, Default)]
pub struct UserService {
    rules: UserRules,
}

impl UserService {
    pub fn new(rules: UserRules) -> Self {
        Self { rules }
    }

    /// Email must be unique (ignoring case), status valid if given, and both
    /// `roleId` and `countryId` must resolve.
    pub fn create_user(&self, ctx: &WriteContext<'_>, body: Record) -> DomainResult<Record> {
        let email = body.get("email").and_then(Value::as_str).unwrap_or("");
        if !unique_ci(ctx.view, USERS, "email", email) {
            return Err(DomainError::duplicate("Email already exists."));
        }

        self.rules.statuses.check_if_present(&body)?;

        let role = body.get("roleId").unwrap_or(&Value::Null);
        let country = body.get("countryId").unwrap_or(&Value::Null);
        if !exists(ctx.view, ROLES, role) || !exists(ctx.view, COUNTRIES, country) {
            return Err(DomainError::invalid_reference("Invalid roleId or countryId"));
        }

        let id = Sequence::next(ctx.view, USERS);
        Ok(new_entity(Value::from(id), body, ctx.now))
    }

    /// Unlike creation, each reference is checked on its own and only when
    /// the patch carries it.
    pub fn check_user_patch(&self, ctx: &WriteContext<'_>, patch: &Record) -> DomainResult<()> {
        self.rules.statuses.check_if_present(patch)?;

        for (field, collection) in [("roleId", ROLES), ("countryId", COUNTRIES)] {
            if is_present(patch, field) && !patch.get(field).is_some_and(|id| exists(ctx.view, collection, id)) {
                return Err(DomainError::invalid_reference(format!("Invalid {field}")));
            }
        }
        Ok(())
    }
}

impl Interceptor for UserService {
    fn on_create(&self, ctx: &WriteContext<'_>, body: Record) -> DomainResult<Record> {
        match ctx.collection {
            USERS => self.create_user(ctx, body).inspect_err(|e| {
                tracing::warn!(error = %e, "user create rejected");
            }),
            ROLES | COUNTRIES => {
                let id = Sequence::next(ctx.view, ctx.collection);
                Ok(with_leading_id(Value::from(id), body))
            }
            _ => Ok(default_create(ctx, body)),
        }
    }

    fn on_update(&self, ctx: &WriteContext<'_>, patch: &mut Record, _existing: Option<&Record>) -> DomainResult<()> {
        if ctx.collection != USERS {
            return Ok(());
        }
        stamp_updated(patch, ctx.now);
        self.check_user_patch(ctx, patch).inspect_err(|e| {
            tracing::warn!(error = %e, "user update rejected");
        })
    }
}
