use serde::Serialize;
use serde_json::Value;

use mockrest_core::{
    AllowedValues, DomainError, DomainResult, Interceptor, Record, Sequence, WriteContext,
    default_create, exists, is_present, new_entity, stamp_updated, timestamp, unique_ci,
};

pub const POSTS: &str = "posts";
pub const USERS: &str = "users";
pub const CATEGORIES: &str = "categories";

pub const POST_STATUSES: AllowedValues =
    AllowedValues::new("status", &["draft", "published", "archived"]);

const INVALID_REFERENCES: &str = "Invalid userId or categoryId";
const EMAIL_TAKEN: &str = "Email already exists.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostRules {
    pub statuses: AllowedValues,
}

impl Default for PostRules {
    fn default() -> Self {
        Self {
            statuses: POST_STATUSES,
        }
    }
}

/// A fully enriched post, in response field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    pub user_id: Value,
    pub category_id: Value,
    pub status: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl Post {
    pub fn into_record(self) -> Record {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Record::new(),
        }
    }
}

/// Posts service interceptor.
#[derive(Debug, Clone, Default)]
pub struct PostService {
    rules: PostRules,
}

impl PostService {
    pub fn new(rules: PostRules) -> Self {
        Self { rules }
    }

    /// Validate a draft post (status required, both references resolvable)
    /// and assemble the stored post.
    pub fn create_post(&self, ctx: &WriteContext<'_>, draft: &Record) -> DomainResult<Post> {
        self.rules.statuses.check_required(draft)?;

        let user_id = draft.get("userId").cloned().unwrap_or(Value::Null);
        let category_id = draft.get("categoryId").cloned().unwrap_or(Value::Null);
        check_references(ctx, &user_id, &category_id)?;

        let stamp = timestamp(ctx.now);
        Ok(Post {
            id: Sequence::next(ctx.view, ctx.collection),
            title: draft.get("title").cloned(),
            content: draft.get("content").cloned(),
            user_id,
            category_id,
            status: draft.get("status").cloned().unwrap_or(Value::Null),
            created_at: stamp.clone(),
            updated_at: stamp,
        })
    }

    /// Re-validate the post fields a patch touches.
    ///
    /// `userId` and `categoryId` are checked together: when either is in the
    /// patch, both must resolve. The one the patch leaves out is taken from the
    /// stored post.
    pub fn check_post_patch(&self, ctx: &WriteContext<'_>, patch: &Record, existing: Option<&Record>) -> DomainResult<()> {
        self.rules.statuses.check_if_present(patch)?;

        if is_present(patch, "userId") || is_present(patch, "categoryId") {
            // A replacement keeps nothing from the stored record, so a key it
            // omits is missing rather than inherited.
            let stored = if ctx.replace { None } else { existing };
            let effective = |field: &str| {
                patch
                    .get(field)
                    .or_else(|| stored.and_then(|r| r.get(field)))
                    .cloned()
                    .unwrap_or(Value::Null)
            };
            check_references(ctx, &effective("userId"), &effective("categoryId"))?;
        }
        Ok(())
    }
}

fn check_references(ctx: &WriteContext<'_>, user_id: &Value, category_id: &Value) -> DomainResult<()> {
    if exists(ctx.view, USERS, user_id) && exists(ctx.view, CATEGORIES, category_id) {
        Ok(())
    } else {
        Err(DomainError::invalid_reference(INVALID_REFERENCES))
    }
}

/// Authors only need a unique email here; roles and countries live in the
/// users service.
fn create_user(ctx: &WriteContext<'_>, body: Record) -> DomainResult<Record> {
    let email = body.get("email").and_then(Value::as_str).unwrap_or("");
    if !unique_ci(ctx.view, USERS, "email", email) {
        return Err(DomainError::duplicate(EMAIL_TAKEN));
    }
    let id = Sequence::next(ctx.view, USERS);
    Ok(new_entity(Value::from(id), body, ctx.now))
}

impl Interceptor for PostService {
    fn on_create(&self, ctx: &WriteContext<'_>, body: Record) -> DomainResult<Record> {
        let result = match ctx.collection {
            POSTS => self.create_post(ctx, &body).map(Post::into_record),
            USERS => create_user(ctx, body),
            CATEGORIES => {
                let id = Sequence::next(ctx.view, CATEGORIES);
                Ok(new_entity(Value::from(id), body, ctx.now))
            }
            _ => Ok(default_create(ctx, body)),
        };
        if let Err(e) = &result {
            tracing::warn!(collection = ctx.collection, error = %e, "create rejected");
        }
        result
    }

    fn on_update(&self, ctx: &WriteContext<'_>, patch: &mut Record, existing: Option<&Record>) -> DomainResult<()> {
        stamp_updated(patch, ctx.now);
        self.check_post_patch(ctx, patch, existing).inspect_err(|e| {
            tracing::warn!(collection = ctx.collection, error = %e, "update rejected");
        })
    }
}
