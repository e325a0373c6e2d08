use serde::Serialize;

use crate::validation::{Collection, Constraint, JsonType};

pub const LIMIT_FIELD: &str = "limit";

#[derive(Debug, Serialize)]
pub struct SpendLimitResponse {
    /// Available limit in dollars.
    pub limit: f64,
}

/// Body of `POST /ad_account`: exactly one non-blank float `limit`, in dollars.
pub fn limit_update_constraints() -> Collection {
    Collection::new()
        .field(
            LIMIT_FIELD,
            vec![Constraint::NotBlank, Constraint::Type(JsonType::Float)],
        )
        .allow_missing_fields(false)
        .allow_extra_fields(false)
}
