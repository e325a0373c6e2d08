mod handler;
mod model;

pub use handler::{get_spend_limit, set_spend_limit};
pub use model::{SpendLimitResponse, limit_update_constraints};
