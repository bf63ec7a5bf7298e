mod engine;
mod error;
mod format;
mod types;

pub use engine::{project, project_inputs};
pub use error::InputError;
pub use format::format_currency;
pub use types::{BalancePoint, BalanceSeries, ProjectionInputs};
