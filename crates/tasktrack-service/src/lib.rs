mod local;
pub mod seed;
mod traits;

pub use local::LocalService;
pub use traits::{ServiceError, TrackerService};
