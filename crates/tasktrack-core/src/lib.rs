pub mod error;
pub mod expense;
pub mod id;
pub mod month;
pub mod task;

pub use error::TasktrackError;
pub use expense::{CategoryTotal, Expense, MonthlySummary};
pub use month::YearMonth;
pub use task::Task;
