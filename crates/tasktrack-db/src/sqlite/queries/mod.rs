pub mod expenses;
pub mod tasks;
