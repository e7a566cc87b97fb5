pub mod report;
pub mod spend;
