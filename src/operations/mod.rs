pub mod add;
pub mod aggregate;
pub mod date;
pub mod report;
pub mod validate;
