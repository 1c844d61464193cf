pub mod limit;
pub mod report;
