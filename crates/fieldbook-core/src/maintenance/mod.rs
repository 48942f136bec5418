pub mod analysis;
pub mod downtime;
pub mod keywords;
pub mod logs;
