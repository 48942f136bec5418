pub mod lending;
pub mod maintenance;
