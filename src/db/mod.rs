pub mod activities;
pub mod attendance;
pub mod employees;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
