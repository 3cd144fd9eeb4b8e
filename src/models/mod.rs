pub mod activity;
pub mod attendance;
pub mod claims;
pub mod employee;
pub mod table;
