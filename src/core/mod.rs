pub mod account;
pub mod activity;
pub mod attendance;
pub mod hasher;
pub mod relay;
pub mod token;
