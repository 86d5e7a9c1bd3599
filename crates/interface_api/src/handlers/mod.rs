//! Request handlers

pub mod fund_operations;
pub mod health;
pub mod relationship;
