//! HTTP route handlers

pub mod health;
pub mod page;
pub mod predict;
pub mod train;
