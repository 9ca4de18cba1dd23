//! Middleware applied to every route.

pub mod panic;
pub mod request_id;
