//! HTTP request handlers shared by every Staybook service.

pub mod health;

pub use health::{health_check, readiness};
