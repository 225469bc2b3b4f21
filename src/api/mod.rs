//! HTTP surface: the served page and the JSON API around the controller.

pub mod error;
pub mod router;
pub mod server;
