//! HTTP read API.

pub mod router;
pub mod routes;

pub use router::{HirelinkState, hirelink_router, serve};
