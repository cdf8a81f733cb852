//! namhatta - leadership hierarchy service
//!
//! Promotion, demotion, role removal, and subordinate transfer over a
//! forest of devotee nodes, with an append-only role change history.

pub mod cli;
pub mod hierarchy;
pub mod http_server;
pub mod observability;
pub mod store;
