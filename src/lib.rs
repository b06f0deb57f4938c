pub mod config;
pub mod error;
pub mod redirect;
pub mod report;
pub mod routes;
pub mod state;
pub mod store;
