//! Integration tests for the user data server
//!
//! Scenario tests run against [`user_data_server::UserDataService`] over a real
//! JSON file in a temporary directory unless a test needs failure injection, in
//! which case it uses the in-memory store.

pub mod json_storage;
pub mod mcp_flows;
pub mod properties;
pub mod reporting;
