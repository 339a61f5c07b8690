//! Outbound adapters implementing the worksheet store port.
//!
//! - **memory**: process-local store for tests and store-less runs
//! - **persistence**: PostgreSQL via Diesel
//! - **postgrest**: hosted table behind a PostgREST/Supabase REST endpoint
//!
//! Adapters translate between domain types and their backend's
//! representation. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod postgrest;
