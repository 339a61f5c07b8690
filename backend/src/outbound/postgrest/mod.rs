//! PostgREST outbound adapter.
//!
//! Talks to a hosted `worksheets` table through its REST interface
//! (`/rest/v1/worksheets`), as exposed by PostgREST and Supabase.

mod dto;
mod http_store;

pub use http_store::{PostgrestClientError, PostgrestWorksheetRepository};
