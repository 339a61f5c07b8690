//! HTTP inbound adapter exposing the worksheet REST endpoints.

pub mod error;
pub mod health;
pub mod state;
pub mod validation;
pub mod worksheets;

pub use crate::domain::ApiResult;
