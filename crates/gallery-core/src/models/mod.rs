//! Data models for the gallery client
//!
//! Wire types match the backend JSON contract (camelCase field names).

mod filter;
mod photo;
mod upload;

pub use filter::*;
pub use photo::*;
pub use upload::*;
