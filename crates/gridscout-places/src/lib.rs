//! Typed client for the places text-search and geocoding API.

mod client;
mod error;
mod retry;
mod types;

pub use client::{PlacesClient, RetryPolicy};
pub use error::PlacesError;
pub use types::{PlaceResult, SearchPage};
