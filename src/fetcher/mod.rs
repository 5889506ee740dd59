pub mod charset;
pub mod client;
pub mod errors;

pub use client::{FetchedPage, HttpPage, build_client, fetch};
pub use errors::FetchError;
