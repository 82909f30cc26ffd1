mod client;
mod errors;
mod types;

pub use client::ApiClient;
pub use errors::ApiError;
