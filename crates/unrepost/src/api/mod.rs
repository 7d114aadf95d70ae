//! The signed HTTP client for the platform's private web API.

mod client;
mod endpoints;

pub use client::TikTokClient;
pub use endpoints::{DeleteResponse, RepostListResponse, PAGE_SIZE};
