// Backend API client

pub mod client;
pub mod diagnostics;
pub mod envelope;
pub mod models;
pub mod operations;

pub use client::ApiClient;
