//! Transport layer shared by every outgoing request.

mod client;

pub use client::{HttpClient, HttpClientBuilder};
