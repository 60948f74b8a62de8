//! Narration service client and the seam the rest of the crate talks through

pub mod client;

pub use client::{LlmClient, Narrator};
