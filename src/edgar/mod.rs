//! SEC EDGAR access.
//!
//! Ticker resolution, filing lookup and primary document caching.

pub mod client;
pub mod submissions;
pub mod tickers;

pub use client::{EdgarClient, EdgarOptions};
