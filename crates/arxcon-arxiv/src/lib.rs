//! arXiv search and PDF download.
//!
//! [`PaperSource`] abstracts where papers come from so the builder can be
//! driven by a fixture source in tests. [`ArxivClient`] is the live
//! implementation over the public Atom API.

pub mod client;
pub mod download;
pub mod error;
pub mod models;

pub use client::{parse_feed, ArxivClient, PaperSource};
pub use error::{ArxivError, Result};
pub use models::ArxivPaper;
