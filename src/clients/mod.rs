//! Outbound boundaries: place search and text generation.
//!
//! Each boundary is a trait so the service layer can be exercised with
//! stubs; the concrete clients use `reqwest`.

pub mod geocoder;
pub mod summary;

pub use geocoder::{Geocoder, NominatimGeocoder};
pub use summary::{GeminiSummarizer, Summarizer};
