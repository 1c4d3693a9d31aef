//! Domain logic for the BreezyDay backend.
//!
//! Pure types and functions only -- no I/O. The persistence layer lives in
//! `breezy-db`, the Gemini adapter in `breezy-gemini`, and the HTTP surface
//! in `breezy-api`.

pub mod error;
pub mod geo;
pub mod prompt;
pub mod suggestion;
pub mod types;
