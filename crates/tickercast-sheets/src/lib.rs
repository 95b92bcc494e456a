//! Spreadsheet sink collaborator.
//!
//! Serializes ranked (or raw) analysis records into fixed-order rows and
//! writes them through a Sheets-style REST surface: create a fresh
//! spreadsheet with all rows, or append to an existing one after verifying
//! the header row.

mod client;
mod error;
mod rows;

pub use client::SheetsClient;
pub use error::SheetsError;
pub use rows::{to_row, HEADER};
