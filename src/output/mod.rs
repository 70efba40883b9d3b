//! Emitted artifacts: run metadata, the cards document, the report and the
//! summary CSV.
//!
//! ## Key Types
//!
//! - `RunMeta`: provenance recorded with every artifact
//! - `CardsDocument`: cards with 1-based ids, per-card and aggregate hashes
//! - `ReportDocument`: verification report plus the feasibility assessment
//! - `WriteOptions`: overwrite and directory-creation policy
//!
//! Writers refuse to replace an existing file unless `overwrite` is set.

pub mod document;
pub mod writer;

pub use document::{CardEntry, CardsDocument, ReportDocument, RunMeta, HASH_ALGORITHM};
pub use writer::{read_cards_document, write_json, write_summary_csv, OutputError, WriteOptions};
