//! Static compliance catalogues and the coverage analyser that maps
//! generated policy text back onto them.

pub mod catalogue;
pub mod coverage;

pub use catalogue::{control_ids, iso_group, nist_group, total_controls};
pub use coverage::{analyze, extract_iso_ids, extract_nist_ids, CoverageError};
