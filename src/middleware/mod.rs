//! Request-side plumbing shared by every route.

pub mod boundary;
pub mod validated;

pub use boundary::{catch_unclassified, not_found};
pub use validated::{ValidatedJson, ValidatedQuery};
