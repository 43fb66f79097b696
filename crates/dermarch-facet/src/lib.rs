//! Faceted value-distribution summaries over image record collections.
//!
//! The facet catalog ([`catalog::IMAGE_FACETS`]) declares what gets
//! summarized; [`histogram`] folds a filtered record collection into
//! per-facet bin counts in a single pass. The result is an
//! eventually-consistent analytics view, not a transactional one: the
//! caller supplies whatever snapshot of the records it wants summarized.

pub mod catalog;
mod engine;

pub use catalog::{AGE_BOUNDARIES, FacetKind, FacetSpec, IMAGE_FACETS, SIZE_BOUNDARIES};
pub use engine::{DatasetVisibility, FacetBin, FacetHistogram, histogram};
