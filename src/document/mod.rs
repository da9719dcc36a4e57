//! Filter document subsystem for aerofilter
//!
//! The canonical wire and storage shape of a filter:
//! - `FilterDocument`: immutable nested map
//! - codec between documents and expression trees
//! - field extraction for inspecting which fields a filter touches
//!
//! Root-level keys are implicitly conjoined. `$and` / `$or` keys are
//! matched case-insensitively; operator tokens are not.

mod codec;
#[allow(clippy::module_inception)]
mod document;
mod extract;

pub use document::FilterDocument;
pub use extract::{extract_field_names, extract_fields, FieldRef};
