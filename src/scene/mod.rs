pub(crate) mod composition;
/// Composition parameter model.
pub mod model;
