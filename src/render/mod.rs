pub(crate) mod base;
/// Full-redraw compositor and its frame/report types.
pub mod compositor;
pub(crate) mod logo;
pub(crate) mod pixels;
pub(crate) mod shadow;
pub(crate) mod surface;
pub(crate) mod text;
