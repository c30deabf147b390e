//! Logic shared by the portal's views.
//!
//! Rendering is out of scope; these are the pieces a view needs to fetch,
//! partition, and act on controller data without racing itself.

mod join;
mod list;
mod partition;

pub use join::*;
pub use list::*;
pub use partition::*;
