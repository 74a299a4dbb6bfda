//! Non-owning views over type-erased objects.
//!
//! - [`ObjectView`]: a `(pointer, Rtti)` pair borrowed for `'a`.
//! - [`ArgView`] / [`ArgStore`]: the argument list of one call.

mod args;
mod object_view;

pub use args::{ArgStore, ArgView};
pub(crate) use args::hash_sum;
pub use object_view::ObjectView;
