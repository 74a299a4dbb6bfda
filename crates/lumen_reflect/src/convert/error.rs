use thiserror::Error;

use crate::Rtti;

/// An error returned by [`ObjectView::convert_to`](crate::view::ObjectView::convert_to).
#[derive(Debug, Error, Clone, Copy)]
#[non_exhaustive]
pub enum ConvertError {
    #[error("cannot convert out of an empty object view")]
    InvalidView,

    #[error("no conversion from `{from}` to `{to}`")]
    NoConversion { from: Rtti, to: Rtti },
}
