/// AAMVA DL/ID Card Design Standard.
///
/// See: <https://www.aamva.org/assets/best-practices,-guides,-standards,-manuals,-whitepapers/aamva-dl-id-card-design-standard-(2020)>
mod macros;
use std::io;

pub(crate) use macros::*;

pub mod types;

#[derive(Debug, thiserror::Error)]
#[error("missing data element `{0}`")]
pub struct MissingDataElement<T>(pub T);

impl<T: std::fmt::Display> From<MissingDataElement<T>> for io::Error {
    fn from(value: MissingDataElement<T>) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, value.to_string())
    }
}

mod dl;
pub use dl::*;

pub mod pdf_417;
pub use pdf_417::{DecodeSubfile, File};
