//! AAMVA DL/ID card data: the PDF417 file codec and the jurisdiction table.
pub mod dlid;
pub mod jurisdiction;

pub use jurisdiction::{Iin, Jurisdiction, Registry, RegistryError, UnknownJurisdiction};

/// AAMVA version number written in file headers.
///
/// Matches the reference fixture the readers of this record are pinned to.
pub const DEFAULT_AAMVA_VERSION: u8 = 6;

/// Jurisdiction version number written in file headers.
pub const DEFAULT_JURISDICTION_VERSION: u8 = 0;
