//! This library builds the AAMVA DL/ID card data record carried by the
//! PDF417 barcode of a driver license: an ANSI file header followed by a
//! single `DL` subfile.
//!
//! Raw form data ([`LicenseInput`]) is validated, normalized to the
//! encodings of the AAMVA DL/ID Card Design Standard, then assembled into
//! an [`AnsiDocument`]. Rendering the barcode itself is left to a
//! [`SymbolEncoder`] and an [`ImageRenderer`].
use std::sync::Arc;

use tracing::info;

pub mod aamva;
pub mod barcode;
pub mod config;
pub mod document;
pub mod license;

pub use aamva::{Iin, Jurisdiction, Registry, RegistryError, UnknownJurisdiction};
pub use barcode::{render_barcode, BarcodeConfig, ImageRenderer, SymbolEncoder};
pub use config::{Config, ConfigError};
pub use document::{
    assemble, build, compose, AnsiDocument, AnsiSubfile, BuildError, DocumentMetadata, Versions,
};
pub use license::{
    normalize, validate, FixedIdentifiers, IdentifierProvider, LicenseInput, NormalizedFields,
    SequenceIdentifiers, ValidatedFields, ValidationError, Violation,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Driver license record generator.
pub struct Generator {
    config: Config,
    registry: Arc<Registry>,
    identifiers: Box<dyn IdentifierProvider>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Generator {
    /// Creates a generator using the embedded jurisdiction table and
    /// [`SequenceIdentifiers`].
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: Registry::default_table(),
            identifiers: Box::new(SequenceIdentifiers::new()),
        }
    }

    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_identifiers(mut self, identifiers: impl IdentifierProvider + 'static) -> Self {
        self.identifiers = Box::new(identifiers);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Validates, normalizes and encodes `input`.
    pub fn generate(&self, input: &LicenseInput) -> Result<Generated, Error> {
        let fields = validate(input, &self.registry)?;
        let real_id = fields.is_real_id();

        let fields = normalize(fields, &*self.identifiers);
        let iin = self
            .registry
            .lookup(&fields.state)
            .map_err(BuildError::from)?
            .iin();

        let document = build(&fields, iin, self.config.versions())?;
        info!(
            %iin,
            data_length = document.metadata().data_length,
            compliant = document.metadata().compliant,
            "generated license record"
        );

        Ok(Generated { document, real_id })
    }
}

/// Result of [`Generator::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub document: AnsiDocument,

    /// Whether the credential is REAL ID compliant.
    pub real_id: bool,
}

impl Generated {
    pub fn text(&self) -> &str {
        self.document.as_str()
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        self.document.metadata()
    }
}
