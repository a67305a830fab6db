//! Issuer identification numbers of the US jurisdictions.
//!
//! The default table is `jurisdictions.csv`, embedded at compile time.
//! Adding a jurisdiction only requires a new row.
use std::{collections::BTreeMap, fmt, io, sync::Arc};

use lazy_static::lazy_static;
use serde::Deserialize;
use tracing::debug;

use super::dlid::types::{InvalidFieldValue, F2A, F6N};

lazy_static! {
    static ref DEFAULT_REGISTRY: Arc<Registry> = Arc::new(
        Registry::from_reader(include_str!("jurisdictions.csv").as_bytes())
            .expect("embedded jurisdiction table is valid")
    );
}

/// Issuer Identification Number, exactly 6 digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Iin(u32);

impl Iin {
    pub fn parse(value: &str) -> Result<Self, InvalidFieldValue> {
        let digits = F6N::new(value)?;
        Ok(Self(
            digits
                .as_bytes()
                .iter()
                .fold(0, |n, d| n * 10 + (d - b'0') as u32),
        ))
    }

    pub fn into_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Iin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jurisdiction {
    code: F2A,
    name: String,
    iin: Iin,
}

impl Jurisdiction {
    pub fn new(code: &str, name: impl Into<String>, iin: Iin) -> Result<Self, InvalidFieldValue> {
        Ok(Self {
            code: F2A::new(code.to_ascii_uppercase())?,
            name: name.into(),
            iin,
        })
    }

    /// Two-letter postal code.
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn iin(&self) -> Iin {
        self.iin
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown jurisdiction `{0}`")]
pub struct UnknownJurisdiction(pub String);

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("invalid jurisdiction code `{code}`: {source}")]
    InvalidCode {
        code: String,
        source: InvalidFieldValue,
    },

    #[error("invalid IIN for jurisdiction `{code}`: {source}")]
    InvalidIin {
        code: String,
        source: InvalidFieldValue,
    },

    #[error("jurisdiction `{0}` is listed more than once")]
    Duplicate(String),
}

#[derive(Deserialize)]
struct Row {
    code: String,
    name: String,
    iin: String,
}

/// Read-only mapping from jurisdiction code to [`Jurisdiction`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: BTreeMap<[u8; 2], Jurisdiction>,
}

impl Registry {
    /// Table of the 50 states and the District of Columbia.
    pub fn default_table() -> Arc<Self> {
        DEFAULT_REGISTRY.clone()
    }

    /// Reads a `code,name,iin` CSV table, header row included.
    pub fn from_reader(reader: impl io::Read) -> Result<Self, RegistryError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut jurisdictions = Vec::new();
        for result in reader.deserialize() {
            let row: Row = result?;
            let iin = Iin::parse(&row.iin).map_err(|source| RegistryError::InvalidIin {
                code: row.code.clone(),
                source,
            })?;
            let jurisdiction = Jurisdiction::new(&row.code, row.name, iin).map_err(|source| {
                RegistryError::InvalidCode {
                    code: row.code.clone(),
                    source,
                }
            })?;
            jurisdictions.push(jurisdiction);
        }

        let registry = Self::from_jurisdictions(jurisdictions)?;
        debug!(entries = registry.len(), "loaded jurisdiction table");
        Ok(registry)
    }

    pub fn from_jurisdictions(
        jurisdictions: impl IntoIterator<Item = Jurisdiction>,
    ) -> Result<Self, RegistryError> {
        let mut entries = BTreeMap::new();
        for jurisdiction in jurisdictions {
            let mut key = [0u8; 2];
            key.copy_from_slice(jurisdiction.code.as_bytes());
            if let Some(previous) = entries.insert(key, jurisdiction) {
                return Err(RegistryError::Duplicate(previous.code().to_owned()));
            }
        }

        Ok(Self { entries })
    }

    /// Finds the jurisdiction with the given code, ignoring case and
    /// surrounding whitespace.
    pub fn lookup(&self, code: &str) -> Result<&Jurisdiction, UnknownJurisdiction> {
        let normalized = code.trim().to_ascii_uppercase();
        <[u8; 2]>::try_from(normalized.as_bytes())
            .ok()
            .and_then(|key| self.entries.get(&key))
            .ok_or_else(|| UnknownJurisdiction(code.trim().to_owned()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Jurisdictions in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Jurisdiction> {
        self.entries.values()
    }
}
