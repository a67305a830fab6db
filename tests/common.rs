use std::{fs, path::Path};

use aamva_dl_record::{Config, FixedIdentifiers, Generator, LicenseInput};

pub const ICN: &str = "252090372892550101";

pub const DD: &str = "110250728203364";

pub fn load_input(path: impl AsRef<Path>) -> LicenseInput {
    let content = fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

pub fn crooms() -> LicenseInput {
    load_input("tests/license/crooms.json")
}

/// Upper-case input with inches only and every optional field absent.
pub fn stanley_crooms() -> LicenseInput {
    load_input("tests/license/stanley_crooms.json")
}

/// Generator with fixed identifiers, so that output is reproducible.
pub fn generator() -> Generator {
    Generator::new(Config::default()).with_identifiers(FixedIdentifiers::new(ICN, DD))
}
