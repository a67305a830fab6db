//! Generation of the document discriminator (ICN) and inventory control
//! number (DD) when the caller does not supply them.
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use sha2::{Digest, Sha256};
use tracing::warn;

use super::ValidatedFields;

/// Source of per-document identifiers.
///
/// Implementations must never return the same value twice within a process
/// for different documents, including under concurrent use.
pub trait IdentifierProvider: Send + Sync {
    /// Document discriminator (`DCF`).
    fn document_discriminator(&self, fields: &ValidatedFields) -> String;

    /// Inventory control number (`DCK`).
    fn inventory_control_number(&self, fields: &ValidatedFields) -> String;
}

/// Width of the sequence part of generated document discriminators.
const DCF_SEQUENCE_DIGITS: u32 = 12;

/// Width of the sequence part of generated inventory control numbers.
const DCK_SEQUENCE_DIGITS: u32 = 9;

static DCF_SEQUENCE: AtomicU64 = AtomicU64::new(0);

static DCK_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Numeric identifiers built on process-wide sequence numbers, one per
/// identifier.
///
/// - document discriminator: 6 digits of a digest of the license data and
///   the wall clock, then a 12 digit sequence number, 18 digits in total;
/// - inventory control number: the issue date as `YYMMDD`, then a 9 digit
///   sequence number, 15 digits in total.
///
/// Values are unique within a process until a sequence number reaches its
/// width, that is 10^12 document discriminators or 10^9 inventory control
/// numbers. Past that point the sequence starts over from zero and a warning
/// is logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceIdentifiers;

impl SequenceIdentifiers {
    pub fn new() -> Self {
        Self
    }
}

/// Takes the next value of `counter`, reduced to `digits` digits.
fn next_sequence(counter: &AtomicU64, digits: u32, element: &'static str) -> u64 {
    let cap = 10u64.pow(digits);
    let sequence = counter.fetch_add(1, Ordering::Relaxed);
    if sequence != 0 && sequence % cap == 0 {
        warn!(element, cap, "identifier sequence exhausted, values will repeat");
    }

    sequence % cap
}

fn digest_digits(fields: &ValidatedFields, count: usize) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    let mut hasher = Sha256::new();
    hasher.update(fields.dl_number.as_bytes());
    hasher.update(fields.issue_date.as_str().as_bytes());
    hasher.update(fields.jurisdiction.iin().into_u32().to_be_bytes());
    hasher.update(nanos.to_be_bytes());

    hasher
        .finalize()
        .iter()
        .take(count)
        .map(|b| char::from(b'0' + b % 10))
        .collect()
}

impl IdentifierProvider for SequenceIdentifiers {
    fn document_discriminator(&self, fields: &ValidatedFields) -> String {
        let sequence = next_sequence(&DCF_SEQUENCE, DCF_SEQUENCE_DIGITS, "DCF");
        format!(
            "{}{:0width$}",
            digest_digits(fields, 6),
            sequence,
            width = DCF_SEQUENCE_DIGITS as usize
        )
    }

    fn inventory_control_number(&self, fields: &ValidatedFields) -> String {
        let sequence = next_sequence(&DCK_SEQUENCE, DCK_SEQUENCE_DIGITS, "DCK");
        let issue = fields.issue_date.as_str();
        format!(
            "{}{}{}{:0width$}",
            &issue[6..8],
            &issue[0..2],
            &issue[2..4],
            sequence,
            width = DCK_SEQUENCE_DIGITS as usize
        )
    }
}

/// Always returns the same identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedIdentifiers {
    pub document_discriminator: String,
    pub inventory_control_number: String,
}

impl FixedIdentifiers {
    pub fn new(
        document_discriminator: impl Into<String>,
        inventory_control_number: impl Into<String>,
    ) -> Self {
        Self {
            document_discriminator: document_discriminator.into(),
            inventory_control_number: inventory_control_number.into(),
        }
    }
}

impl IdentifierProvider for FixedIdentifiers {
    fn document_discriminator(&self, _fields: &ValidatedFields) -> String {
        self.document_discriminator.clone()
    }

    fn inventory_control_number(&self, _fields: &ValidatedFields) -> String {
        self.inventory_control_number.clone()
    }
}
