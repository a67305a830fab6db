//! Assembly of the `DL` subfile, the file header and the final document.
use std::io;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    aamva::{
        dlid::{
            pdf_417::{
                AnsiHeader, EncodeError, FileBuilder, Subfile, HEADER_SIZE,
                SUBFILE_DESIGNATOR_SIZE,
            },
            types::InvalidFieldValue,
            DlSubfile, File, DL_SUBFILE_TYPE,
        },
        Iin, UnknownJurisdiction, DEFAULT_AAMVA_VERSION, DEFAULT_JURISDICTION_VERSION,
    },
    license::NormalizedFields,
};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    UnknownJurisdiction(#[from] UnknownJurisdiction),

    #[error("`{element}` is {length} long, the maximum is {max}")]
    EncodingOverflow {
        element: String,
        length: u64,
        max: u64,
    },

    #[error("invalid `{element}` value: {reason}")]
    InvalidEncoding {
        element: String,
        reason: InvalidFieldValue,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<EncodeError> for BuildError {
    fn from(value: EncodeError) -> Self {
        match value {
            EncodeError::InvalidElement {
                element,
                source: InvalidFieldValue::TooLong { len, max },
            } => Self::EncodingOverflow {
                element: element.to_owned(),
                length: len as u64,
                max: max as u64,
            },
            EncodeError::InvalidElement { element, source } => Self::InvalidEncoding {
                element: element.to_owned(),
                reason: source,
            },
            EncodeError::Overflow {
                field,
                value,
                digits,
            } => Self::EncodingOverflow {
                element: field.to_owned(),
                length: value,
                max: 10u64.pow(digits as u32) - 1,
            },
            EncodeError::Io(e) => Self::Io(e),
        }
    }
}

/// Version numbers written in the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versions {
    pub aamva: u8,
    pub jurisdiction: u8,
}

impl Default for Versions {
    fn default() -> Self {
        Self {
            aamva: DEFAULT_AAMVA_VERSION,
            jurisdiction: DEFAULT_JURISDICTION_VERSION,
        }
    }
}

/// Encoded `DL` subfile, with the elements it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiSubfile {
    elements: DlSubfile,
    encoded: Subfile,
}

impl AnsiSubfile {
    pub fn elements(&self) -> &DlSubfile {
        &self.elements
    }

    /// Byte length, subfile type and segment terminator included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.encoded.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.encoded.to_bytes()
    }
}

/// Lays out `fields` as a `DL` subfile.
///
/// Every value is checked against the format of its element first.
pub fn assemble(fields: &NormalizedFields) -> Result<AnsiSubfile, BuildError> {
    let elements = fields.to_dl_subfile();
    let encoded = Subfile::try_from(&elements)?;
    debug!(
        elements = elements.len(),
        length = encoded.len(),
        "assembled DL subfile"
    );

    Ok(AnsiSubfile { elements, encoded })
}

/// Computes the file header describing `subfiles`, in order.
pub fn compose(
    subfiles: &[AnsiSubfile],
    iin: Iin,
    versions: Versions,
) -> Result<AnsiHeader, BuildError> {
    let mut builder = FileBuilder::new(iin.into_u32(), versions.aamva, versions.jurisdiction);
    for subfile in subfiles {
        builder.push(subfile.encoded.clone());
    }

    Ok(builder.header()?)
}

/// Builds the complete document of a single `DL` subfile.
pub fn build(
    fields: &NormalizedFields,
    iin: Iin,
    versions: Versions,
) -> Result<AnsiDocument, BuildError> {
    let subfile = assemble(fields)?;
    let header = compose(std::slice::from_ref(&subfile), iin, versions)?;

    let mut bytes = header.to_bytes()?;
    subfile.encoded.write(&mut bytes)?;

    let designator = &header.designators[0];
    let compliant = check_layout(&bytes, &subfile);
    if !compliant {
        warn!(%iin, "emitted document does not read back as a compliant file");
    }

    let metadata = DocumentMetadata {
        state_iin: iin.to_string(),
        data_length: bytes.len(),
        compliant,
        aamva_version: versions.aamva,
        subfile_offset: designator.offset,
        subfile_length: designator.length,
    };

    debug!(
        %iin,
        data_length = metadata.data_length,
        compliant,
        "built document"
    );

    Ok(AnsiDocument {
        bytes,
        header,
        subfile,
        metadata,
    })
}

/// Reads `bytes` back as a file and checks that it holds exactly `subfile`.
fn check_layout(bytes: &[u8], subfile: &AnsiSubfile) -> bool {
    match read_layout(bytes, subfile) {
        Ok(compliant) => compliant,
        Err(e) => {
            debug!(error = %e, "unreadable document");
            false
        }
    }
}

fn read_layout(bytes: &[u8], subfile: &AnsiSubfile) -> io::Result<bool> {
    let mut cursor = io::Cursor::new(bytes);
    let mut file = File::new(&mut cursor)?;

    let mut offset = HEADER_SIZE + SUBFILE_DESIGNATOR_SIZE * file.header().entry_count as u64;
    for designator in file.designators() {
        if designator.offset != offset {
            return Ok(false);
        }

        offset += designator.length;
    }

    if offset != bytes.len() as u64 {
        return Ok(false);
    }

    let Some(index) = file.index_of(&DL_SUBFILE_TYPE) else {
        return Ok(false);
    };

    let designator = &file.designators()[index];
    let start = designator.offset as usize;
    let end = start + designator.length as usize;
    if bytes[start..end] != subfile.to_bytes() {
        return Ok(false);
    }

    // Fails on any missing mandatory element.
    let decoded: DlSubfile = file.read_subfile_by_index(index)?;
    Ok(decoded == subfile.elements && file.position()? == end as u64)
}

/// Summary of a built document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Issuer identification number, 6 digits.
    pub state_iin: String,

    /// Total byte length of the document.
    pub data_length: usize,

    /// Whether the document reads back as a well formed file.
    pub compliant: bool,

    pub aamva_version: u8,

    pub subfile_offset: u64,

    pub subfile_length: u64,
}

/// File header followed by its `DL` subfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiDocument {
    bytes: Vec<u8>,
    header: AnsiHeader,
    subfile: AnsiSubfile,
    metadata: DocumentMetadata,
}

impl AnsiDocument {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_str(&self) -> &str {
        unsafe {
            // SAFETY: the header is made of ASCII digits and literals, and
            //         every element value was checked against an ASCII
            //         character class.
            std::str::from_utf8_unchecked(&self.bytes)
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn header(&self) -> &AnsiHeader {
        &self.header
    }

    pub fn subfile(&self) -> &AnsiSubfile {
        &self.subfile
    }

    /// Bytes of the `DL` subfile, as selected by its designator.
    pub fn subfile_bytes(&self) -> &[u8] {
        let start = self.metadata.subfile_offset as usize;
        &self.bytes[start..start + self.metadata.subfile_length as usize]
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }
}
