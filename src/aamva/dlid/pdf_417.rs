//! PDF417 payload layout of an AAMVA DL/ID file.
//!
//! A file is a fixed header, one subfile designator per subfile, then the
//! subfiles themselves:
//!
//! ```text
//! @ LF RS CR "ANSI " IIN(6) AAMVA-version(2) jurisdiction-version(2) entries(2)
//! ( type(2) offset(4) length(4) )*
//! ( type(2) ( element LF )* element CR )*
//! ```
use std::io::{self, BufRead, Seek};

use super::types::InvalidFieldValue;

pub const HEADER_SIZE: u64 = 9 + 6 + 2 + 2 + 2;

pub const SUBFILE_DESIGNATOR_SIZE: u64 = 2 + 4 + 4;

pub const DATA_ELEMENT_SEPARATOR: u8 = b'\n';

pub const RECORD_SEPARATOR: u8 = 0x1e;

pub const SEGMENT_TERMINATOR: u8 = b'\r';

pub const PREFIX: [u8; 9] = *b"@\n\x1e\rANSI ";

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("invalid `{element}` value: {source}")]
    InvalidElement {
        element: &'static str,
        source: InvalidFieldValue,
    },

    #[error("{field} value {value} does not fit in {digits} digits")]
    Overflow {
        field: &'static str,
        value: u64,
        digits: usize,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct FileBuilder {
    issuer_id: u32,
    version: u8,
    jurisdiction_version: u8,
    subfiles: Vec<Subfile>,
}

impl FileBuilder {
    pub fn new(issuer_id: u32, version: u8, jurisdiction_version: u8) -> Self {
        Self {
            issuer_id,
            version,
            jurisdiction_version,
            subfiles: Vec::new(),
        }
    }

    pub fn push(&mut self, subfile: impl Into<Subfile>) {
        self.subfiles.push(subfile.into());
    }

    /// Computes the file header, including the subfile designators, from
    /// the byte lengths of the pushed subfiles.
    pub fn header(&self) -> Result<AnsiHeader, EncodeError> {
        let header = Header {
            issuer_id: self.issuer_id,
            version: self.version,
            jurisdiction_version: self.jurisdiction_version,
            entry_count: u8::try_from(self.subfiles.len()).map_err(|_| EncodeError::Overflow {
                field: "entry count",
                value: self.subfiles.len() as u64,
                digits: 2,
            })?,
        };

        let mut offset = HEADER_SIZE + SUBFILE_DESIGNATOR_SIZE * self.subfiles.len() as u64;
        let mut designators = Vec::with_capacity(self.subfiles.len());
        for subfile in &self.subfiles {
            let length = subfile.len() as u64;
            designators.push(SubfileDesignator {
                subfile_type: subfile.subfile_type,
                offset,
                length,
            });
            offset += length;
        }

        let result = AnsiHeader {
            header,
            designators,
        };

        // Fails early on any value that does not fit its digits.
        result.encode(&mut io::sink())?;
        Ok(result)
    }
}

/// File header followed by its subfile designators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiHeader {
    pub header: Header,
    pub designators: Vec<SubfileDesignator>,
}

impl AnsiHeader {
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        HEADER_SIZE + SUBFILE_DESIGNATOR_SIZE * self.designators.len() as u64
    }

    pub fn encode(&self, writer: &mut impl io::Write) -> Result<(), EncodeError> {
        self.header.encode(writer)?;
        for designator in &self.designators {
            designator.encode(writer)?;
        }

        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut result = Vec::with_capacity(self.len() as usize);
        self.encode(&mut result)?;
        Ok(result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subfile {
    pub subfile_type: [u8; 2],
    pub data: Vec<u8>,
}

impl Subfile {
    pub fn new(subfile_type: [u8; 2], data: Vec<u8>) -> Self {
        Self { subfile_type, data }
    }

    /// Length of the subfile, type included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        2 + self.data.len()
    }

    pub fn write(&self, writer: &mut impl io::Write) -> io::Result<()> {
        write_array(writer, self.subfile_type)?;
        writer.write_all(&self.data)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.len());
        result.extend(self.subfile_type);
        result.extend(&self.data);
        result
    }
}

pub struct File<'a, R> {
    header: Header,
    subfile_designators: Vec<SubfileDesignator>,
    reader: &'a mut R,
}

impl<'a, R: BufRead> File<'a, R> {
    pub fn new(reader: &'a mut R) -> io::Result<Self> {
        let header = Header::decode(reader)?;

        let entry_count = header.entry_count as usize;
        let mut subfile_designators = Vec::with_capacity(entry_count);
        for _ in 0..entry_count {
            subfile_designators.push(SubfileDesignator::decode(reader)?);
        }

        Ok(Self {
            header,
            subfile_designators,
            reader,
        })
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn designators(&self) -> &[SubfileDesignator] {
        &self.subfile_designators
    }

    pub fn index_of(&self, subfile_type: &[u8; 2]) -> Option<usize> {
        self.subfile_designators
            .iter()
            .position(|d| d.subfile_type == *subfile_type)
    }
}

impl<'a, R: BufRead + Seek> File<'a, R> {
    pub fn read_subfile<D: DecodeSubfile>(
        &mut self,
        subfile_type: &[u8; 2],
    ) -> io::Result<Option<D>> {
        match self.index_of(subfile_type) {
            Some(i) => self.read_subfile_by_index(i).map(Some),
            None => Ok(None),
        }
    }

    pub fn read_subfile_by_index<D: DecodeSubfile>(&mut self, index: usize) -> io::Result<D> {
        let desc = &self.subfile_designators[index];
        self.reader.seek(io::SeekFrom::Start(desc.offset))?;
        D::decode_subfile(self.reader)
    }

    /// Current position of the underlying reader.
    pub fn position(&mut self) -> io::Result<u64> {
        self.reader.stream_position()
    }
}

pub trait DecodeSubfile: Sized {
    fn decode_subfile(reader: &mut impl BufRead) -> io::Result<Self>;

    fn decode_subfile_from_bytes(bytes: &[u8]) -> std::io::Result<Self> {
        let mut cursor = io::Cursor::new(bytes);
        Self::decode_subfile(&mut cursor)
    }
}

/// Untyped subfile: the raw elements, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub subfile_type: [u8; 2],
    pub entries: Vec<RecordEntry>,
}

impl DecodeSubfile for Record {
    fn decode_subfile(reader: &mut impl BufRead) -> io::Result<Self> {
        let subfile_type = read_array(reader)?;
        let mut entries = Vec::new();

        loop {
            let (entry, last) = RecordEntry::decode(reader)?;
            entries.push(entry);

            if last {
                break Ok(Self {
                    subfile_type,
                    entries,
                });
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub issuer_id: u32,
    pub version: u8,
    pub jurisdiction_version: u8,
    pub entry_count: u8,
}

impl Header {
    pub fn decode(reader: &mut impl BufRead) -> io::Result<Self> {
        if read_array(reader)? != PREFIX {
            return Err(io::ErrorKind::InvalidData.into());
        }

        Ok(Self {
            issuer_id: decode_digits::<6>(read_array(reader)?)? as u32,
            version: decode_digits::<2>(read_array(reader)?)? as u8,
            jurisdiction_version: decode_digits::<2>(read_array(reader)?)? as u8,
            entry_count: decode_digits::<2>(read_array(reader)?)? as u8,
        })
    }

    pub fn encode(&self, writer: &mut impl io::Write) -> Result<(), EncodeError> {
        writer.write_all(&PREFIX)?;
        write_array(
            writer,
            encode_digits::<6>("issuer identification number", self.issuer_id as u64)?,
        )?;
        write_array(writer, encode_digits::<2>("AAMVA version", self.version as u64)?)?;
        write_array(
            writer,
            encode_digits::<2>("jurisdiction version", self.jurisdiction_version as u64)?,
        )?;
        write_array(writer, encode_digits::<2>("entry count", self.entry_count as u64)?)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubfileDesignator {
    pub subfile_type: [u8; 2],
    pub offset: u64,
    pub length: u64,
}

impl SubfileDesignator {
    pub fn decode(reader: &mut impl BufRead) -> io::Result<Self> {
        Ok(Self {
            subfile_type: read_array(reader)?,
            offset: decode_digits::<4>(read_array(reader)?)?,
            length: decode_digits::<4>(read_array(reader)?)?,
        })
    }

    pub fn encode(&self, writer: &mut impl io::Write) -> Result<(), EncodeError> {
        write_array(writer, self.subfile_type)?;
        write_array(writer, encode_digits::<4>("subfile offset", self.offset)?)?;
        write_array(writer, encode_digits::<4>("subfile length", self.length)?)?;
        Ok(())
    }
}

pub(crate) fn read_array<const N: usize>(reader: &mut impl BufRead) -> io::Result<[u8; N]> {
    let mut buffer = [0; N];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}

pub(crate) fn write_array<const N: usize>(
    writer: &mut impl io::Write,
    array: [u8; N],
) -> io::Result<()> {
    writer.write_all(&array)
}

fn decode_digits<const N: usize>(digits: [u8; N]) -> io::Result<u64> {
    digits.iter().try_fold(0u64, |value, &d| {
        if d.is_ascii_digit() {
            Ok(value * 10 + (d - b'0') as u64)
        } else {
            Err(io::ErrorKind::InvalidData.into())
        }
    })
}

fn encode_digits<const N: usize>(field: &'static str, value: u64) -> Result<[u8; N], EncodeError> {
    let mut digits = [b'0'; N];
    let mut rest = value;
    for d in digits.iter_mut().rev() {
        *d = b'0' + (rest % 10) as u8;
        rest /= 10;
    }

    if rest != 0 {
        return Err(EncodeError::Overflow {
            field,
            value,
            digits: N,
        });
    }

    Ok(digits)
}

fn read_u8(reader: &mut impl BufRead) -> io::Result<u8> {
    let mut value = 0;
    reader.read_exact(std::slice::from_mut(&mut value))?;
    Ok(value)
}

fn write_u8(writer: &mut impl io::Write, value: u8) -> io::Result<()> {
    writer.write_all(std::slice::from_ref(&value))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    pub field: [u8; 3],
    pub value: Vec<u8>,
}

impl RecordEntry {
    pub fn decode(reader: &mut impl io::BufRead) -> io::Result<(Self, bool)> {
        let field: [u8; 3] = read_array(reader)?;
        let mut value = Vec::new();

        let last = loop {
            match read_u8(reader)? {
                DATA_ELEMENT_SEPARATOR => break false,
                RECORD_SEPARATOR => return Err(io::ErrorKind::InvalidData.into()),
                SEGMENT_TERMINATOR => break true,
                b => value.push(b),
            }
        };

        Ok((Self { field, value }, last))
    }

    pub fn encode_ref(
        writer: &mut impl io::Write,
        field: &[u8; 3],
        value: &[u8],
        last: bool,
    ) -> io::Result<()> {
        write_array(writer, *field)?;
        writer.write_all(value)?;
        if last {
            write_u8(writer, SEGMENT_TERMINATOR)
        } else {
            write_u8(writer, DATA_ELEMENT_SEPARATOR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_subfile() -> Subfile {
        let mut data = Vec::new();
        RecordEntry::encode_ref(&mut data, b"DAQ", b"091076664", false).unwrap();
        RecordEntry::encode_ref(&mut data, b"DCS", b"CROOMS", true).unwrap();
        Subfile::new(*b"DL", data)
    }

    #[test]
    fn header_layout() {
        let mut builder = FileBuilder::new(636053, 6, 0);
        builder.push(sample_subfile());
        let header = builder.header().unwrap();

        assert_eq!(header.len(), 31);
        assert_eq!(
            header.to_bytes().unwrap(),
            b"@\n\x1e\rANSI 636053060001DL00310025"
        );
    }

    #[test]
    fn offsets_follow_previous_subfiles() {
        let mut builder = FileBuilder::new(636053, 6, 0);
        builder.push(sample_subfile());
        builder.push(Subfile::new(*b"ZT", b"ZTAX\r".to_vec()));
        let header = builder.header().unwrap();

        assert_eq!(header.designators[0].offset, 41);
        assert_eq!(header.designators[0].length, 25);
        assert_eq!(header.designators[1].offset, 66);
        assert_eq!(header.designators[1].length, 7);
    }

    #[test]
    fn oversized_values_are_rejected() {
        let builder = FileBuilder::new(6360530, 6, 0);
        assert!(matches!(
            builder.header(),
            Err(EncodeError::Overflow { digits: 6, .. })
        ));

        let mut builder = FileBuilder::new(636053, 6, 0);
        builder.push(Subfile::new(*b"DL", vec![b'A'; 10_000]));
        assert!(matches!(
            builder.header(),
            Err(EncodeError::Overflow { digits: 4, .. })
        ));
    }

    #[test]
    fn read_back_written_file() {
        let subfile = sample_subfile();
        let mut builder = FileBuilder::new(636053, 6, 0);
        builder.push(subfile.clone());
        let mut bytes = builder.header().unwrap().to_bytes().unwrap();
        subfile.write(&mut bytes).unwrap();

        let mut cursor = io::Cursor::new(bytes.as_slice());
        let mut file = File::new(&mut cursor).unwrap();
        assert_eq!(file.header().issuer_id, 636053);
        assert_eq!(file.header().entry_count, 1);

        let record: Record = file.read_subfile(b"DL").unwrap().unwrap();
        assert_eq!(record.entries.len(), 2);
        assert_eq!(record.entries[1].value, b"CROOMS");
        assert_eq!(file.position().unwrap(), bytes.len() as u64);
    }

    #[test]
    fn record_separator_inside_value_is_invalid() {
        assert!(Record::decode_subfile_from_bytes(b"DLDAQ12\x1e3\r").is_err());
    }
}
