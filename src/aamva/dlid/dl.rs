//! Driver license (`DL`) subfile.
//!
//! Element order is the emission order. Tag assignments follow the layout
//! read by the verifiers this record targets: sex is carried in `DAD`, the
//! middle name in `DDF`, restrictions in `DDB` and endorsements in `DDA`.
use std::io;

use super::{
    mandatory_data_elements, optional_data_elements,
    pdf_417::{read_array, DecodeSubfile, EncodeError, RecordEntry, Subfile},
    types::*,
    MissingDataElement,
};

pub const DL_SUBFILE_TYPE: [u8; 2] = *b"DL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DlElement {
    Mandatory(DlMandatoryElement),
    Optional(DlOptionalElement),
}

impl DlElement {
    pub fn from_id(id: &[u8; 3]) -> Option<Self> {
        DlMandatoryElement::from_id(id)
            .map(Self::Mandatory)
            .or_else(|| DlOptionalElement::from_id(id).map(Self::Optional))
    }

    pub fn id(&self) -> &'static [u8; 3] {
        match self {
            Self::Mandatory(e) => e.id(),
            Self::Optional(e) => e.id(),
        }
    }

    pub fn string_id(&self) -> &'static str {
        match self {
            Self::Mandatory(e) => e.string_id(),
            Self::Optional(e) => e.string_id(),
        }
    }

    pub fn check(&self, value: &[u8]) -> Result<(), InvalidFieldValue> {
        match self {
            Self::Mandatory(e) => e.check(value),
            Self::Optional(e) => e.check(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DlSubfile {
    pub mandatory: DlMandatoryElements,
    pub optional: DlOptionalElements,
}

impl DlSubfile {
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        DlMandatoryElement::COUNT + self.optional.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DlElement, &[u8])> {
        self.mandatory
            .iter()
            .map(|(k, v)| (DlElement::Mandatory(k), v))
            .chain(
                self.optional
                    .iter()
                    .map(|(k, v)| (DlElement::Optional(k), v)),
            )
    }
}

#[derive(Debug, Default)]
pub struct DlSubfileBuilder {
    mandatory: DlMandatoryElementsBuilder,
    optional: DlOptionalElements,
}

impl DlSubfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, element: DlElement, value: Vec<u8>) {
        match element {
            DlElement::Mandatory(element) => self.mandatory.set(element, value),
            DlElement::Optional(element) => self.optional.set(element, Some(value)),
        }
    }

    pub fn build(self) -> Result<DlSubfile, MissingDataElement<DlMandatoryElement>> {
        Ok(DlSubfile {
            mandatory: self.mandatory.build()?,
            optional: self.optional,
        })
    }
}

impl DecodeSubfile for DlSubfile {
    fn decode_subfile(reader: &mut impl std::io::prelude::BufRead) -> std::io::Result<Self> {
        if read_array(reader)? != DL_SUBFILE_TYPE {
            return Err(io::ErrorKind::InvalidData.into());
        }

        let mut builder = DlSubfileBuilder::new();

        loop {
            let (entry, last) = RecordEntry::decode(reader)?;
            let element =
                DlElement::from_id(&entry.field).ok_or(io::ErrorKind::InvalidData)?;
            builder.set(element, entry.value);

            if last {
                break Ok(builder.build()?);
            }
        }
    }
}

/// Encodes the subfile, checking every element against its field format.
impl TryFrom<&DlSubfile> for Subfile {
    type Error = EncodeError;

    fn try_from(value: &DlSubfile) -> Result<Self, Self::Error> {
        let last = value.len() - 1;
        let mut data = Vec::new();
        for (i, (e, v)) in value.iter().enumerate() {
            e.check(v).map_err(|source| EncodeError::InvalidElement {
                element: e.string_id(),
                source,
            })?;
            RecordEntry::encode_ref(&mut data, e.id(), v, i == last)?;
        }

        Ok(Self::new(DL_SUBFILE_TYPE, data))
    }
}

mandatory_data_elements! {
    pub enum DlMandatoryElement, struct DlMandatoryElements (DlMandatoryElementsBuilder) {
        /// Customer ID Number (DAQ).
        customer_id_number: V25Ans => CustomerIdNumber: b"DAQ",

        /// Customer Family Name (DCS).
        customer_family_name: V40Ans => CustomerFamilyName: b"DCS",

        /// Customer First Name (DAC).
        customer_first_name: V40Ans => CustomerFirstName: b"DAC",

        /// Physical Description – Sex, `M`, `F` or `X` (DAD).
        sex: F1A => Sex: b"DAD",

        /// Date of Birth, MMDDCCYY (DBB).
        date_of_birth: F8N => DateOfBirth: b"DBB",

        /// Document Expiration Date, MMDDCCYY (DBA).
        document_expiration_date: F8N => DocumentExpirationDate: b"DBA",

        /// Document Issue Date, MMDDCCYY (DBD).
        document_issue_date: F8N => DocumentIssueDate: b"DBD",

        /// Jurisdiction-specific vehicle class (DBC).
        vehicle_class: V6Ans => VehicleClass: b"DBC",

        /// Physical Description – Height, `NNN in` (DAU).
        height: F6Ans => Height: b"DAU",

        /// Physical Description – Eye Color (DAY).
        eye_color: F3A => EyeColor: b"DAY",

        /// Address – Street 1 (DAG).
        address_street_1: V35Ans => AddressStreet1: b"DAG",

        /// Address – City (DAI).
        address_city: V20Ans => AddressCity: b"DAI",

        /// Address – Jurisdiction Code (DAJ).
        address_jurisdiction_code: F2A => AddressJurisdictionCode: b"DAJ",

        /// Address – Postal Code (DAK).
        address_postal_code: V11Ans => AddressPostalCode: b"DAK",

        /// Document Discriminator (DCF).
        document_discriminator: V25Ans => DocumentDiscriminator: b"DCF",

        /// Inventory control number, the audit data of the printed
        /// credential (DCK).
        inventory_control_number: V25Ans => InventoryControlNumber: b"DCK"
    }
}

optional_data_elements! {
    pub enum DlOptionalElement, struct DlOptionalElements {
        /// Customer Middle Name(s) (DDF).
        customer_middle_name: V40Ans => CustomerMiddleName: b"DDF",

        /// Hair color (DAZ).
        hair_color: V12A => HairColor: b"DAZ",

        /// Cardholder weight in pounds (DAW).
        weight_in_pounds: F3N => WeightInPounds: b"DAW",

        /// Second line of street portion of the cardholder address (DAH).
        address_street_2: V35Ans => AddressStreet2: b"DAH",

        /// Jurisdiction-specific restriction codes (DDB).
        restriction_codes: V12Ans => RestrictionCodes: b"DDB",

        /// Jurisdiction-specific endorsement codes (DDA).
        endorsement_codes: V5Ans => EndorsementCodes: b"DDA",

        /// Field that indicates that the cardholder is an organ donor = "1"
        /// (DDK).
        organ_donor_indicator: F1N => OrganDonorIndicator: b"DDK",

        /// Field that indicates that the cardholder is a veteran = "1" (DDL).
        veteran_indicator: F1N => VeteranIndicator: b"DDL"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DL_SUBFILE_BYTES: &[u8] = b"DLDAQ091076664\nDCSCROOMS\nDACSTANLEY\nDADM\nDBB04151988\nDBA07282033\nDBD07282025\nDBCD\nDAU069 in\nDAYHAZ\nDAG2110 OLD MAPLE LN\nDAIDURHAM\nDAJTN\nDAK37745\nDCF252090372892550101\nDCK110250728203364\nDDFDAVID\r";

    #[test]
    fn decode_and_reencode() {
        let subfile = DlSubfile::decode_subfile_from_bytes(DL_SUBFILE_BYTES).unwrap();
        assert_eq!(subfile.mandatory.sex, b"M");
        assert_eq!(subfile.mandatory.height, b"069 in");
        assert_eq!(
            subfile.optional.customer_middle_name.as_deref(),
            Some(b"DAVID".as_slice())
        );
        assert_eq!(subfile.len(), 17);

        let encoded = Subfile::try_from(&subfile).unwrap();
        assert_eq!(encoded.to_bytes(), DL_SUBFILE_BYTES);
    }

    #[test]
    fn missing_mandatory_element_is_invalid() {
        let err = DlSubfile::decode_subfile_from_bytes(b"DLDAQ091076664\r").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("DCS"));
    }

    #[test]
    fn unknown_element_is_invalid() {
        assert!(DlSubfile::decode_subfile_from_bytes(b"DLZZZ1\r").is_err());
    }

    #[test]
    fn encoding_checks_formats() {
        let mut subfile = DlSubfile::decode_subfile_from_bytes(DL_SUBFILE_BYTES).unwrap();
        subfile.mandatory.address_city = b"A CITY NAME LONGER THAN TWENTY".to_vec();

        match Subfile::try_from(&subfile) {
            Err(EncodeError::InvalidElement { element, source }) => {
                assert_eq!(element, "DAI");
                assert_eq!(source, InvalidFieldValue::TooLong { len: 30, max: 20 });
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn element_lookup() {
        assert_eq!(
            DlElement::from_id(b"DDF"),
            Some(DlElement::Optional(DlOptionalElement::CustomerMiddleName))
        );
        assert_eq!(DlMandatoryElement::COUNT, 16);
        assert_eq!(DlMandatoryElement::LIST[0].string_id(), "DAQ");
    }
}
