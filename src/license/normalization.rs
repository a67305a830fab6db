use std::io;

use tracing::debug;

use super::{IdentifierProvider, ValidatedFields};
use crate::aamva::dlid::{DlMandatoryElements, DlOptionalElements, DlSubfile};

/// Unit appended to the height value of the `DAU` element.
pub const HEIGHT_UNIT: &str = " in";

pub const DEFAULT_DL_CLASS: &str = "D";

/// License data in its encoded form.
///
/// Every value is the exact text written after its element tag, except
/// `height` which is written followed by [`HEIGHT_UNIT`]. Absent optional
/// values are not written at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFields {
    pub dl_number: String,
    pub last_name: String,
    pub first_name: String,
    pub sex: String,
    pub birth_date: String,
    pub expiry_date: String,
    pub issue_date: String,
    pub dl_class: String,
    /// Inches, 3 digits.
    pub height: String,
    pub eye_color: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub icn: String,
    pub dd: String,
    pub middle_name: Option<String>,
    pub hair_color: Option<String>,
    pub weight: Option<String>,
    pub address_2nd_line: Option<String>,
    pub restrictions: Option<String>,
    pub endorsements: Option<String>,
    pub organ_donor: bool,
    pub veteran: bool,
}

fn upper(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// Converts validated data to its encoded form.
///
/// Missing identifiers are taken from `identifiers`.
pub fn normalize(fields: ValidatedFields, identifiers: &dyn IdentifierProvider) -> NormalizedFields {
    let icn = match &fields.icn {
        Some(icn) => upper(icn),
        None => {
            debug!("generating document discriminator");
            identifiers.document_discriminator(&fields)
        }
    };

    let dd = match &fields.dd {
        Some(dd) => upper(dd),
        None => {
            debug!("generating inventory control number");
            identifiers.inventory_control_number(&fields)
        }
    };

    NormalizedFields {
        dl_number: upper(&fields.dl_number),
        last_name: upper(&fields.last_name),
        first_name: upper(&fields.first_name),
        sex: fields.sex.code().to_owned(),
        birth_date: fields.birth_date.to_string(),
        expiry_date: fields.expiry_date.to_string(),
        issue_date: fields.issue_date.to_string(),
        dl_class: fields
            .dl_class
            .as_deref()
            .map(upper)
            .unwrap_or_else(|| DEFAULT_DL_CLASS.to_owned()),
        height: fields.height.encode(),
        eye_color: fields.eye_color.code().to_owned(),
        address: upper(&fields.address),
        city: upper(&fields.city),
        state: fields.jurisdiction.code().to_owned(),
        zip_code: fields.zip_code.to_string(),
        icn,
        dd,
        middle_name: fields.middle_name.as_deref().map(upper),
        hair_color: fields.hair_color.map(|c| c.code().to_owned()),
        weight: fields.weight.map(|w| w.encode()),
        address_2nd_line: fields.address_2nd_line.as_deref().map(upper),
        restrictions: fields.restrictions.as_deref().map(upper),
        endorsements: fields.endorsements.as_deref().map(upper),
        organ_donor: fields.donor,
        veteran: fields.veteran,
    }
}

const INDICATOR: &[u8] = b"1";

impl NormalizedFields {
    /// Lays the fields out as `DL` subfile elements.
    pub fn to_dl_subfile(&self) -> DlSubfile {
        fn bytes(value: &str) -> Vec<u8> {
            value.as_bytes().to_vec()
        }

        fn optional(value: &Option<String>) -> Option<Vec<u8>> {
            value.as_deref().map(bytes)
        }

        fn indicator(value: bool) -> Option<Vec<u8>> {
            value.then(|| INDICATOR.to_vec())
        }

        DlSubfile {
            mandatory: DlMandatoryElements {
                customer_id_number: bytes(&self.dl_number),
                customer_family_name: bytes(&self.last_name),
                customer_first_name: bytes(&self.first_name),
                sex: bytes(&self.sex),
                date_of_birth: bytes(&self.birth_date),
                document_expiration_date: bytes(&self.expiry_date),
                document_issue_date: bytes(&self.issue_date),
                vehicle_class: bytes(&self.dl_class),
                height: format!("{}{HEIGHT_UNIT}", self.height).into_bytes(),
                eye_color: bytes(&self.eye_color),
                address_street_1: bytes(&self.address),
                address_city: bytes(&self.city),
                address_jurisdiction_code: bytes(&self.state),
                address_postal_code: bytes(&self.zip_code),
                document_discriminator: bytes(&self.icn),
                inventory_control_number: bytes(&self.dd),
            },
            optional: DlOptionalElements {
                customer_middle_name: optional(&self.middle_name),
                hair_color: optional(&self.hair_color),
                weight_in_pounds: optional(&self.weight),
                address_street_2: optional(&self.address_2nd_line),
                restriction_codes: optional(&self.restrictions),
                endorsement_codes: optional(&self.endorsements),
                organ_donor_indicator: indicator(self.organ_donor),
                veteran_indicator: indicator(self.veteran),
            },
        }
    }

    /// Recovers the fields from a decoded `DL` subfile.
    pub fn from_dl_subfile(subfile: &DlSubfile) -> io::Result<Self> {
        fn text(value: &[u8]) -> io::Result<String> {
            String::from_utf8(value.to_vec()).map_err(|_| io::ErrorKind::InvalidData.into())
        }

        let m = &subfile.mandatory;
        let o = &subfile.optional;
        let optional = |value: &Option<Vec<u8>>| value.as_deref().map(text).transpose();
        let indicator = |value: &Option<Vec<u8>>| match value.as_deref() {
            None => Ok(false),
            Some(INDICATOR) => Ok(true),
            Some(_) => Err(io::Error::from(io::ErrorKind::InvalidData)),
        };

        let height = text(&m.height)?;
        let height = height
            .strip_suffix(HEIGHT_UNIT)
            .ok_or(io::ErrorKind::InvalidData)?
            .to_owned();

        Ok(Self {
            dl_number: text(&m.customer_id_number)?,
            last_name: text(&m.customer_family_name)?,
            first_name: text(&m.customer_first_name)?,
            sex: text(&m.sex)?,
            birth_date: text(&m.date_of_birth)?,
            expiry_date: text(&m.document_expiration_date)?,
            issue_date: text(&m.document_issue_date)?,
            dl_class: text(&m.vehicle_class)?,
            height,
            eye_color: text(&m.eye_color)?,
            address: text(&m.address_street_1)?,
            city: text(&m.address_city)?,
            state: text(&m.address_jurisdiction_code)?,
            zip_code: text(&m.address_postal_code)?,
            icn: text(&m.document_discriminator)?,
            dd: text(&m.inventory_control_number)?,
            middle_name: optional(&o.customer_middle_name)?,
            hair_color: optional(&o.hair_color)?,
            weight: optional(&o.weight_in_pounds)?,
            address_2nd_line: optional(&o.address_street_2)?,
            restrictions: optional(&o.restriction_codes)?,
            endorsements: optional(&o.endorsement_codes)?,
            organ_donor: indicator(&o.organ_donor_indicator)?,
            veteran: indicator(&o.veteran_indicator)?,
        })
    }
}
