use std::fmt;

use tracing::debug;

use super::{
    input::{Field, LicenseInput},
    values::{parse_flag, parse_text, Date, EyeColor, HairColor, Height, Sex, Weight},
};
use crate::aamva::{dlid::types::F5N, Jurisdiction, Registry};

const ZIP_CODE_EXPECTED: &str = "5 digits";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("`{field}` is required")]
    MissingField { field: &'static str },

    #[error("`{field}` must be {expected}, found {value:?}")]
    InvalidFormat {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("unknown jurisdiction `{code}`")]
    UnknownJurisdiction { code: String },
}

impl Violation {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::InvalidFormat { field, .. } => *field,
            Self::UnknownJurisdiction { .. } => Field::State.name(),
        }
    }
}

/// Every violation found in a [`LicenseInput`], in field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid license data: {}", Violations(.0.as_slice()))]
pub struct ValidationError(pub Vec<Violation>);

impl ValidationError {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn contains_field(&self, field: Field) -> bool {
        self.0.iter().any(|v| v.field() == field.name())
    }
}

struct Violations<'a>(&'a [Violation]);

impl fmt::Display for Violations<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }

            violation.fmt(f)?;
        }

        Ok(())
    }
}

/// License data proven to satisfy the field rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields {
    pub(crate) dl_number: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) middle_name: Option<String>,
    pub(crate) address: String,
    pub(crate) address_2nd_line: Option<String>,
    pub(crate) city: String,
    pub(crate) jurisdiction: Jurisdiction,
    pub(crate) zip_code: F5N,
    pub(crate) sex: Sex,
    pub(crate) height: Height,
    pub(crate) weight: Option<Weight>,
    pub(crate) birth_date: Date,
    pub(crate) issue_date: Date,
    pub(crate) expiry_date: Date,
    pub(crate) eye_color: EyeColor,
    pub(crate) hair_color: Option<HairColor>,
    pub(crate) dl_class: Option<String>,
    pub(crate) icn: Option<String>,
    pub(crate) dd: Option<String>,
    pub(crate) restrictions: Option<String>,
    pub(crate) endorsements: Option<String>,
    pub(crate) donor: bool,
    pub(crate) veteran: bool,
    pub(crate) real_id: bool,
}

impl ValidatedFields {
    pub fn dl_number(&self) -> &str {
        &self.dl_number
    }

    pub fn jurisdiction(&self) -> &Jurisdiction {
        &self.jurisdiction
    }

    pub fn birth_date(&self) -> Date {
        self.birth_date
    }

    pub fn issue_date(&self) -> Date {
        self.issue_date
    }

    pub fn expiry_date(&self) -> Date {
        self.expiry_date
    }

    pub fn height(&self) -> Height {
        self.height
    }

    pub fn is_organ_donor(&self) -> bool {
        self.donor
    }

    pub fn is_veteran(&self) -> bool {
        self.veteran
    }

    pub fn is_real_id(&self) -> bool {
        self.real_id
    }
}

struct Checker<'a> {
    input: &'a LicenseInput,
    violations: Vec<Violation>,
}

impl<'a> Checker<'a> {
    fn required(&mut self, field: Field) -> Option<&'a str> {
        let value = self.input.trimmed(field);
        if value.is_none() {
            self.violations.push(Violation::MissingField {
                field: field.name(),
            });
        }

        value
    }

    fn check<T>(
        &mut self,
        field: Field,
        value: &'a str,
        parse: impl FnOnce(&'a str) -> Result<T, &'static str>,
    ) -> Option<T> {
        match parse(value) {
            Ok(value) => Some(value),
            Err(expected) => {
                self.violations.push(Violation::InvalidFormat {
                    field: field.name(),
                    expected,
                    value: value.to_owned(),
                });
                None
            }
        }
    }

    fn required_as<T>(
        &mut self,
        field: Field,
        parse: impl FnOnce(&'a str) -> Result<T, &'static str>,
    ) -> Option<T> {
        let value = self.required(field)?;
        self.check(field, value, parse)
    }

    /// `Some(None)` when absent, `None` when present but invalid.
    fn optional_as<T>(
        &mut self,
        field: Field,
        parse: impl FnOnce(&'a str) -> Result<T, &'static str>,
    ) -> Option<Option<T>> {
        match self.input.trimmed(field) {
            Some(value) => self.check(field, value, parse).map(Some),
            None => Some(None),
        }
    }

    fn required_text(&mut self, field: Field) -> Option<String> {
        self.required_as(field, |v| parse_text(v).map(str::to_owned))
    }

    fn optional_text(&mut self, field: Field) -> Option<Option<String>> {
        self.optional_as(field, |v| parse_text(v).map(str::to_owned))
    }

    fn flag(&mut self, field: Field, default: bool) -> Option<bool> {
        self.optional_as(field, parse_flag)
            .map(|value| value.unwrap_or(default))
    }
}

/// Checks every field rule of `input`, collecting all violations.
///
/// The state must resolve through `registry`.
pub fn validate(
    input: &LicenseInput,
    registry: &Registry,
) -> Result<ValidatedFields, ValidationError> {
    let mut checker = Checker {
        input,
        violations: Vec::new(),
    };

    let dl_number = checker.required_text(Field::DlNumber);
    let first_name = checker.required_text(Field::FirstName);
    let last_name = checker.required_text(Field::LastName);
    let middle_name = checker.optional_text(Field::MiddleName);
    let address = checker.required_text(Field::Address);
    let address_2nd_line = checker.optional_text(Field::Address2ndLine);
    let city = checker.required_text(Field::City);
    let jurisdiction = checker
        .required(Field::State)
        .and_then(|code| match registry.lookup(code) {
            Ok(jurisdiction) => Some(jurisdiction.clone()),
            Err(e) => {
                checker
                    .violations
                    .push(Violation::UnknownJurisdiction { code: e.0 });
                None
            }
        });
    let zip_code = checker.required_as(Field::ZipCode, |v| {
        F5N::new(v).map_err(|_| ZIP_CODE_EXPECTED)
    });
    let sex = checker.required_as(Field::Sex, Sex::parse);
    let height = checker.required_as(Field::HeightInches, Height::parse);
    let weight = checker.optional_as(Field::WeightLbs, Weight::parse);
    let birth_date = checker.required_as(Field::BirthDate, Date::parse);
    let issue_date = checker.required_as(Field::IssueDate, Date::parse);
    let expiry_date = checker.required_as(Field::ExpiryDate, Date::parse);
    let eye_color = checker.required_as(Field::EyeColor, EyeColor::parse);
    let hair_color = checker.optional_as(Field::HairColor, HairColor::parse);
    let dl_class = checker.optional_text(Field::DlClass);
    let icn = checker.optional_text(Field::Icn);
    let dd = checker.optional_text(Field::Dd);
    let restrictions = checker.optional_text(Field::Restrictions);
    let endorsements = checker.optional_text(Field::Endorsements);
    let donor = checker.flag(Field::Donor, false);
    let veteran = checker.flag(Field::Veteran, false);
    let real_id = checker.flag(Field::IsRealId, true);

    let fields = (|| {
        Some(ValidatedFields {
            dl_number: dl_number?,
            first_name: first_name?,
            last_name: last_name?,
            middle_name: middle_name?,
            address: address?,
            address_2nd_line: address_2nd_line?,
            city: city?,
            jurisdiction: jurisdiction?,
            zip_code: zip_code?,
            sex: sex?,
            height: height?,
            weight: weight?,
            birth_date: birth_date?,
            issue_date: issue_date?,
            expiry_date: expiry_date?,
            eye_color: eye_color?,
            hair_color: hair_color?,
            dl_class: dl_class?,
            icn: icn?,
            dd: dd?,
            restrictions: restrictions?,
            endorsements: endorsements?,
            donor: donor?,
            veteran: veteran?,
            real_id: real_id?,
        })
    })();

    match fields {
        Some(fields) if checker.violations.is_empty() => Ok(fields),
        _ => {
            debug!(
                violations = checker.violations.len(),
                "license data rejected"
            );
            Err(ValidationError(checker.violations))
        }
    }
}
