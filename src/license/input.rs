use serde::{Deserialize, Serialize};

macro_rules! license_fields {
	($($(#[$meta:meta])* $field:ident => $variant:ident),*) => {
		/// Name of a [`LicenseInput`] field.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
		pub enum Field {
			$($variant),*
		}

		impl Field {
			pub const ALL: &'static [Self] = &[$(Self::$variant),*];

			pub fn name(&self) -> &'static str {
				match self {
					$(Self::$variant => stringify!($field)),*
				}
			}

			pub fn from_name(name: &str) -> Option<Self> {
				match name {
					$(stringify!($field) => Some(Self::$variant),)*
					"endorsement" => Some(Self::Endorsements),
					_ => None
				}
			}
		}

		/// Raw license data, as posted by a form.
		///
		/// Every field is an untrusted string that may be absent, empty or
		/// malformed.
		#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
		#[serde(default)]
		pub struct LicenseInput {
			$($(#[$meta])* pub $field: Option<String>),*
		}

		impl LicenseInput {
			pub fn get(&self, field: Field) -> Option<&str> {
				match field {
					$(Field::$variant => self.$field.as_deref()),*
				}
			}

			pub fn set(&mut self, field: Field, value: impl Into<String>) {
				match field {
					$(Field::$variant => self.$field = Some(value.into())),*
				}
			}
		}
	};
}

license_fields! {
    dl_number => DlNumber,
    first_name => FirstName,
    last_name => LastName,
    middle_name => MiddleName,
    address => Address,
    address_2nd_line => Address2ndLine,
    city => City,
    state => State,
    zip_code => ZipCode,
    sex => Sex,
    /// Inches (`69`) or feet and inches (`5'9` or `5'9"`).
    height_inches => HeightInches,
    weight_lbs => WeightLbs,
    /// MMDDYYYY.
    birth_date => BirthDate,
    /// MMDDYYYY.
    issue_date => IssueDate,
    /// MMDDYYYY.
    expiry_date => ExpiryDate,
    eye_color => EyeColor,
    hair_color => HairColor,
    dl_class => DlClass,
    /// Document discriminator, generated when absent.
    icn => Icn,
    /// Inventory control number, generated when absent.
    dd => Dd,
    restrictions => Restrictions,
    #[serde(alias = "endorsement")]
    endorsements => Endorsements,
    donor => Donor,
    veteran => Veteran,
    is_real_id => IsRealId
}

impl LicenseInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an input from `(name, value)` pairs. Unknown names are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut result = Self::new();
        for (name, value) in pairs {
            if let Some(field) = Field::from_name(name.as_ref()) {
                result.set(field, value);
            }
        }

        result
    }

    /// Value of `field` with surrounding whitespace removed, or `None` if it
    /// is absent or blank.
    pub fn trimmed(&self, field: Field) -> Option<&str> {
        self.get(field).map(str::trim).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_ignores_unknown_names() {
        let input = LicenseInput::from_pairs([
            ("dl_number", "091076664"),
            ("endorsement", "NONE"),
            ("favorite_color", "BLUE"),
        ]);

        assert_eq!(input.dl_number.as_deref(), Some("091076664"));
        assert_eq!(input.endorsements.as_deref(), Some("NONE"));
        assert_eq!(input.get(Field::City), None);
    }

    #[test]
    fn blank_values_are_absent() {
        let input = LicenseInput::from_pairs([("city", "  "), ("state", " TN ")]);
        assert_eq!(input.trimmed(Field::City), None);
        assert_eq!(input.trimmed(Field::State), Some("TN"));
    }

    #[test]
    fn deserialize_json_object() {
        let input: LicenseInput = serde_json::from_str(
            r#"{"first_name": "STANLEY", "middle_name": null, "endorsement": "A"}"#,
        )
        .unwrap();

        assert_eq!(input.first_name.as_deref(), Some("STANLEY"));
        assert_eq!(input.middle_name, None);
        assert_eq!(input.endorsements.as_deref(), Some("A"));
    }

    #[test]
    fn field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(*field));
        }
    }
}
