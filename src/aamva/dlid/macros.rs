macro_rules! data_elements_enum {
	($(#[$enum_meta:meta])* $vis:vis enum $enum_id:ident { $($(#[$meta:meta])* $id:ident : $tag:literal => $ty:ident),* }) => {
		$(#[$enum_meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
		$vis enum $enum_id {
			$($(#[$meta])* $id),*
		}

		impl $enum_id {
			pub const COUNT: usize = $crate::aamva::dlid::data_elements_enum!(@count $($id,)*);
			pub const LIST: [Self; Self::COUNT] = [$(Self::$id),*];

			pub fn from_id(id: &[u8; 3]) -> Option<Self> {
				match id {
					$($tag => Some(Self::$id),)*
					_ => None
				}
			}

			pub fn id(&self) -> &'static [u8; 3] {
				match self {
					$(Self::$id => $tag),*
				}
			}

			/// Checks `value` against the field format of this element.
			pub fn check(&self, value: &[u8]) -> Result<(), $crate::aamva::dlid::types::InvalidFieldValue> {
				match self {
					$(Self::$id => $ty::check(value)),*
				}
			}
		}

		impl $enum_id {
			pub fn string_id(&self) -> &'static str {
				unsafe { std::str::from_utf8_unchecked(self.id()) }
			}
		}

		impl std::fmt::Display for $enum_id {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str(self.string_id())
			}
		}
	};
	(@count $a:ident, $($rest:ident,)*) => {
		1usize + $crate::aamva::dlid::data_elements_enum!(@count $($rest,)*)
	};
	(@count) => {
		0usize
	}
}

macro_rules! mandatory_data_elements {
	($(#[$enum_meta:meta])* $vis:vis enum $enum_id:ident, struct $struct_id:ident ($partial_id:ident) { $($(#[$meta:meta])* $field:ident : $ty:ident => $id:ident : $tag:literal),* }) => {
		$crate::aamva::dlid::data_elements_enum!($(#[$enum_meta])* $vis enum $enum_id { $($(#[$meta])* $id : $tag => $ty),* });

		#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
		$vis struct $struct_id {
			$($(#[$meta])* pub $field: Vec<u8>),*
		}

		impl $struct_id {
			pub fn iter(&self) -> impl Iterator<Item = ($enum_id, &[u8])> {
				[$(($enum_id::$id, self.$field.as_slice())),*].into_iter()
			}
		}

		#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
		$vis struct $partial_id {
			$($(#[$meta])* pub $field: Option<Vec<u8>>),*
		}

		impl $partial_id {
			pub fn set(&mut self, element: $enum_id, value: Vec<u8>) {
				match element {
					$($enum_id::$id => { self.$field = Some(value) }),*
				}
			}

			pub fn build(self) -> Result<$struct_id, $crate::aamva::dlid::MissingDataElement<$enum_id>> {
				Ok($struct_id {
					$($field: self.$field.ok_or($crate::aamva::dlid::MissingDataElement($enum_id::$id))?),*
				})
			}
		}
	}
}

macro_rules! optional_data_elements {
	($(#[$enum_meta:meta])* $vis:vis enum $enum_id:ident, struct $struct_id:ident { $($(#[$meta:meta])* $field:ident : $ty:ident => $id:ident : $tag:literal),* }) => {
		$crate::aamva::dlid::data_elements_enum!($(#[$enum_meta])* $vis enum $enum_id { $($(#[$meta])* $id : $tag => $ty),* });

		#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
		$vis struct $struct_id {
			$($(#[$meta])* pub $field: Option<Vec<u8>>),*
		}

		impl $struct_id {
			#[allow(clippy::len_without_is_empty)]
			pub fn len(&self) -> usize {
				let mut result = 0;

				$(
					if self.$field.is_some() {
						result += 1
					}
				)*

				result
			}

			pub fn set(&mut self, element: $enum_id, value: Option<Vec<u8>>) {
				match element {
					$($enum_id::$id => { self.$field = value }),*
				}
			}

			pub fn iter(&self) -> impl Iterator<Item = ($enum_id, &[u8])> {
				[$(
					self.$field
						.as_ref()
						.map(|value| ($enum_id::$id, value.as_slice()))
				),*].into_iter().flatten()
			}
		}
	}
}

pub(crate) use data_elements_enum;
pub(crate) use mandatory_data_elements;
pub(crate) use optional_data_elements;
