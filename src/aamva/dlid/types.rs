use std::{fmt, marker::PhantomData, ops::Deref};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFieldValue {
    #[error("{len} bytes exceeds the maximum length of {max}")]
    TooLong { len: usize, max: usize },

    #[error("expected exactly {expected} bytes, found {len}")]
    WrongLength { len: usize, expected: usize },

    #[error("{value} contains characters outside of the {class} class")]
    InvalidCharacter { value: MaybeAscii, class: &'static str },
}

#[derive(Clone, PartialEq, Eq)]
pub struct MaybeAscii(pub Vec<u8>);

impl fmt::Display for MaybeAscii {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) if self.0.is_ascii() => write!(f, "{s:?}"),
            _ => write!(f, "{:?}", self.0),
        }
    }
}

impl fmt::Debug for MaybeAscii {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// ASCII character class.
///
/// # Safety
///
/// The `contains` function must return only for ASCII bytes.
pub unsafe trait CharClass {
    const NAME: &'static str;

    fn contains(c: u8) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alpha;

unsafe impl CharClass for Alpha {
    const NAME: &'static str = "alpha";

    fn contains(c: u8) -> bool {
        c.is_ascii_alphabetic()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Numeric;

unsafe impl CharClass for Numeric {
    const NAME: &'static str = "numeric";

    fn contains(c: u8) -> bool {
        c.is_ascii_digit()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlphaNumeric;

unsafe impl CharClass for AlphaNumeric {
    const NAME: &'static str = "alphanumeric";

    fn contains(c: u8) -> bool {
        c.is_ascii_alphanumeric()
    }
}

/// Printable ASCII.
///
/// Control characters are excluded since the separators and terminators of
/// the file format are control characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlphaNumericSpecial;

unsafe impl CharClass for AlphaNumericSpecial {
    const NAME: &'static str = "printable ASCII";

    fn contains(c: u8) -> bool {
        c.is_ascii() && !c.is_ascii_control()
    }
}

fn check_class<C: CharClass>(bytes: &[u8]) -> Result<(), InvalidFieldValue> {
    if bytes.iter().copied().all(C::contains) {
        Ok(())
    } else {
        Err(InvalidFieldValue::InvalidCharacter {
            value: MaybeAscii(bytes.to_owned()),
            class: C::NAME,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed<C: CharClass, const N: usize> {
    data: [u8; N],
    class: PhantomData<C>,
}

impl<C: CharClass, const N: usize> Fixed<C, N> {
    /// Checks that `bytes` is a valid value of this field format without
    /// building it.
    pub fn check(bytes: &[u8]) -> Result<(), InvalidFieldValue> {
        if bytes.len() != N {
            return Err(InvalidFieldValue::WrongLength {
                len: bytes.len(),
                expected: N,
            });
        }

        check_class::<C>(bytes)
    }

    pub fn new(value: impl AsRef<[u8]>) -> Result<Self, InvalidFieldValue> {
        let bytes = value.as_ref();
        Self::check(bytes)?;

        let mut data = [0u8; N];
        data.copy_from_slice(bytes);

        Ok(Self {
            data,
            class: PhantomData,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_str(&self) -> &str {
        unsafe {
            // SAFETY: the character class `C` ensures that all bytes are in the
            //         ASCII range.
            std::str::from_utf8_unchecked(self.as_bytes())
        }
    }
}

impl<C: CharClass, const N: usize> Deref for Fixed<C, N> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl<C: CharClass, const N: usize> fmt::Display for Fixed<C, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variable length field format, holding at most `N` bytes.
///
/// Unlike [`Fixed`] this is only used to check values, never to store them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable<C: CharClass, const N: usize>(PhantomData<C>);

impl<C: CharClass, const N: usize> Variable<C, N> {
    pub fn check(bytes: &[u8]) -> Result<(), InvalidFieldValue> {
        if bytes.len() > N {
            return Err(InvalidFieldValue::TooLong {
                len: bytes.len(),
                max: N,
            });
        }

        check_class::<C>(bytes)
    }
}

pub type F1A = Fixed<Alpha, 1>;
pub type F2A = Fixed<Alpha, 2>;
pub type F3A = Fixed<Alpha, 3>;

pub type F1N = Fixed<Numeric, 1>;
pub type F3N = Fixed<Numeric, 3>;
pub type F5N = Fixed<Numeric, 5>;
pub type F6N = Fixed<Numeric, 6>;
pub type F8N = Fixed<Numeric, 8>;

pub type F6Ans = Fixed<AlphaNumericSpecial, 6>;

pub type V12A = Variable<Alpha, 12>;

pub type V5Ans = Variable<AlphaNumericSpecial, 5>;
pub type V6Ans = Variable<AlphaNumericSpecial, 6>;
pub type V11Ans = Variable<AlphaNumericSpecial, 11>;
pub type V12Ans = Variable<AlphaNumericSpecial, 12>;
pub type V20Ans = Variable<AlphaNumericSpecial, 20>;
pub type V25Ans = Variable<AlphaNumericSpecial, 25>;
pub type V35Ans = Variable<AlphaNumericSpecial, 35>;
pub type V40Ans = Variable<AlphaNumericSpecial, 40>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_length_is_exact() {
        assert!(F8N::check(b"04151988").is_ok());
        assert_eq!(
            F8N::check(b"0415198"),
            Err(InvalidFieldValue::WrongLength {
                len: 7,
                expected: 8
            })
        );
        assert!(matches!(
            F8N::check(b"O4151988"),
            Err(InvalidFieldValue::InvalidCharacter { class: "numeric", .. })
        ));
    }

    #[test]
    fn variable_length_is_bounded() {
        assert!(V5Ans::check(b"").is_ok());
        assert!(V5Ans::check(b"NONE").is_ok());
        assert_eq!(
            V5Ans::check(b"TOOLONG"),
            Err(InvalidFieldValue::TooLong { len: 7, max: 5 })
        );
    }

    #[test]
    fn separators_are_not_printable() {
        assert!(V20Ans::check(b"DURHAM\nDAJ").is_err());
        assert!(V20Ans::check(b"DURHAM\r").is_err());
        assert!(V20Ans::check(b"ST. JOHN'S #2").is_ok());
    }

    #[test]
    fn fixed_value_derefs_to_str() {
        let zip = F5N::new("37745").unwrap();
        assert_eq!(&*zip, "37745");
        assert_eq!(zip.to_string(), "37745");
    }
}
