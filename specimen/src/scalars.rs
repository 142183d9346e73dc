//! Production rules for primitive scalar values.
//!
//! All scalars draw from the session RNG so seeded providers reproduce.
//! Numeric values are reliably non-default: integers never come out zero,
//! floats are composed as mantissa x 2^exponent with a nonzero mantissa.

use num_traits::PrimInt;
use rand::Rng;
use rand::RngCore;
use rand::distributions::uniform::SampleUniform;
use rust_decimal::Decimal;

use crate::config::NamingMode;
use crate::error::SpecimenError;
use crate::session::Session;
use crate::specimen::Specimen;

/// Fixed alphabet for text and character synthesis
pub(crate) const ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub(crate) fn alphabet_char(rng: &mut dyn RngCore) -> char {
    ALPHABET[rng.gen_range(0..ALPHABET.len())] as char
}

/// Uniform nonzero magnitude over `[1, T::MAX]`
fn nonzero_magnitude<T>(rng: &mut dyn RngCore) -> T
where
    T: PrimInt + SampleUniform,
{
    rng.gen_range(T::one()..=T::max_value())
}

// ============================================================================
// Integers
// ============================================================================

macro_rules! impl_unsigned_specimen {
    ($($t:ty),*) => {
        $(
            impl Specimen for $t {
                fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
                    Ok(nonzero_magnitude::<$t>(session.rng()))
                }
            }
        )*
    };
}

macro_rules! impl_signed_specimen {
    ($($t:ty),*) => {
        $(
            impl Specimen for $t {
                fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
                    let rng = session.rng();
                    let magnitude = nonzero_magnitude::<$t>(rng);
                    Ok(if rng.gen_bool(0.5) { magnitude } else { -magnitude })
                }
            }
        )*
    };
}

impl_unsigned_specimen!(u8, u16, u32, u64, u128, usize);
impl_signed_specimen!(i8, i16, i32, i64, i128, isize);

// ============================================================================
// Floats
// ============================================================================

impl Specimen for f64 {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        let rng = session.rng();
        let mantissa = rng.gen_range(0.5f64..1.0);
        let exponent = rng.gen_range(-64i32..=64);
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        Ok(sign * mantissa * 2f64.powi(exponent))
    }
}

impl Specimen for f32 {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        let rng = session.rng();
        let mantissa = rng.gen_range(0.5f32..1.0);
        let exponent = rng.gen_range(-24i32..=24);
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        Ok(sign * mantissa * 2f32.powi(exponent))
    }
}

// ============================================================================
// Fixed-point decimal
// ============================================================================

impl Specimen for Decimal {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        let rng = session.rng();
        let integer: i64 = rng.gen_range(1..=1_000_000_000);
        let fraction: i64 = rng.gen_range(0..10_000);
        let sign: i64 = if rng.gen_bool(0.5) { 1 } else { -1 };
        Ok(Decimal::new(sign * (integer * 10_000 + fraction), 4))
    }
}

// ============================================================================
// Boolean and character
// ============================================================================

impl Specimen for bool {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        Ok(session.rng().gen_bool(0.5))
    }
}

impl Specimen for char {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        Ok(alphabet_char(session.rng()))
    }
}

// ============================================================================
// Text
// ============================================================================

impl Specimen for String {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        let min_len = session.options().min_text_len;
        let max_len = session.options().max_text_len;
        let naming = session.options().naming_mode;

        let length = session.rng().gen_range(min_len..=max_len);
        let mut value = String::with_capacity(length);
        if naming == NamingMode::PropertyBased {
            if let Some(name) = session.current_property() {
                value.extend(name.chars().filter(char::is_ascii).take(length));
            }
        }
        while value.len() < length {
            value.push(alphabet_char(session.rng()));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{FillOptions, NamingMode};
    use crate::testutil::{with_options, with_session};
    use rust_decimal::Decimal;

    #[test]
    fn test_integers_are_never_zero() {
        with_session(11, |session| {
            for _ in 0..200 {
                assert_ne!(session.synthesize::<u8>().unwrap(), 0);
                assert_ne!(session.synthesize::<i8>().unwrap(), 0);
                assert_ne!(session.synthesize::<u64>().unwrap(), 0);
                assert_ne!(session.synthesize::<i64>().unwrap(), 0);
            }
        });
    }

    #[test]
    fn test_signed_integers_cover_both_signs() {
        with_session(13, |session| {
            let values: Vec<i32> = (0..100)
                .map(|_| session.synthesize::<i32>().unwrap())
                .collect();
            assert!(values.iter().any(|v| *v > 0));
            assert!(values.iter().any(|v| *v < 0));
        });
    }

    #[test]
    fn test_floats_are_finite_and_nonzero() {
        with_session(17, |session| {
            for _ in 0..100 {
                let value = session.synthesize::<f64>().unwrap();
                assert!(value.is_finite());
                assert_ne!(value, 0.0);

                let value = session.synthesize::<f32>().unwrap();
                assert!(value.is_finite());
                assert_ne!(value, 0.0);
            }
        });
    }

    #[test]
    fn test_decimal_is_nonzero() {
        with_session(19, |session| {
            for _ in 0..100 {
                let value = session.synthesize::<Decimal>().unwrap();
                assert_ne!(value, Decimal::ZERO);
            }
        });
    }

    #[test]
    fn test_text_length_within_bounds() {
        let options = FillOptions {
            min_text_len: 3,
            max_text_len: 9,
            ..FillOptions::default()
        };
        with_options(options, 23, |session| {
            for _ in 0..100 {
                let value = session.synthesize::<String>().unwrap();
                assert!(value.len() >= 3 && value.len() <= 9, "length {}", value.len());
                assert!(value.bytes().all(|b| b.is_ascii_alphanumeric()));
            }
        });
    }

    #[test]
    fn test_property_based_naming_prefixes_value() {
        let options = FillOptions {
            min_text_len: 8,
            max_text_len: 8,
            naming_mode: NamingMode::PropertyBased,
            ..FillOptions::default()
        };
        with_options(options, 29, |session| {
            let value: String = session.property("nickname").unwrap();
            assert!(value.starts_with("nickname"));
            assert_eq!(value.len(), 8);
        });
    }

    #[test]
    fn test_char_comes_from_alphabet() {
        with_session(31, |session| {
            for _ in 0..100 {
                let value = session.synthesize::<char>().unwrap();
                assert!(value.is_ascii_alphanumeric());
            }
        });
    }
}
