//! Exact rational quantities.
//!
//! Capacities, demands, distances, allocations and costs all share one
//! arbitrary-precision fraction type so that rationing never rounds. Text
//! forms accepted by [`parse_quantity`]: integers (`"3"`), fractions
//! (`"3/2"`) and finite decimals (`"1.25"`).

use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::LogisticsError;

/// Arbitrary-precision exact fraction.
pub type Quantity = BigRational;

/// A whole-number quantity.
#[inline]
pub fn whole(n: i64) -> Quantity {
    Quantity::from_integer(BigInt::from(n))
}

/// Sum a sequence of quantities exactly.
pub fn sum<'a, I>(values: I) -> Quantity
where
    I: IntoIterator<Item = &'a Quantity>,
{
    values.into_iter().fold(Quantity::zero(), |acc, v| acc + v)
}

/// Parse a quantity from its text form. `field` names the value in errors.
pub fn parse_quantity(field: &'static str, text: &str) -> Result<Quantity, LogisticsError> {
    let trimmed = text.trim();
    let malformed = |reason| LogisticsError::InvalidQuantity {
        field,
        value: text.to_string(),
        reason,
    };

    if trimmed.contains('/') {
        return Quantity::from_str(trimmed).map_err(|_| malformed("malformed fraction"));
    }
    if trimmed.contains('.') {
        return parse_decimal(trimmed).ok_or_else(|| malformed("malformed decimal"));
    }
    BigInt::from_str(trimmed)
        .map(Quantity::from_integer)
        .map_err(|_| malformed("malformed integer"))
}

fn parse_decimal(text: &str) -> Option<Quantity> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (int_part, frac_part) = body.split_once('.')?;
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{int_part}{frac_part}");
    let numer = BigInt::from_str(&digits).ok()?;
    let denom: BigInt = BigInt::from(10u32).pow(frac_part.len() as u32);
    let value = Quantity::new(numer, denom);
    Some(if negative { -value } else { value })
}

/// Reject zero and negative values.
pub fn require_positive(field: &'static str, value: &Quantity) -> Result<(), LogisticsError> {
    if value.is_positive() {
        Ok(())
    } else {
        Err(LogisticsError::InvalidQuantity {
            field,
            value: value.to_string(),
            reason: "must be greater than zero",
        })
    }
}

/// Lossy conversion for display. Never feed the result back into rationing.
pub fn to_f64(value: &Quantity) -> f64 {
    match (value.numer().to_f64(), value.denom().to_f64()) {
        (Some(numer), Some(denom)) => numer / denom,
        _ => f64::NAN,
    }
}

/// Serde adapter storing a [`Quantity`] as its exact text form.
///
/// Deserialization also accepts integers and finite decimal floats, so data
/// files can write `capacity: 2`, `capacity: 1.5` or `capacity: "3/2"`.
pub mod serde_str {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    use super::{Quantity, parse_quantity, whole};

    pub fn serialize<S>(value: &Quantity, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Quantity, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(QuantityVisitor)
    }

    struct QuantityVisitor;

    impl Visitor<'_> for QuantityVisitor {
        type Value = Quantity;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer, a finite decimal, or a fraction string such as \"3/2\"")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quantity, E> {
            Ok(whole(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quantity, E> {
            Ok(Quantity::from_integer(v.into()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Quantity, E> {
            if !v.is_finite() {
                return Err(E::custom(format!("quantity must be finite, got {v}")));
            }
            parse_quantity("quantity", &v.to_string()).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Quantity, E> {
            parse_quantity("quantity", v).map_err(E::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: i64) -> Quantity {
        Quantity::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn parses_integers_fractions_and_decimals() {
        assert_eq!(parse_quantity("capacity", "3").unwrap(), whole(3));
        assert_eq!(parse_quantity("capacity", " 3/2 ").unwrap(), q(3, 2));
        assert_eq!(parse_quantity("capacity", "6/4").unwrap(), q(3, 2));
        assert_eq!(parse_quantity("capacity", "1.25").unwrap(), q(5, 4));
        assert_eq!(parse_quantity("capacity", "-0.5").unwrap(), q(-1, 2));
        assert_eq!(parse_quantity("capacity", ".5").unwrap(), q(1, 2));
    }

    #[test]
    fn malformed_text_is_rejected() {
        for text in ["", "abc", "1/0", "1.2.3", "1/2/3", ".", "1e3"] {
            let err = parse_quantity("demand", text).unwrap_err();
            assert!(
                matches!(err, LogisticsError::InvalidQuantity { field: "demand", .. }),
                "{text:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn non_positive_values_are_rejected() {
        assert!(require_positive("capacity", &whole(1)).is_ok());
        assert!(require_positive("capacity", &q(1, 1000)).is_ok());
        assert!(require_positive("capacity", &whole(0)).is_err());
        assert!(require_positive("capacity", &q(-3, 2)).is_err());
    }

    #[test]
    fn sum_is_exact() {
        let parts = [q(1, 3), q(1, 3), q(1, 3)];
        assert_eq!(sum(&parts), whole(1));
        assert_eq!(sum(&[]), whole(0));
    }

    #[test]
    fn display_conversion_is_lossy_but_close() {
        assert_eq!(to_f64(&q(3, 2)), 1.5);
        assert!((to_f64(&q(1, 3)) - 0.333_333).abs() < 1e-6);
    }

    #[test]
    fn serde_str_round_trips_through_json() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Holder {
            #[serde(with = "serde_str")]
            amount: Quantity,
        }

        let json = serde_json::to_string(&Holder { amount: q(7, 3) }).unwrap();
        assert_eq!(json, r#"{"amount":"7/3"}"#);

        let back: Holder = serde_json::from_str(&json).unwrap();
        assert_eq!(back.amount, q(7, 3));

        let from_int: Holder = serde_json::from_str(r#"{"amount":4}"#).unwrap();
        assert_eq!(from_int.amount, whole(4));

        let from_float: Holder = serde_json::from_str(r#"{"amount":0.1}"#).unwrap();
        assert_eq!(from_float.amount, q(1, 10));

        assert!(serde_json::from_str::<Holder>(r#"{"amount":"x"}"#).is_err());
    }
}
