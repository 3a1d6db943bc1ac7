//! Resource quantities in the Kubernetes quantity grammar.
//!
//! ```text
//! <quantity>  ::= <sign>? <number> <suffix>
//! <number>    ::= <digits> | <digits>. | .<digits> | <digits>.<digits>
//! <suffix>    ::= Ki | Mi | Gi | Ti | Pi | Ei            (binary)
//!               | n | u | m | "" | k | M | G | T | P | E  (decimal)
//!               | (e|E) <sign>? <digits>                  (exponent)
//! ```
//!
//! A quantity keeps the text it was built from. Two quantities are equal
//! when their text is equal, so `1Gi` and `1024Mi` are different values
//! even though [`Quantity::to_base`] agrees on them.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Named unit suffix of a [`Quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityUnit {
    /// Plain count, no suffix
    None,
    Ki,
    Mi,
    Gi,
    Ti,
    Pi,
    Ei,
    /// Decimal nano (`n`)
    Nano,
    /// Decimal micro (`u`)
    Micro,
    /// Decimal milli (`m`)
    Milli,
    /// Decimal kilo (`k`)
    Kilo,
    /// Decimal mega (`M`)
    Mega,
    /// Decimal giga (`G`)
    Giga,
    /// Decimal tera (`T`)
    Tera,
    /// Decimal peta (`P`)
    Peta,
    /// Decimal exa (`E`)
    Exa,
}

impl QuantityUnit {
    const ALL: [QuantityUnit; 16] = [
        QuantityUnit::None,
        QuantityUnit::Ki,
        QuantityUnit::Mi,
        QuantityUnit::Gi,
        QuantityUnit::Ti,
        QuantityUnit::Pi,
        QuantityUnit::Ei,
        QuantityUnit::Nano,
        QuantityUnit::Micro,
        QuantityUnit::Milli,
        QuantityUnit::Kilo,
        QuantityUnit::Mega,
        QuantityUnit::Giga,
        QuantityUnit::Tera,
        QuantityUnit::Peta,
        QuantityUnit::Exa,
    ];

    /// Suffix as written in a quantity string
    pub fn suffix(&self) -> &'static str {
        match self {
            QuantityUnit::None => "",
            QuantityUnit::Ki => "Ki",
            QuantityUnit::Mi => "Mi",
            QuantityUnit::Gi => "Gi",
            QuantityUnit::Ti => "Ti",
            QuantityUnit::Pi => "Pi",
            QuantityUnit::Ei => "Ei",
            QuantityUnit::Nano => "n",
            QuantityUnit::Micro => "u",
            QuantityUnit::Milli => "m",
            QuantityUnit::Kilo => "k",
            QuantityUnit::Mega => "M",
            QuantityUnit::Giga => "G",
            QuantityUnit::Tera => "T",
            QuantityUnit::Peta => "P",
            QuantityUnit::Exa => "E",
        }
    }

    /// Check if this is a power-of-two unit
    pub fn is_binary(&self) -> bool {
        matches!(self.scale(), Scale::Binary(_))
    }

    fn scale(&self) -> Scale {
        match self {
            QuantityUnit::None => Scale::Decimal(0),
            QuantityUnit::Ki => Scale::Binary(10),
            QuantityUnit::Mi => Scale::Binary(20),
            QuantityUnit::Gi => Scale::Binary(30),
            QuantityUnit::Ti => Scale::Binary(40),
            QuantityUnit::Pi => Scale::Binary(50),
            QuantityUnit::Ei => Scale::Binary(60),
            QuantityUnit::Nano => Scale::Decimal(-9),
            QuantityUnit::Micro => Scale::Decimal(-6),
            QuantityUnit::Milli => Scale::Decimal(-3),
            QuantityUnit::Kilo => Scale::Decimal(3),
            QuantityUnit::Mega => Scale::Decimal(6),
            QuantityUnit::Giga => Scale::Decimal(9),
            QuantityUnit::Tera => Scale::Decimal(12),
            QuantityUnit::Peta => Scale::Decimal(15),
            QuantityUnit::Exa => Scale::Decimal(18),
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.suffix() == suffix)
    }
}

/// Multiplier applied to the numeric part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scale {
    /// Power of two
    Binary(u32),
    /// Power of ten, possibly negative
    Decimal(i32),
}

/// Numeric part split into an integer mantissa and a count of fractional digits
#[derive(Debug)]
struct Parsed<'a> {
    negative: bool,
    int_digits: &'a str,
    frac_digits: &'a str,
    scale: Scale,
}

fn parse_parts(s: &str) -> Option<Parsed<'_>> {
    let (negative, rest) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let number_len = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    let (number, suffix) = rest.split_at(number_len);

    let (int_digits, frac_digits) = match number.split_once('.') {
        Some((i, f)) => (i, f),
        None => (number, ""),
    };
    if frac_digits.contains('.') || (int_digits.is_empty() && frac_digits.is_empty()) {
        return None;
    }

    let scale = match QuantityUnit::from_suffix(suffix) {
        Some(unit) => unit.scale(),
        None => {
            let exponent = suffix
                .strip_prefix('e')
                .or_else(|| suffix.strip_prefix('E'))?;
            let digits = exponent.trim_start_matches(&['+', '-'][..]);
            if digits.is_empty()
                || !digits.bytes().all(|b| b.is_ascii_digit())
                || exponent.len() - digits.len() > 1
            {
                return None;
            }
            Scale::Decimal(exponent.parse().ok()?)
        }
    };

    Some(Parsed {
        negative,
        int_digits,
        frac_digits,
        scale,
    })
}

/// An amount of some resource as written in the Kubernetes quantity grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quantity {
    text: String,
}

impl Quantity {
    /// Integral `value` in `unit`, e.g. `Quantity::new(80, QuantityUnit::Gi)`.
    pub fn new(value: i64, unit: QuantityUnit) -> Self {
        Self {
            text: format!("{}{}", value, unit.suffix()),
        }
    }

    /// `value` GiB (binary prefix).
    pub fn gibibytes(value: i64) -> Self {
        Self::new(value, QuantityUnit::Gi)
    }

    /// Parse any quantity the Kubernetes API accepts, e.g. `80Gi`, `1.5Gi`,
    /// `500m` or `1e3`. The text is kept exactly as given.
    pub fn parse(s: &str) -> Result<Self> {
        parse_parts(s)
            .map(|_| Self {
                text: s.to_string(),
            })
            .ok_or_else(|| Error::invalid_argument(format!("invalid quantity '{}'", s)))
    }

    /// The quantity as written
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Amount in base units (bytes for memory).
    ///
    /// `None` when the amount is not a whole number of base units (`500m`,
    /// `1.5`) or does not fit in an `i128`.
    pub fn to_base(&self) -> Option<i128> {
        let parts = parse_parts(&self.text)?;

        let mut mantissa: i128 = 0;
        for b in parts.int_digits.bytes().chain(parts.frac_digits.bytes()) {
            mantissa = mantissa.checked_mul(10)?.checked_add(i128::from(b - b'0'))?;
        }
        let frac_len = i64::try_from(parts.frac_digits.len()).ok()?;

        let base = match parts.scale {
            Scale::Binary(shift) => {
                let scaled = mantissa.checked_mul(1i128.checked_shl(shift)?)?;
                divide_exact(scaled, frac_len)?
            }
            Scale::Decimal(exp) => {
                let exp = i64::from(exp) - frac_len;
                if mantissa == 0 {
                    0
                } else if exp >= 0 {
                    mantissa.checked_mul(10i128.checked_pow(u32::try_from(exp).ok()?)?)?
                } else {
                    divide_exact(mantissa, -exp)?
                }
            }
        };

        Some(if parts.negative { -base } else { base })
    }
}

/// `value / 10^digits`, only when the division leaves no remainder
fn divide_exact(value: i128, digits: i64) -> Option<i128> {
    if value == 0 {
        return Some(0);
    }
    let divisor = 10i128.checked_pow(u32::try_from(digits).ok()?)?;
    (value % divisor == 0).then(|| value / divisor)
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Quantity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Quantity::parse(&s).map_err(serde::de::Error::custom)
    }
}
