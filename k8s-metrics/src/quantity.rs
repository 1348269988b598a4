use super::*;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QuantityParseError {
    #[error("empty quantity")]
    Empty,
    #[error("invalid quantity {0:?}")]
    Invalid(String),
    #[error("quantity {0:?} is out of range")]
    OutOfRange(String),
}

/// Numeric views of a Kubernetes [`resource::Quantity`].
///
/// Integer conversions round up, the same way `MilliValue()` and `Value()`
/// do in apimachinery.
pub trait QuantityExt {
    /// Value in thousandths, e.g. CPU in millicores
    fn to_millis(&self) -> Result<i64, QuantityParseError>;

    /// Value in whole units, e.g. memory in bytes
    fn to_memory(&self) -> Result<i64, QuantityParseError>;
}

impl QuantityExt for resource::Quantity {
    fn to_millis(&self) -> Result<i64, QuantityParseError> {
        Parsed::parse(&self.0)?
            .scaled(3)
            .ok_or_else(|| QuantityParseError::OutOfRange(self.0.clone()))
    }

    fn to_memory(&self) -> Result<i64, QuantityParseError> {
        Parsed::parse(&self.0)?
            .scaled(0)
            .ok_or_else(|| QuantityParseError::OutOfRange(self.0.clone()))
    }
}

/// `±mantissa × 10^exp10 × 2^exp2`
#[derive(Debug, PartialEq, Eq)]
struct Parsed {
    negative: bool,
    mantissa: i128,
    exp10: i32,
    exp2: u32,
}

impl Parsed {
    fn parse(text: &str) -> Result<Self, QuantityParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QuantityParseError::Empty);
        }
        let invalid = || QuantityParseError::Invalid(text.to_string());

        let (negative, unsigned) = match text.as_bytes()[0] {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let number_len = unsigned
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(unsigned.len());
        let (number, suffix) = unsigned.split_at(number_len);

        let mut mantissa = 0_i128;
        let mut exp10 = 0_i32;
        let mut digits = 0;
        let mut fraction = false;
        for c in number.chars() {
            if c == '.' {
                if fraction {
                    return Err(invalid());
                }
                fraction = true;
                continue;
            }
            let digit = i128::from(c.to_digit(10).ok_or_else(invalid)?);
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(digit))
                .ok_or_else(|| QuantityParseError::OutOfRange(text.to_string()))?;
            if fraction {
                exp10 -= 1;
            }
            digits += 1;
        }
        if digits == 0 {
            return Err(invalid());
        }

        let (suffix10, exp2) = suffix_exponents(suffix).ok_or_else(invalid)?;
        exp10 += suffix10;

        Ok(Self {
            negative,
            mantissa,
            exp10,
            exp2,
        })
    }

    /// `ceil(value × 10^scale)`, `None` when it does not fit an `i64`.
    fn scaled(&self, scale: i32) -> Option<i64> {
        let magnitude = self.mantissa.checked_mul(1_i128.checked_shl(self.exp2)?)?;
        let exp = self.exp10 + scale;

        let value = if exp >= 0 {
            let factor = 10_i128.checked_pow(u32::try_from(exp).ok()?)?;
            let value = magnitude.checked_mul(factor)?;
            if self.negative {
                -value
            } else {
                value
            }
        } else {
            match 10_i128.checked_pow(exp.unsigned_abs()) {
                Some(divisor) if self.negative => -(magnitude / divisor),
                Some(divisor) => (magnitude + divisor - 1) / divisor,
                // Smaller than any representable fraction
                None => i128::from(!self.negative && magnitude > 0),
            }
        };

        i64::try_from(value).ok()
    }
}

fn suffix_exponents(suffix: &str) -> Option<(i32, u32)> {
    let exponents = match suffix {
        "" => (0, 0),
        "n" => (-9, 0),
        "u" => (-6, 0),
        "m" => (-3, 0),
        "k" => (3, 0),
        "M" => (6, 0),
        "G" => (9, 0),
        "T" => (12, 0),
        "P" => (15, 0),
        "E" => (18, 0),
        "Ki" => (0, 10),
        "Mi" => (0, 20),
        "Gi" => (0, 30),
        "Ti" => (0, 40),
        "Pi" => (0, 50),
        "Ei" => (0, 60),
        exponent => {
            let exponent = exponent
                .strip_prefix('e')
                .or_else(|| exponent.strip_prefix('E'))?;
            (exponent.parse().ok()?, 0)
        }
    };
    Some(exponents)
}
