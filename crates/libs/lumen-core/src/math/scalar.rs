use nalgebra::RealField;
use num_traits::Num;

/// Number of significant digits used when printing geometric values.
pub const DISPLAY_PRECISION: usize = 4;

/// Component type of the geometric primitives.
///
/// Anything stored inside a [`Vector`](crate::math::Vector),
/// [`Point`](crate::math::Point) or [`Normal`](crate::math::Normal) must be a
/// `nalgebra` scalar supporting the basic arithmetic operations, and must
/// know how to print itself with a limited number of significant digits.
pub trait Scalar: nalgebra::Scalar + Copy + Num + PartialOrd {
    /// Formats the value using at most `digits` significant digits.
    ///
    /// Integers are always printed verbatim.
    fn to_significant(&self, digits: usize) -> String;
}

/// Floating point scalar, required by everything that needs a square root or
/// a division that is not truncating (normalisation, transforms, frames).
pub trait Real: Scalar + RealField {}

impl<T: Scalar + RealField> Real for T {}

macro_rules! impl_scalar_int {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                fn to_significant(&self, _digits: usize) -> String { self.to_string() }
            }
        )*
    };
}

impl_scalar_int!(i32, i64, u32, u64);

impl Scalar for f32 {
    fn to_significant(&self, digits: usize) -> String { format_significant(*self as f64, digits) }
}

impl Scalar for f64 {
    fn to_significant(&self, digits: usize) -> String { format_significant(*self, digits) }
}

/// Formats a floating point number the way a C++ stream does with
/// `std::setprecision(digits)` and the default float field.
///
/// The value is rounded to `digits` significant digits; fixed notation is
/// used unless the decimal exponent is below -4 or not smaller than
/// `digits`, in which case scientific notation with a signed two-digit
/// exponent is used. Trailing zeros of the fraction are removed.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return String::from("nan");
    }
    if value.is_infinite() {
        return String::from(if value < 0.0 { "-inf" } else { "inf" });
    }
    if value == 0.0 {
        return String::from(if value.is_sign_negative() { "-0" } else { "0" });
    }

    let digits = digits.max(1);
    // Rounding happens here, so the exponent already accounts for carries
    // such as 9999.7 -> 1.000e4.
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// Removes trailing zeros of the fractional part, and the decimal point if
/// nothing is left after it.
fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significant_fixed() {
        assert_eq!(format_significant(1.0, 4), "1");
        assert_eq!(format_significant(2.5, 4), "2.5");
        assert_eq!(format_significant(1.0 / 3.0, 4), "0.3333");
        assert_eq!(format_significant(2.0 / 3.0, 4), "0.6667");
        assert_eq!(format_significant(-12.34567, 4), "-12.35");
        assert_eq!(format_significant(1234.7, 4), "1235");
        assert_eq!(format_significant(0.0001, 4), "0.0001");
    }

    #[test]
    fn significant_scientific() {
        assert_eq!(format_significant(123456.0, 4), "1.235e+05");
        assert_eq!(format_significant(0.00001234, 4), "1.234e-05");
        assert_eq!(format_significant(9999.7, 4), "1e+04");
        assert_eq!(format_significant(-2.0e10, 4), "-2e+10");
    }

    #[test]
    fn significant_special_values() {
        assert_eq!(format_significant(0.0, 4), "0");
        assert_eq!(format_significant(-0.0, 4), "-0");
        assert_eq!(format_significant(f64::NAN, 4), "nan");
        assert_eq!(format_significant(f64::INFINITY, 4), "inf");
        assert_eq!(format_significant(f64::NEG_INFINITY, 4), "-inf");
    }

    #[test]
    fn scalar_to_significant() {
        assert_eq!(1.1f32.to_significant(DISPLAY_PRECISION), "1.1");
        assert_eq!(3.14159265f64.to_significant(DISPLAY_PRECISION), "3.142");
        assert_eq!(123456i32.to_significant(DISPLAY_PRECISION), "123456");
        assert_eq!(7u64.to_significant(DISPLAY_PRECISION), "7");
    }
}
