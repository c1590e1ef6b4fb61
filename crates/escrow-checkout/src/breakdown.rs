//! Fee Breakdown
//!
//! The buyer types a base amount; the platform fee is added on top:
//!
//! ```text
//! amount  $100.00
//! fee       $5.00   (5% platform fee)
//! total   $105.00
//! ```

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Amount, fee and total for the current input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Breakdown {
    pub amount: Decimal,
    pub fee: Decimal,
    pub total: Decimal,
}

impl Breakdown {
    /// Fee is rounded to cents before it is added to the total.
    ///
    /// Arithmetic overflow yields the zero breakdown, which is not payable.
    pub fn compute(amount: Decimal, fee_percent: Decimal) -> Self {
        let fee = amount
            .checked_mul(fee_percent)
            .and_then(|v| v.checked_div(ONE_HUNDRED))
            .map(round_cents);

        match fee.and_then(|fee| amount.checked_add(fee).map(|total| (fee, total))) {
            Some((fee, total)) => Self { amount, fee, total },
            None => Self::default(),
        }
    }

    /// Parse raw field text and compute
    pub fn from_input(raw: &str, fee_percent: Decimal) -> Self {
        Self::compute(parse_amount(raw), fee_percent)
    }

    /// Only positive amounts can be submitted
    pub fn is_payable(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn amount_display(&self) -> String {
        format_usd(self.amount)
    }

    pub fn fee_display(&self) -> String {
        format_usd(self.fee)
    }

    pub fn total_display(&self) -> String {
        format_usd(self.total)
    }
}

/// `$1234.50`
pub fn format_usd(value: Decimal) -> String {
    format!("${:.2}", round_cents(value))
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Reads a number the way a browser's `parseFloat` does.
///
/// Leading whitespace is skipped and the longest numeric prefix is taken, so
/// `"12abc"` is 12 and `"1e2"` is 100. Anything without a numeric prefix is 0.
///
/// Unlike `parseFloat`, values `Decimal` cannot hold are 0: too large to fit,
/// or positive but smaller than its 28 fractional digits (`"1e-30"`). Both
/// end up not payable.
pub fn parse_amount(raw: &str) -> Decimal {
    let Some((mantissa, exponent)) = numeric_prefix(raw.trim_start()) else {
        return Decimal::ZERO;
    };

    let mantissa = normalize_mantissa(mantissa);
    let parsed = match exponent {
        Some(exp) => Decimal::from_scientific(&format!("{mantissa}e{exp}")),
        None => Decimal::from_str(&mantissa),
    };

    parsed.unwrap_or(Decimal::ZERO)
}

/// Splits the numeric prefix into mantissa and optional exponent digits
fn numeric_prefix(s: &str) -> Option<(&str, Option<&str>)> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    let mantissa = &s[..end];

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_start = end + 1;
        let mut exp_end = exp_start;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let digit_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > digit_start {
            return Some((mantissa, Some(&s[exp_start..exp_end])));
        }
    }

    Some((mantissa, None))
}

/// `+.5` → `0.5`, `5.` → `5`
fn normalize_mantissa(mantissa: &str) -> String {
    let (sign, digits) = match mantissa.as_bytes().first() {
        Some(b'-') => ("-", &mantissa[1..]),
        Some(b'+') => ("", &mantissa[1..]),
        _ => ("", mantissa),
    };
    let digits = digits.strip_suffix('.').unwrap_or(digits);

    if digits.starts_with('.') {
        format!("{sign}0{digits}")
    } else {
        format!("{sign}{digits}")
    }
}
