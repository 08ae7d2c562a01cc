pub mod inspect;
pub mod schema;
pub mod summary;

use crate::resolve::Side;
use crate::table::{self, Delimiter, LoadedTable};
use anyhow::Context;
use rust_decimal::{Decimal, RoundingStrategy};
use std::path::Path;

/// Load a register file, naming the side in any error
pub fn load_register(
    path: &Path,
    side: Side,
    delimiter: Option<Delimiter>,
) -> anyhow::Result<LoadedTable> {
    table::load(path, delimiter)
        .with_context(|| format!("loading {side} file {}", path.display()))
}

/// Round half away from zero to two places; for display only
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format as rupees with thousands separators, e.g. `₹1,234.50`
pub fn format_inr(amount: Decimal) -> String {
    let rounded = round_for_display(amount);
    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}₹{grouped}.{fraction}")
}

/// Two decimal places without currency symbol, for machine-readable output
pub fn format_plain(amount: Decimal) -> String {
    format!("{:.2}", round_for_display(amount))
}
