use crate::fields::{Field, FieldMap};
use crate::table::{ColumnRef, Table};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a cell as a decimal number, trimming surrounding whitespace.
///
/// Accepts plain (`-12.50`, `+4`, `.5`) and scientific (`1e3`) notation.
/// Digit separators and values outside the `Decimal` range are rejected.
pub fn parse_number(cell: &str) -> Option<Decimal> {
    let cell = cell.trim();
    if cell.is_empty() || !cell.bytes().all(is_number_byte) {
        return None;
    }
    Decimal::from_str(cell)
        .ok()
        .or_else(|| Decimal::from_scientific(cell).ok())
}

fn is_number_byte(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E')
}

/// Sum a column, counting cells that are missing or not numeric as zero
pub fn column_total(table: &Table, column: Option<ColumnRef>) -> Decimal {
    let Some(column) = column.and_then(|c| table.column(c)) else {
        return Decimal::ZERO;
    };

    let mut skipped = 0usize;
    let total = column
        .cells
        .iter()
        .map(|cell| match cell.as_deref().and_then(parse_number) {
            Some(value) => value,
            None => {
                skipped += 1;
                Decimal::ZERO
            }
        })
        .fold(Decimal::ZERO, |acc, value| acc.saturating_add(value));

    if skipped > 0 {
        log::warn!(
            "column '{}': {} of {} cells are not numeric and count as zero",
            column.name,
            skipped,
            column.cells.len()
        );
    }
    total
}

/// Totals for one side of the return (outward or inward supplies)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupplyTotals {
    pub taxable_value: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
}

impl SupplyTotals {
    pub fn from_table(table: &Table, columns: &FieldMap<Option<ColumnRef>>) -> Self {
        SupplyTotals {
            taxable_value: column_total(table, columns.taxable_value),
            cgst: column_total(table, columns.cgst),
            sgst: column_total(table, columns.sgst),
            igst: column_total(table, columns.igst),
        }
    }

    pub fn get(&self, field: Field) -> Decimal {
        match field {
            Field::TaxableValue => self.taxable_value,
            Field::Cgst => self.cgst,
            Field::Sgst => self.sgst,
            Field::Igst => self.igst,
        }
    }

    /// CGST + SGST + IGST
    pub fn total_tax(&self) -> Decimal {
        self.cgst
            .saturating_add(self.sgst)
            .saturating_add(self.igst)
    }
}

/// Sign of the final position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetPosition {
    /// Tax owed
    Liability(Decimal),
    /// Credit exceeds tax collected; holds the absolute amount
    Refund(Decimal),
    Nil,
}

/// GSTR-3B summary of one sales and one purchase register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub outward: SupplyTotals,
    pub inward: SupplyTotals,
    /// Tax collected on outward supplies
    pub payable: Decimal,
    /// Input tax credit from inward supplies
    pub credit: Decimal,
    /// `payable - credit`
    pub net: Decimal,
}

impl Summary {
    pub fn new(outward: SupplyTotals, inward: SupplyTotals) -> Self {
        let payable = outward.total_tax();
        let credit = inward.total_tax();
        Summary {
            outward,
            inward,
            payable,
            credit,
            net: payable.saturating_sub(credit),
        }
    }

    pub fn position(&self) -> NetPosition {
        if self.net > Decimal::ZERO {
            NetPosition::Liability(self.net)
        } else if self.net < Decimal::ZERO {
            NetPosition::Refund(self.net.abs())
        } else {
            NetPosition::Nil
        }
    }

    /// The eight labelled totals, outward first
    pub fn entries(&self) -> Vec<(String, Decimal)> {
        let mut entries = Vec::with_capacity(8);
        for (side, totals) in [("Outward", &self.outward), ("Inward", &self.inward)] {
            for field in Field::ALL {
                entries.push((format!("{side} {}", field.label()), totals.get(field)));
            }
        }
        entries
    }
}

/// Sum both registers and derive payable, credit and net
pub fn aggregate(
    sales: &Table,
    sales_columns: &FieldMap<Option<ColumnRef>>,
    purchases: &Table,
    purchase_columns: &FieldMap<Option<ColumnRef>>,
) -> Summary {
    Summary::new(
        SupplyTotals::from_table(sales, sales_columns),
        SupplyTotals::from_table(purchases, purchase_columns),
    )
}
