//! Summary command - GSTR-3B totals and net position for a sales and purchase register

use super::{format_inr, format_plain, load_register};
use crate::fields::{Field, FieldMap};
use crate::mapping::{self, ColumnChoice, MappingFile, Overrides};
use crate::prompt;
use crate::resolve::{self, MappingError, Resolution, Side};
use crate::summary::{aggregate, NetPosition, Summary, SupplyTotals};
use crate::table::{Delimiter, Table};
use anyhow::Context;
use clap::Args;
use gstr3b_derive::ReportColumns;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table as TextTable, Tabled,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    /// Sales register (outward supplies), comma, semicolon or tab separated
    #[arg(short, long)]
    sales: PathBuf,

    /// Purchase register (inward supplies)
    #[arg(short, long)]
    purchases: PathBuf,

    /// JSON file with column overrides (see `schema mapping`)
    #[arg(short, long)]
    mapping: Option<PathBuf>,

    /// Use this separator instead of trying comma, semicolon and tab in turn
    #[arg(short, long, value_enum)]
    delimiter: Option<Delimiter>,

    /// Prompt for columns that could not be detected
    #[arg(short, long)]
    interactive: bool,

    #[command(flatten)]
    columns: ColumnArgs,

    /// Output as JSON instead of formatted text
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as a single CSV row
    #[arg(long)]
    csv: bool,
}

/// Per-field column overrides; each takes a column name or `none`
#[derive(Args, Debug, Default)]
pub struct ColumnArgs {
    /// Sales taxable value column
    #[arg(long, value_name = "COLUMN")]
    sales_taxable_value: Option<ColumnChoice>,
    /// Sales CGST column
    #[arg(long, value_name = "COLUMN")]
    sales_cgst: Option<ColumnChoice>,
    /// Sales SGST column
    #[arg(long, value_name = "COLUMN")]
    sales_sgst: Option<ColumnChoice>,
    /// Sales IGST column
    #[arg(long, value_name = "COLUMN")]
    sales_igst: Option<ColumnChoice>,
    /// Purchases taxable value column
    #[arg(long, value_name = "COLUMN")]
    purchases_taxable_value: Option<ColumnChoice>,
    /// Purchases CGST column
    #[arg(long, value_name = "COLUMN")]
    purchases_cgst: Option<ColumnChoice>,
    /// Purchases SGST column
    #[arg(long, value_name = "COLUMN")]
    purchases_sgst: Option<ColumnChoice>,
    /// Purchases IGST column
    #[arg(long, value_name = "COLUMN")]
    purchases_igst: Option<ColumnChoice>,
}

impl ColumnArgs {
    fn overrides(&self, side: Side) -> Overrides {
        match side {
            Side::Sales => FieldMap {
                taxable_value: self.sales_taxable_value.clone(),
                cgst: self.sales_cgst.clone(),
                sgst: self.sales_sgst.clone(),
                igst: self.sales_igst.clone(),
            },
            Side::Purchases => FieldMap {
                taxable_value: self.purchases_taxable_value.clone(),
                cgst: self.purchases_cgst.clone(),
                sgst: self.purchases_sgst.clone(),
                igst: self.purchases_igst.clone(),
            },
        }
    }
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let sales = load_register(&self.sales, Side::Sales, self.delimiter)?.table;
        let purchases = load_register(&self.purchases, Side::Purchases, self.delimiter)?.table;

        let mapping = match &self.mapping {
            Some(path) => MappingFile::load(path)?,
            None => MappingFile::default(),
        };
        let sales_overrides = mapping::merge(
            &Overrides::from(&mapping.sales),
            &self.columns.overrides(Side::Sales),
        );
        let purchase_overrides = mapping::merge(
            &Overrides::from(&mapping.purchases),
            &self.columns.overrides(Side::Purchases),
        );

        let sales_map = self.map_columns(&sales, Side::Sales, &sales_overrides)?;
        let purchase_map = self.map_columns(&purchases, Side::Purchases, &purchase_overrides)?;

        let summary = aggregate(
            &sales,
            &resolve::column_refs(Side::Sales, &sales, &sales_map),
            &purchases,
            &resolve::column_refs(Side::Purchases, &purchases, &purchase_map),
        );
        for (label, amount) in summary.entries() {
            log::debug!("{label}: {amount}");
        }

        let mappings = ColumnMappings {
            sales: (&sales, &sales_map),
            purchases: (&purchases, &purchase_map),
        };
        if self.json {
            print_json(&summary, &mappings)
        } else if self.csv {
            write_csv(&summary, io::stdout())
        } else {
            print_summary(&summary, &mappings);
            Ok(())
        }
    }

    fn map_columns(
        &self,
        table: &Table,
        side: Side,
        overrides: &Overrides,
    ) -> anyhow::Result<FieldMap<Resolution>> {
        let mut resolutions = resolve::resolve_table(table, side, overrides)?;
        let pending = resolve::selection_needed(&resolutions, overrides);
        if pending.is_empty() {
            return Ok(resolutions);
        }

        let available: Vec<&str> = table.column_names().collect();
        if !self.interactive {
            return Err(MappingError::SelectionRequired {
                side,
                available: available.iter().map(|s| s.to_string()).collect(),
            }
            .into());
        }

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stderr();
        for field in pending {
            let choice = select(&mut input, &mut output, side, field, &available)?;
            *resolutions.get_mut(field) = resolve::apply_choice(table, side, field, &choice)?;
        }
        Ok(resolutions)
    }
}

fn select<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    side: Side,
    field: Field,
    available: &[&str],
) -> anyhow::Result<ColumnChoice> {
    prompt::select_column(input, output, side, field, available)
        .with_context(|| format!("selecting {side} {field} column"))
}

struct ColumnMappings<'a> {
    sales: (&'a Table, &'a FieldMap<Resolution>),
    purchases: (&'a Table, &'a FieldMap<Resolution>),
}

#[derive(Tabled)]
struct MappingRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Sales column")]
    sales: String,
    #[tabled(rename = "Purchases column")]
    purchases: String,
}

#[derive(Tabled)]
struct TotalsRow {
    #[tabled(rename = "")]
    field: &'static str,
    #[tabled(rename = "Outward supplies")]
    outward: String,
    #[tabled(rename = "Inward supplies")]
    inward: String,
}

fn print_summary(summary: &Summary, mappings: &ColumnMappings) {
    let (sales, sales_map) = mappings.sales;
    let (purchases, purchase_map) = mappings.purchases;

    let mapping_rows: Vec<MappingRow> = Field::ALL
        .into_iter()
        .map(|field| MappingRow {
            field: field.label(),
            sales: sales_map.get(field).describe(sales),
            purchases: purchase_map.get(field).describe(purchases),
        })
        .collect();

    println!();
    println!("COLUMN MAPPING");
    let mapping = TextTable::new(mapping_rows).with(Style::rounded()).to_string();
    println!("{}", mapping);
    println!();

    let totals_rows: Vec<TotalsRow> = Field::ALL
        .into_iter()
        .map(|field| TotalsRow {
            field: field.label(),
            outward: format_inr(summary.outward.get(field)),
            inward: format_inr(summary.inward.get(field)),
        })
        .collect();

    println!("GSTR-3B SUMMARY");
    let totals = TextTable::new(totals_rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", totals);
    println!();

    println!("FINAL CALCULATION");
    println!("  Total GST Payable:  {:>16}", format_inr(summary.payable));
    println!("  Input Tax Credit:   {:>16}", format_inr(summary.credit));
    match summary.position() {
        NetPosition::Liability(amount) => {
            println!("  Net GST Liability:  {:>16}", format_inr(amount))
        }
        NetPosition::Refund(amount) => {
            println!("  GST Refund Due:     {:>16}", format_inr(amount))
        }
        NetPosition::Nil => println!("  No GST Payable:     {:>16}", format_inr(summary.net)),
    }
    println!();
}

/// Summary data for JSON output
#[derive(Debug, Serialize)]
struct SummaryData {
    columns: MappingData,
    outward: TotalsData,
    inward: TotalsData,
    gst_payable: String,
    input_tax_credit: String,
    net_gst: String,
    position: &'static str,
}

#[derive(Debug, Serialize)]
struct MappingData {
    sales: FieldColumns,
    purchases: FieldColumns,
}

#[derive(Debug, Serialize)]
struct FieldColumns {
    taxable_value: Option<String>,
    cgst: Option<String>,
    sgst: Option<String>,
    igst: Option<String>,
}

impl FieldColumns {
    fn new(table: &Table, resolutions: &FieldMap<Resolution>) -> Self {
        let name = |field: Field| {
            resolutions
                .get(field)
                .column()
                .and_then(|c| table.column_name(c))
                .map(str::to_string)
        };
        FieldColumns {
            taxable_value: name(Field::TaxableValue),
            cgst: name(Field::Cgst),
            sgst: name(Field::Sgst),
            igst: name(Field::Igst),
        }
    }
}

#[derive(Debug, Serialize)]
struct TotalsData {
    taxable_value: String,
    cgst: String,
    sgst: String,
    igst: String,
}

impl From<&SupplyTotals> for TotalsData {
    fn from(totals: &SupplyTotals) -> Self {
        TotalsData {
            taxable_value: format_plain(totals.taxable_value),
            cgst: format_plain(totals.cgst),
            sgst: format_plain(totals.sgst),
            igst: format_plain(totals.igst),
        }
    }
}

fn position_name(position: NetPosition) -> &'static str {
    match position {
        NetPosition::Liability(_) => "liability",
        NetPosition::Refund(_) => "refund",
        NetPosition::Nil => "nil",
    }
}

fn print_json(summary: &Summary, mappings: &ColumnMappings) -> anyhow::Result<()> {
    let (sales, sales_map) = mappings.sales;
    let (purchases, purchase_map) = mappings.purchases;

    let data = SummaryData {
        columns: MappingData {
            sales: FieldColumns::new(sales, sales_map),
            purchases: FieldColumns::new(purchases, purchase_map),
        },
        outward: (&summary.outward).into(),
        inward: (&summary.inward).into(),
        gst_payable: format_plain(summary.payable),
        input_tax_credit: format_plain(summary.credit),
        net_gst: format_plain(summary.net),
        position: position_name(summary.position()),
    };

    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

/// Column of the CSV summary output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportColumn {
    pub name: &'static str,
    pub description: &'static str,
}

/// One-row CSV rendering of a summary
#[derive(Debug, Serialize, ReportColumns)]
pub struct SummaryRecord {
    /// Taxable value of outward supplies
    pub outward_taxable_value: String,
    /// CGST collected on outward supplies
    pub outward_cgst: String,
    /// SGST collected on outward supplies
    pub outward_sgst: String,
    /// IGST collected on outward supplies
    pub outward_igst: String,
    /// Taxable value of inward supplies
    pub inward_taxable_value: String,
    /// CGST paid on inward supplies
    pub inward_cgst: String,
    /// SGST paid on inward supplies
    pub inward_sgst: String,
    /// IGST paid on inward supplies
    pub inward_igst: String,
    /// Outward CGST + SGST + IGST
    #[serde(rename = "gst_payable")]
    pub payable: String,
    /// Inward CGST + SGST + IGST
    #[serde(rename = "input_tax_credit")]
    pub credit: String,
    /// Payable minus credit; negative means a refund is due
    #[serde(rename = "net_gst")]
    pub net: String,
}

impl From<&Summary> for SummaryRecord {
    fn from(summary: &Summary) -> Self {
        SummaryRecord {
            outward_taxable_value: format_plain(summary.outward.taxable_value),
            outward_cgst: format_plain(summary.outward.cgst),
            outward_sgst: format_plain(summary.outward.sgst),
            outward_igst: format_plain(summary.outward.igst),
            inward_taxable_value: format_plain(summary.inward.taxable_value),
            inward_cgst: format_plain(summary.inward.cgst),
            inward_sgst: format_plain(summary.inward.sgst),
            inward_igst: format_plain(summary.inward.igst),
            payable: format_plain(summary.payable),
            credit: format_plain(summary.credit),
            net: format_plain(summary.net),
        }
    }
}

pub fn write_csv<W: Write>(summary: &Summary, writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.serialize(SummaryRecord::from(summary))?;
    wtr.flush()?;
    Ok(())
}
