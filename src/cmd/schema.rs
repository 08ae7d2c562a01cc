//! Schema command - print the mapping file schema and output formats

use super::summary::SummaryRecord;
use crate::fields::Field;
use crate::mapping::MappingFile;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// What to describe
    #[arg(value_enum, default_value = "mapping")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the --mapping file
    Mapping,
    /// CSV header row of `summary --csv`
    CsvHeader,
    /// CSV column descriptions of `summary --csv`
    CsvFields,
    /// Header spellings recognised for each field
    Aliases,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::Mapping => self.print_mapping_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
            SchemaFormat::Aliases => self.print_aliases(),
        }
    }

    fn print_mapping_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(MappingFile);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        let names: Vec<_> = SummaryRecord::report_columns()
            .iter()
            .map(|column| column.name)
            .collect();
        println!("{}", names.join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("CSV Output Format");
        println!("=================");
        println!();
        for column in SummaryRecord::report_columns() {
            println!("{:22}  {}", column.name, column.description);
        }
        println!();
        println!("Amounts are rounded to 2 decimal places; net_gst < 0 means a refund is due");
        Ok(())
    }

    fn print_aliases(&self) -> anyhow::Result<()> {
        println!("Header matching ignores case and surrounding whitespace; earlier spellings win.");
        println!();
        for field in Field::ALL {
            println!("{} ({})", field.label(), field.key());
            for alias in field.aliases() {
                println!("  {}", alias);
            }
        }
        Ok(())
    }
}
