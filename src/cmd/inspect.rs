//! Inspect command - preview a register and show which columns would be detected

use super::load_register;
use crate::fields::Field;
use crate::resolve::{resolve, Side};
use crate::table::{Delimiter, Table};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

#[derive(Args, Debug)]
pub struct InspectCommand {
    /// Register file to preview
    #[arg(short, long)]
    file: PathBuf,

    /// Which register the file is
    #[arg(short, long, value_enum, default_value_t = SideArg::Sales)]
    side: SideArg,

    /// Number of rows to preview
    #[arg(short, long, default_value_t = 5)]
    rows: usize,

    /// Use this separator instead of trying comma, semicolon and tab in turn
    #[arg(short, long, value_enum)]
    delimiter: Option<Delimiter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    Sales,
    Purchases,
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::Sales => Side::Sales,
            SideArg::Purchases => Side::Purchases,
        }
    }
}

impl InspectCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let side: Side = self.side.into();
        let loaded = load_register(&self.file, side, self.delimiter)?;
        let table = &loaded.table;

        println!();
        println!(
            "{} ({}, {}-separated, {} rows)",
            self.file.display(),
            side,
            loaded.delimiter,
            table.row_count()
        );
        println!();

        println!("COLUMNS");
        for (i, name) in table.column_names().enumerate() {
            println!("  {}. {}", i + 1, name);
        }
        println!();

        if table.row_count() > 0 && self.rows > 0 {
            println!("FIRST {} ROWS", self.rows.min(table.row_count()));
            println!("{}", preview(table, self.rows));
            println!();
        }

        println!("DETECTED COLUMNS");
        for field in Field::ALL {
            let column = resolve(table.column_names(), field.aliases())
                .and_then(|c| table.column_name(c));
            println!("  {:14} {}", field.label(), column.unwrap_or("Not found"));
        }
        println!();
        Ok(())
    }
}

fn preview(table: &Table, rows: usize) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.column_names().map(str::to_string));
    for row in table.head(rows) {
        builder.push_record(row.into_iter().map(str::to_string));
    }
    let mut preview = builder.build();
    preview.with(Style::rounded());
    preview.to_string()
}
