use clap::{Parser, Subcommand};

mod cmd;
mod fields;
mod mapping;
mod prompt;
mod resolve;
mod summary;
mod table;

#[derive(Debug, Parser)]
#[command(name = "gstr3b", version, about = "GSTR-3B summary from sales and purchase registers")]
struct Opts {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate outward/inward totals and the net GST position
    Summary(cmd::summary::SummaryCommand),
    /// Preview a register file and the columns detected in it
    Inspect(cmd::inspect::InspectCommand),
    /// Print the mapping file schema, CSV output format or header aliases
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    match opts.cmd {
        Command::Summary(summary) => summary.exec(),
        Command::Inspect(inspect) => inspect.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
