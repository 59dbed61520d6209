use clap::{Parser, Subcommand};
use hkdtax::cmd;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hkdtax", version, about = "Tax ledger and declarations for household businesses")]
struct Cli {
    /// State file holding the business profile, ledger and declarations
    #[arg(long, global = true, env = "HKDTAX_STATE", default_value = "hkdtax.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a state file for a household business
    Init(cmd::init::InitCommand),
    /// List business sectors and their tax rates
    Sectors(cmd::sectors::SectorsCommand),
    /// Calculate VAT and PIT on an amount or a year of ledger revenue
    Calc(cmd::calc::CalcCommand),
    /// Add, edit, list and import ledger transactions
    Ledger(cmd::ledger::LedgerCommand),
    /// Monthly, quarterly or annual totals from the ledger
    Summary(cmd::summary::SummaryCommand),
    /// Tax declaration schedule and filing
    Declarations(cmd::declarations::DeclarationsCommand),
    /// Record invoices and reconcile them against the ledger
    Invoices(cmd::invoices::InvoicesCommand),
    /// Business profile, current year position and upcoming deadlines
    Status(cmd::status::StatusCommand),
    /// Print the state file JSON schema or the ledger CSV columns
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let state = cli.state.as_path();
    match &cli.command {
        Command::Init(init) => init.exec(state),
        Command::Sectors(sectors) => sectors.exec(),
        Command::Calc(calc) => calc.exec(state),
        Command::Ledger(ledger) => ledger.exec(state),
        Command::Summary(summary) => summary.exec(state),
        Command::Declarations(declarations) => declarations.exec(state),
        Command::Invoices(invoices) => invoices.exec(state),
        Command::Status(status) => status.exec(state),
        Command::Schema(schema) => schema.exec(),
    }
}
