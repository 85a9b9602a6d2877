use clap::{Parser, Subcommand};
use folio_i18n_cli::commands::{CheckArgs, GetArgs, run_check, run_get};
use miette::Result as MietteResult;

#[derive(Parser)]
#[command(name = "folio-i18n")]
#[command(about = "Check and query folio-i18n message bundles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that every locale bundle has the same keys as the default locale
    Check(CheckArgs),

    /// Print the text (or list) stored under a key
    Get(GetArgs),
}

fn main() -> MietteResult<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();

    folio_i18n_cli::ui::init_logging();

    let result = match cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Get(args) => run_get(args),
    };

    result.map_err(miette::Report::new)
}
