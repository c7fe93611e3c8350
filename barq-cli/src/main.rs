mod count;
mod prep;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "barq";
    pub const BIN_NAME: &str = "barq";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Count barcode-tagged sequencing reads per gene across pooled-library screen samples.")
        .subcommand_required(true)
        .subcommand(prep::cli::create_prep_cli())
        .subcommand(count::cli::create_count_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // LIBRARY PREP
        //
        Some((prep::cli::PREP_CMD, matches)) => {
            prep::handlers::run_prep(matches)?;
        }

        //
        // COUNTING
        //
        Some((count::cli::COUNT_CMD, matches)) => {
            count::handlers::run_count(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
