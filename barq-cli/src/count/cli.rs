use clap::{Arg, ArgAction, Command, arg};

pub const COUNT_CMD: &str = "count";

pub fn create_count_cli() -> Command {
    Command::new(COUNT_CMD)
        .author("Databio")
        .about("Assign reads to targets by barcode containment and assemble a samples x targets count matrix.")
        .arg(
            Arg::new("reads")
                .action(ArgAction::Append)
                .required(true)
                .help("One or more directories of read files; row order follows this order"),
        )
        .arg(arg!(--barcodes <barcodes>).required(true).help("Augmented barcode table from `barq prep`"))
        .arg(arg!(--output <output>))
        .arg(arg!(--extension <extension>).help("Read file extension filter"))
        .arg(arg!(--engine <engine>).help("Match engine: naive or automaton"))
        .arg(arg!(--"strip-suffix" <n>).help("Trailing characters to drop from the file stem for the sample label"))
        .arg(arg!(--"label-pattern" <pattern>).help("Regex whose first capture group is the sample label"))
        .arg(
            arg!(--"skip-malformed")
                .help("Truncate files at malformed records instead of aborting the run")
                .action(ArgAction::SetTrue),
        )
}
