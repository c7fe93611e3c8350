use clap::{Arg, Command, arg};

pub const PREP_CMD: &str = "prep";
pub const DEFAULT_OUT: &str = "barcodes.augmented.tsv";

pub fn create_prep_cli() -> Command {
    Command::new(PREP_CMD)
        .author("Databio")
        .about("Augment a barcode design table with reverse complements for reuse by counting runs.")
        .arg(Arg::new("barcodes"))
        .arg(arg!(--output <output>))
        .arg(arg!(--delimiter <delimiter>).help("Field delimiter of the design table (tab, comma, or a single character)"))
        .arg(arg!(--"skip-rows" <rows>).help("Rows to discard before the header row"))
        .arg(arg!(--"target-col" <name>))
        .arg(arg!(--"barcode-col" <name>))
}
