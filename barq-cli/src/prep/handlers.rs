use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use barq_index::{BarcodeLibrary, TableSpec};

use super::cli::DEFAULT_OUT;

pub fn run_prep(matches: &ArgMatches) -> Result<()> {
    // get arguments from CLI
    let barcodes = matches
        .get_one::<String>("barcodes")
        .expect("A path to a barcode design table is required.");

    let default_out = DEFAULT_OUT.to_string();
    let output = matches.get_one::<String>("output").unwrap_or(&default_out);

    // coerce arguments to types
    let mut spec = TableSpec::default();

    if let Some(delimiter) = matches.get_one::<String>("delimiter") {
        spec.delimiter = match delimiter.as_str() {
            "tab" | "\\t" => b'\t',
            "comma" => b',',
            s if s.len() == 1 => s.as_bytes()[0],
            s => anyhow::bail!("Delimiter must be a single character: {}", s),
        };
    }

    if let Some(rows) = matches.get_one::<String>("skip-rows") {
        spec.skip_rows = rows
            .parse()
            .with_context(|| format!("Invalid skip-rows value: {}", rows))?;
    }

    if let Some(name) = matches.get_one::<String>("target-col") {
        spec.target_col = name.clone();
    }

    if let Some(name) = matches.get_one::<String>("barcode-col") {
        spec.barcode_col = name.clone();
    }

    let library = BarcodeLibrary::from_file(Path::new(barcodes), &spec)?;
    library.write_augmented(Path::new(output))?;

    println!(
        "Wrote {} augmented barcode records to: {}",
        library.len(),
        output
    );

    Ok(())
}
