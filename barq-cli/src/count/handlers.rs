use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;

use barq_counting::consts;
use barq_counting::{
    MalformedReadPolicy, MatchEngineKind, ReadFileDiscovery, SampleLabeler,
    barcode_counting_from_reads,
};
use barq_index::{BarcodeIndex, BarcodeLibrary};

pub fn run_count(matches: &ArgMatches) -> Result<()> {
    // get arguments from CLI
    let reads: Vec<PathBuf> = matches
        .get_many::<String>("reads")
        .expect("At least one read file directory is required.")
        .map(PathBuf::from)
        .collect();

    let barcodes = matches
        .get_one::<String>("barcodes")
        .expect("A path to an augmented barcode table is required.");

    let default_out = consts::DEFAULT_OUT.to_string();
    let output = matches.get_one::<String>("output").unwrap_or(&default_out);

    let default_extension = consts::DEFAULT_READ_EXTENSION.to_string();
    let extension = matches
        .get_one::<String>("extension")
        .unwrap_or(&default_extension);

    let engine_kind = match matches.get_one::<String>("engine") {
        Some(engine) => {
            let supplied_kind = MatchEngineKind::from_str(engine);
            match supplied_kind {
                Ok(kind) => kind,
                Err(_err) => anyhow::bail!("Unknown match engine supplied: {}", engine),
            }
        }
        None => consts::DEFAULT_ENGINE,
    };

    let labeler = match (
        matches.get_one::<String>("label-pattern"),
        matches.get_one::<String>("strip-suffix"),
    ) {
        (Some(pattern), _) => SampleLabeler::from_pattern(pattern)?,
        (None, Some(n)) => SampleLabeler::StripSuffix(
            n.parse()
                .with_context(|| format!("Invalid strip-suffix value: {}", n))?,
        ),
        (None, None) => SampleLabeler::default(),
    };

    let policy = if matches.get_flag("skip-malformed") {
        MalformedReadPolicy::Skip
    } else {
        MalformedReadPolicy::Abort
    };

    // build the reference before touching any read file; reference errors
    // are fatal up front
    let library = BarcodeLibrary::from_augmented_file(Path::new(barcodes))?;
    let index = BarcodeIndex::from_library(&library)?;
    let engine = engine_kind.build(&index)?;

    let files = ReadFileDiscovery::new(&reads, extension)?;

    let count_mat = barcode_counting_from_reads(files, &index, engine.as_ref(), &labeler, policy)?;

    count_mat.write_to_file(Path::new(output))?;

    Ok(())
}
