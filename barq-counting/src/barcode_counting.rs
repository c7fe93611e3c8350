use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use barq_index::BarcodeIndex;

use crate::classify::{MalformedReadPolicy, ReadClassifier};
use crate::counts::{CountMatrix, SampleCounts};
use crate::files::{ReadFileDiscovery, SampleLabeler};
use crate::match_engine::MatchEngine;

///
/// Classify and tally every discovered read file, then assemble the
/// samples x targets count matrix.
///
/// Files are processed to completion one at a time, in discovery order; the
/// index and engine are shared read-only across files. Under
/// [`MalformedReadPolicy::Abort`] a bad record fails the run before any
/// matrix is assembled; under [`MalformedReadPolicy::Skip`] the rest of the
/// offending file is dropped and the failure is tallied and reported.
///
pub fn barcode_counting_from_reads(
    files: ReadFileDiscovery,
    index: &BarcodeIndex,
    engine: &dyn MatchEngine,
    labeler: &SampleLabeler,
    policy: MalformedReadPolicy,
) -> Result<CountMatrix> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg} ({per_sec})")
            .unwrap()
            .tick_strings(&["-", "\\", "|", "/"]),
    );

    spinner.set_message("Processing read files...");

    let mut samples: Vec<(String, SampleCounts)> = Vec::new();
    let mut processed_reads: u64 = 0;
    let mut truncated_files: u64 = 0;

    for file in files {
        let label = labeler.label_for(&file)?;
        let classifier = ReadClassifier::from_file(&file, index, engine)?;

        let mut counts = SampleCounts::default();
        for assignment in classifier {
            match assignment {
                Ok(assignment) => {
                    if let Some(target) = assignment.target {
                        counts.add(&target);
                    }
                }
                Err(e) => match policy {
                    MalformedReadPolicy::Abort => return Err(e),
                    MalformedReadPolicy::Skip => {
                        // the parser cannot resync past a bad record, so the
                        // rest of this file is dropped
                        truncated_files += 1;
                        eprintln!("Warning: skipping rest of {:?}: {:#}", file, e);
                        break;
                    }
                },
            }

            processed_reads += 1;
            if processed_reads % 10_000 == 0 {
                spinner.set_message(format!("Processed {} reads", processed_reads));
            }
            spinner.inc(1);
        }

        samples.push((label, counts));
    }

    spinner.finish_with_message("Done!");

    if truncated_files > 0 {
        eprintln!(
            "Warning: {} file(s) had malformed records and were truncated",
            truncated_files
        );
    }

    let matrix = CountMatrix::assemble(&samples)?;

    Ok(matrix)
}
