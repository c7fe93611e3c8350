use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use pretty_assertions::assert_eq;
use rstest::*;

use barq_counting::{
    CountMatrix, MalformedReadPolicy, MatchEngineKind, ReadFileDiscovery, SampleLabeler,
    barcode_counting_from_reads,
};
use barq_index::{BarcodeIndex, BarcodeLibrary, TableSpec};

#[fixture]
fn path_to_barcode_table() -> &'static str {
    "tests/data/barcodes.tsv"
}

#[fixture]
fn path_to_read_dir() -> &'static str {
    "tests/data/reads"
}

fn build_index(path: &str) -> BarcodeIndex {
    let library = BarcodeLibrary::from_file(Path::new(path), &TableSpec::default()).unwrap();
    BarcodeIndex::from_library(&library).unwrap()
}

fn run_pipeline(
    read_dirs: &[&Path],
    index: &BarcodeIndex,
    kind: MatchEngineKind,
    extension: &str,
) -> CountMatrix {
    let files = ReadFileDiscovery::new(read_dirs, extension).unwrap();
    let engine = kind.build(index).unwrap();
    barcode_counting_from_reads(
        files,
        index,
        engine.as_ref(),
        &SampleLabeler::StripSuffix(3),
        MalformedReadPolicy::Abort,
    )
    .unwrap()
}

#[rstest]
#[case(MatchEngineKind::Naive)]
#[case(MatchEngineKind::Automaton)]
fn test_end_to_end_counts(
    path_to_barcode_table: &str,
    path_to_read_dir: &str,
    #[case] kind: MatchEngineKind,
) {
    let index = build_index(path_to_barcode_table);
    let matrix = run_pipeline(&[Path::new(path_to_read_dir)], &index, kind, ".fastq");

    // one row per file, suffix-stripped labels, the full target universe
    assert_eq!(matrix.rows(), 2);
    let mut row_labels = matrix.row_labels().to_vec();
    row_labels.sort();
    assert_eq!(row_labels, vec!["day0".to_string(), "day7".to_string()]);
    let mut col_labels = matrix.col_labels().to_vec();
    col_labels.sort();
    assert_eq!(col_labels, vec!["GeneA".to_string(), "GeneB".to_string()]);

    // day0 has one read per gene; day7 never sees GeneA and gets an
    // explicit zero
    assert_eq!(matrix.value("day0", "GeneA"), Some(1));
    assert_eq!(matrix.value("day0", "GeneB"), Some(1));
    assert_eq!(matrix.value("day7", "GeneA"), Some(0));
    assert_eq!(matrix.value("day7", "GeneB"), Some(1));
}

#[rstest]
fn test_engines_build_identical_matrices(
    path_to_barcode_table: &str,
    path_to_read_dir: &str,
) {
    let index = build_index(path_to_barcode_table);

    let naive = run_pipeline(
        &[Path::new(path_to_read_dir)],
        &index,
        MatchEngineKind::Naive,
        ".fastq",
    );
    let automaton = run_pipeline(
        &[Path::new(path_to_read_dir)],
        &index,
        MatchEngineKind::Automaton,
        ".fastq",
    );

    assert_eq!(naive, automaton);
}

#[rstest]
fn test_gzipped_read_files(path_to_barcode_table: &str, path_to_read_dir: &str) {
    let index = build_index(path_to_barcode_table);

    // gzip the plain fixtures into a temporary directory
    let dir = tempfile::tempdir().unwrap();
    for name in ["day0_S1", "day7_S1"] {
        let plain =
            std::fs::read(PathBuf::from(path_to_read_dir).join(format!("{name}.fastq"))).unwrap();
        let file = std::fs::File::create(dir.path().join(format!("{name}.fastq.gz"))).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(&plain).unwrap();
        encoder.finish().unwrap();
    }

    let matrix = run_pipeline(
        &[dir.path()],
        &index,
        MatchEngineKind::Automaton,
        ".fastq.gz",
    );

    assert_eq!(matrix.value("day0", "GeneA"), Some(1));
    assert_eq!(matrix.value("day7", "GeneB"), Some(1));
}

#[rstest]
fn test_matrix_round_trip_through_file(
    path_to_barcode_table: &str,
    path_to_read_dir: &str,
) {
    let index = build_index(path_to_barcode_table);
    let matrix = run_pipeline(
        &[Path::new(path_to_read_dir)],
        &index,
        MatchEngineKind::Automaton,
        ".fastq",
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counts.csv.gz");
    matrix.write_to_file(&path).unwrap();
    let reloaded = CountMatrix::from_file(&path).unwrap();

    assert_eq!(reloaded, matrix);
}

#[rstest]
fn test_malformed_file_aborts_by_default(path_to_barcode_table: &str) {
    let index = build_index(path_to_barcode_table);

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("broken_S1.fastq"),
        "@read1\nACGTACGTA\n+\nIIIIIIIII\n@read2\nACGT\n",
    )
    .unwrap();

    let files = ReadFileDiscovery::new(&[dir.path()], ".fastq").unwrap();
    let engine = MatchEngineKind::Naive.build(&index).unwrap();
    let result = barcode_counting_from_reads(
        files,
        &index,
        engine.as_ref(),
        &SampleLabeler::StripSuffix(3),
        MalformedReadPolicy::Abort,
    );

    assert!(result.is_err());
}

#[rstest]
fn test_malformed_file_is_truncated_under_skip(path_to_barcode_table: &str) {
    let index = build_index(path_to_barcode_table);

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("broken_S1.fastq"),
        "@read1\nACGTACGTA\n+\nIIIIIIIII\n@read2\nACGT\n",
    )
    .unwrap();

    let files = ReadFileDiscovery::new(&[dir.path()], ".fastq").unwrap();
    let engine = MatchEngineKind::Naive.build(&index).unwrap();
    let matrix = barcode_counting_from_reads(
        files,
        &index,
        engine.as_ref(),
        &SampleLabeler::StripSuffix(3),
        MalformedReadPolicy::Skip,
    )
    .unwrap();

    // the good record before the breakage still counts
    assert_eq!(matrix.value("broken", "GeneA"), Some(1));
}

#[rstest]
fn test_empty_directory_yields_no_matrix(path_to_barcode_table: &str) {
    let index = build_index(path_to_barcode_table);

    let dir = tempfile::tempdir().unwrap();
    let files = ReadFileDiscovery::new(&[dir.path()], ".fastq").unwrap();
    let engine = MatchEngineKind::Naive.build(&index).unwrap();
    let result = barcode_counting_from_reads(
        files,
        &index,
        engine.as_ref(),
        &SampleLabeler::default(),
        MalformedReadPolicy::Abort,
    );

    assert!(result.is_err());
}
