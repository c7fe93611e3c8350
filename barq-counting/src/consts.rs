use crate::match_engine::MatchEngineKind;

pub const DEFAULT_OUT: &str = "counts.csv.gz";
pub const DEFAULT_READ_EXTENSION: &str = ".fastq";
pub const DEFAULT_ENGINE: MatchEngineKind = MatchEngineKind::Automaton;
