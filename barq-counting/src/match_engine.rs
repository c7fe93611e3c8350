use std::str::FromStr;

use aho_corasick::AhoCorasick;
use anyhow::{Error, Result};
use memchr::memmem;

use barq_index::BarcodeIndex;

///
/// Multi-pattern containment search over one read sequence.
///
/// The contract is order-dependent: the winner is the first index entry (in
/// construction order) whose key occurs anywhere in the sequence, regardless
/// of where in the sequence it occurs. Every implementation must resolve
/// multi-barcode reads identically.
///
pub trait MatchEngine {
    /// Slot of the winning index entry, or None when no key is contained in
    /// `seq`.
    fn find(&self, seq: &[u8]) -> Option<usize>;
}

/// The reference engine: probe every key in index order with a substring
/// search and stop at the first hit. O(keys x read length) per read.
pub struct NaiveEngine {
    finders: Vec<memmem::Finder<'static>>,
}

impl NaiveEngine {
    pub fn new(index: &BarcodeIndex) -> Self {
        let finders = index
            .entries()
            .iter()
            .map(|e| memmem::Finder::new(&e.key).into_owned())
            .collect();

        Self { finders }
    }
}

impl MatchEngine for NaiveEngine {
    fn find(&self, seq: &[u8]) -> Option<usize> {
        self.finders.iter().position(|f| f.find(seq).is_some())
    }
}

/// Single-pass engine: one Aho-Corasick automaton over all keys. The
/// automaton surfaces hits in position order, so they are reduced to the
/// smallest pattern id; pattern ids equal index order because patterns are
/// added in construction order.
pub struct AutomatonEngine {
    automaton: AhoCorasick,
}

impl AutomatonEngine {
    pub fn new(index: &BarcodeIndex) -> Result<Self> {
        let automaton = AhoCorasick::new(index.entries().iter().map(|e| e.key.as_slice()))?;

        Ok(Self { automaton })
    }
}

impl MatchEngine for AutomatonEngine {
    fn find(&self, seq: &[u8]) -> Option<usize> {
        let mut winner: Option<usize> = None;

        for hit in self.automaton.find_overlapping_iter(seq) {
            let slot = hit.pattern().as_usize();
            if slot == 0 {
                return Some(0);
            }
            winner = Some(winner.map_or(slot, |w| w.min(slot)));
        }

        winner
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEngineKind {
    Naive,
    Automaton,
}

impl FromStr for MatchEngineKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "naive" => Ok(MatchEngineKind::Naive),
            "automaton" => Ok(MatchEngineKind::Automaton),
            _ => Err(Error::msg(format!("Invalid match engine: {}", s))),
        }
    }
}

impl MatchEngineKind {
    pub fn build(&self, index: &BarcodeIndex) -> Result<Box<dyn MatchEngine>> {
        match self {
            MatchEngineKind::Naive => Ok(Box::new(NaiveEngine::new(index))),
            MatchEngineKind::Automaton => Ok(Box::new(AutomatonEngine::new(index)?)),
        }
    }
}
