// Outcome tallies across a corpus run.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::compare::{CompareOutcome, CompareResult};

/// Outcome counts for one section, or for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub strict: usize,
    pub loose: usize,
    pub fail: usize,
    pub error: usize,
}

impl Tally {
    pub fn add(&mut self, outcome: CompareOutcome) {
        match outcome {
            CompareOutcome::Strict => self.strict += 1,
            CompareOutcome::Loose => self.loose += 1,
            CompareOutcome::Fail => self.fail += 1,
            CompareOutcome::Error => self.error += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.strict + self.loose + self.fail + self.error
    }

    pub fn passed(&self) -> usize {
        self.strict + self.loose
    }

    /// Fraction of cases that passed; 1.0 when empty.
    pub fn score(&self) -> f64 {
        match self.total() {
            0 => 1.0,
            total => self.passed() as f64 / total as f64,
        }
    }

    fn merge(&mut self, other: &Tally) {
        self.strict += other.strict;
        self.loose += other.loose;
        self.fail += other.fail;
        self.error += other.error;
    }
}

/// Per-section outcomes of a run, keeping example numbers for the stats file.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    sections: BTreeMap<String, Tally>,
    examples: StatsFile,
}

/// Serialized form: section → outcome → example numbers.
pub type StatsFile = BTreeMap<String, BTreeMap<CompareOutcome, Vec<u32>>>;

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, section: &str, example: u32, outcome: CompareOutcome) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .add(outcome);
        self.examples
            .entry(section.to_string())
            .or_default()
            .entry(outcome)
            .or_default()
            .push(example);
    }

    pub fn record_result(&mut self, result: &CompareResult<'_>) {
        self.record(
            &result.test_case.section,
            result.test_case.example,
            result.outcome,
        );
    }

    pub fn section(&self, name: &str) -> Option<&Tally> {
        self.sections.get(name)
    }

    pub fn total(&self) -> Tally {
        let mut total = Tally::default();
        for tally in self.sections.values() {
            total.merge(tally);
        }
        total
    }

    /// Example numbers grouped by section and outcome, each list sorted.
    pub fn to_file(&self) -> StatsFile {
        let mut file = self.examples.clone();
        for outcomes in file.values_mut() {
            for examples in outcomes.values_mut() {
                examples.sort_unstable();
            }
        }
        file
    }

    /// Pretty JSON for [`Stats::to_file`].
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(&self.to_file())?;
        json.push('\n');
        Ok(json)
    }

    /// A fixed-width table with one row per section and a total row.
    ///
    /// Columns are percentages of the row total, or counts when `raw`.
    pub fn summary(&self, raw: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>7} {:>7} {:>7} {:>7} {:>6}  section",
            "strict", "loose", "fail", "error", "total"
        );
        for (name, tally) in &self.sections {
            push_row(&mut out, name, tally, raw);
        }
        push_row(&mut out, "TOTAL", &self.total(), raw);
        out
    }
}

fn push_row(out: &mut String, name: &str, tally: &Tally, raw: bool) {
    let cells = [tally.strict, tally.loose, tally.fail, tally.error].map(|n| {
        if raw {
            n.to_string()
        } else {
            percent(n, tally.total())
        }
    });
    let _ = writeln!(
        out,
        "{:>7} {:>7} {:>7} {:>7} {:>6}  {name}",
        cells[0],
        cells[1],
        cells[2],
        cells[3],
        tally.total()
    );
}

fn percent(n: usize, total: usize) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", n as f64 * 100.0 / total as f64)
}
