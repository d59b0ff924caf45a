// Conformance corpus: test case records, the corpus registry, and the loader.
//
// A corpus file is a JSON array of spec examples, one file per corpus prefix,
// named `<prefix>_tests.json` inside an explicitly supplied directory.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::CorpusLoadError;

/// One conformance example.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestCase {
    /// Example number, unique within a corpus.
    pub example: u32,
    /// Spec section the example belongs to.
    pub section: String,
    #[serde(default)]
    pub start_line: u32,
    #[serde(default)]
    pub end_line: u32,
    /// Markdown input.
    pub markdown: String,
    /// Expected HTML output.
    #[serde(default)]
    pub html: String,
    /// Extensions the renderer needs to reproduce this example.
    #[serde(default, deserialize_with = "nullable_set")]
    pub extensions: BTreeSet<String>,
}

impl TestCase {
    /// Create a test case with no extensions and no line information.
    pub fn new(
        example: u32,
        section: impl Into<String>,
        markdown: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            example,
            section: section.into(),
            start_line: 0,
            end_line: 0,
            markdown: markdown.into(),
            html: html.into(),
            extensions: BTreeSet::new(),
        }
    }

    /// Add a required extension.
    pub fn with_extension(mut self, name: impl Into<String>) -> Self {
        self.extensions.insert(name.into());
        self
    }
}

/// `"extensions": null` reads the same as an absent field.
fn nullable_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeSet<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A named conformance corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Short name used on the command line.
    pub name: &'static str,
    /// Corpus file-name stem.
    pub prefix: &'static str,
    /// Canonical specification URL; example anchors are appended to it.
    pub base_url: &'static str,
}

impl Config {
    pub const COMMONMARK: Config = Config::new(
        "commonmark",
        "common_mark",
        "https://spec.commonmark.org/0.30/",
    );

    pub const GFM: Config = Config::new("gfm", "gfm", "https://github.github.com/gfm/");

    /// Every known corpus.
    pub const ALL: &'static [Config] = &[Config::COMMONMARK, Config::GFM];

    pub const fn new(name: &'static str, prefix: &'static str, base_url: &'static str) -> Self {
        Self {
            name,
            prefix,
            base_url,
        }
    }

    /// Look up a registered corpus by name or prefix.
    pub fn by_name(name: &str) -> Option<Config> {
        Self::ALL
            .iter()
            .find(|c| c.name == name || c.prefix == name)
            .copied()
    }

    /// Location of this corpus inside `dir`.
    pub fn corpus_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}_tests.json", self.prefix))
    }
}

/// Test cases grouped by section. Each bucket keeps the corpus file order.
pub type Sections = BTreeMap<String, Vec<TestCase>>;

/// Load the corpus for `config` from `dir`, grouped by section.
pub fn load_sections(dir: &Path, config: &Config) -> Result<Sections, CorpusLoadError> {
    let cases = load_cases(&config.corpus_path(dir))?;
    Ok(group_by_section(cases))
}

/// Read and validate a corpus file.
pub fn load_cases(path: &Path) -> Result<Vec<TestCase>, CorpusLoadError> {
    let json = fs::read_to_string(path).map_err(|source| CorpusLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cases = parse_cases(&json).map_err(|source| CorpusLoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seen = HashSet::with_capacity(cases.len());
    if let Some(dup) = cases.iter().find(|c| !seen.insert(c.example)) {
        return Err(CorpusLoadError::DuplicateExample {
            path: path.to_path_buf(),
            example: dup.example,
        });
    }

    debug_event!(path = %path.display(), cases = cases.len(), "loaded corpus");
    Ok(cases)
}

/// Deserialize a corpus JSON array.
pub fn parse_cases(json: &str) -> Result<Vec<TestCase>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Partition cases by section, preserving their relative order.
pub fn group_by_section(cases: impl IntoIterator<Item = TestCase>) -> Sections {
    let mut sections = Sections::new();
    for case in cases {
        sections.entry(case.section.clone()).or_default().push(case);
    }
    sections
}
