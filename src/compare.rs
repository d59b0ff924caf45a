// Test case comparison: render one example and classify the output.
//
// Classification is strict string equality first, then structural equality
// of the parsed element trees. Structural equality compares element kind,
// tag name, the attribute set, and children by position. Text content and
// inter-element whitespace are ignored, which is what lets a renderer differ
// in newline placement and still be judged conformant.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::corpus::{Config, TestCase};
use crate::error::HarnessError;
use crate::extension;
use crate::fragment::{self, Element};
use crate::render::{self, Renderer};
use crate::report;

/// How a rendered example relates to its expected output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOutcome {
    /// Byte-for-byte identical output.
    Strict,
    /// Structurally equivalent output.
    Loose,
    /// The renderer ran but its output does not match.
    Fail,
    /// The renderer faulted.
    Error,
}

impl CompareOutcome {
    pub const ALL: [CompareOutcome; 4] = [
        CompareOutcome::Strict,
        CompareOutcome::Loose,
        CompareOutcome::Fail,
        CompareOutcome::Error,
    ];

    /// Strict and loose matches both count as conformant.
    pub fn is_pass(self) -> bool {
        matches!(self, CompareOutcome::Strict | CompareOutcome::Loose)
    }

    pub fn label(self) -> &'static str {
        match self {
            CompareOutcome::Strict => "strict",
            CompareOutcome::Loose => "loose",
            CompareOutcome::Fail => "fail",
            CompareOutcome::Error => "error",
        }
    }
}

/// The classification of one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareResult<'a> {
    pub test_case: &'a TestCase,
    pub outcome: CompareOutcome,
    /// Rendered HTML; `None` when the renderer faulted.
    pub actual: Option<String>,
}

/// Options for [`compare`].
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    /// Return render faults as errors instead of classifying them.
    pub throw_on_render_error: bool,
    /// Print a diagnostic for every `Fail` and `Error`.
    pub verbose_on_fail: bool,
    /// Print a diagnostic for every `Loose` match.
    pub verbose_on_loose_match: bool,
    /// Extensions enabled for every case, in addition to its own.
    pub default_extensions: BTreeSet<String>,
}

impl CompareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_throw_on_render_error(mut self, throw: bool) -> Self {
        self.throw_on_render_error = throw;
        self
    }

    pub fn with_verbose_on_fail(mut self, verbose: bool) -> Self {
        self.verbose_on_fail = verbose;
        self
    }

    pub fn with_verbose_on_loose_match(mut self, verbose: bool) -> Self {
        self.verbose_on_loose_match = verbose;
        self
    }

    pub fn with_default_extension(mut self, name: impl Into<String>) -> Self {
        self.default_extensions.insert(name.into());
        self
    }
}

/// Render `test_case` and classify the result.
///
/// Unknown extension names are always an error. Render faults (returned
/// errors and panics alike) become [`CompareOutcome::Error`] unless
/// `throw_on_render_error` is set. A panic is not printed by the panic
/// hook; its message and `file:line:col` end up in the fault instead.
///
/// ```
/// use mdconform::{compare, CompareOptions, CompareOutcome, Config, PulldownRenderer, TestCase};
///
/// let case = TestCase::new(1, "Emphasis", "*a*", "<p><em>a</em></p>\n");
/// let result = compare(&PulldownRenderer, &Config::COMMONMARK, &case, &CompareOptions::new()).unwrap();
/// assert_eq!(result.outcome, CompareOutcome::Strict);
/// ```
pub fn compare<'a, R>(
    renderer: &R,
    config: &Config,
    test_case: &'a TestCase,
    options: &CompareOptions,
) -> Result<CompareResult<'a>, HarnessError>
where
    R: Renderer + ?Sized,
{
    let names = options
        .default_extensions
        .iter()
        .chain(test_case.extensions.iter());
    let renderer_config = extension::resolve(names)?;

    let rendered = render::render_guarded(renderer, &test_case.markdown, &renderer_config);

    let actual = match rendered {
        Ok(actual) => actual,
        Err(fault) => {
            if options.throw_on_render_error {
                return Err(HarnessError::Render(fault));
            }
            if options.verbose_on_fail {
                report::print(config.base_url, "ERROR", test_case, &fault.detailed().to_string());
            }
            debug_event!(example = test_case.example, error = %fault, "render fault");
            return Ok(CompareResult {
                test_case,
                outcome: CompareOutcome::Error,
                actual: None,
            });
        }
    };

    let outcome = classify(&test_case.html, &actual);
    match outcome {
        CompareOutcome::Loose if options.verbose_on_loose_match => {
            report::print(config.base_url, "LOOSE", test_case, &actual);
        }
        CompareOutcome::Fail if options.verbose_on_fail => {
            report::print(config.base_url, "FAIL", test_case, &actual);
        }
        _ => {}
    }
    debug_event!(example = test_case.example, outcome = outcome.label(), "classified");

    Ok(CompareResult {
        test_case,
        outcome,
        actual: Some(actual),
    })
}

/// Classify successfully rendered output against the expected HTML.
pub fn classify(expected: &str, actual: &str) -> CompareOutcome {
    if expected == actual {
        CompareOutcome::Strict
    } else if structurally_equal(&fragment::parse(expected), &fragment::parse(actual)) {
        CompareOutcome::Loose
    } else {
        CompareOutcome::Fail
    }
}

/// Structural equality of two element sequences.
///
/// Sequences must have the same length; elements are paired by position and
/// must agree on kind, tag name, attribute set (names and values, in any
/// order) and, recursively, children.
///
/// ```
/// use mdconform::{structurally_equal, fragment::parse};
///
/// let a = parse(r#"<a href="u" title="t">x</a>"#);
/// let b = parse(r#"<a title="t" href="u">y</a>"#);
/// assert!(structurally_equal(&a, &b));
/// ```
pub fn structurally_equal(expected: &[Element], actual: &[Element]) -> bool {
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(e, a)| element_equal(e, a))
}

fn element_equal(expected: &Element, actual: &Element) -> bool {
    expected.kind == actual.kind
        && expected.name == actual.name
        && expected.attributes.len() == actual.attributes.len()
        && attribute_map(expected) == attribute_map(actual)
        && structurally_equal(&expected.children, &actual.children)
}

fn attribute_map(element: &Element) -> BTreeMap<&str, &str> {
    element
        .attributes
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}
