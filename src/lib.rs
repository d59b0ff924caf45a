// mdconform — conformance harness for Markdown-to-HTML renderers.
//
// Architecture:
//   corpus JSON → TestCase by section → compare → Renderer → HTML string
//     → strict string check → html5ever fragment trees → structural check
//     → CompareResult → Stats / diagnostics
//
// Corpora follow the CommonMark and GFM spec test formats:
//   - CommonMark spec: https://spec.commonmark.org/
//   - GFM spec: https://github.github.com/gfm/

// Debug events, compiled out unless the `tracing` feature is enabled.
macro_rules! debug_event {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    }};
}

mod compare;
pub mod corpus;
mod error;
mod extension;
pub mod fragment;
pub mod render;
pub mod report;
pub mod stats;

pub use compare::{
    classify, compare, structurally_equal, CompareOptions, CompareOutcome, CompareResult,
};
pub use corpus::{load_sections, Config, Sections, TestCase};
pub use error::{CorpusLoadError, HarnessError, UnsupportedExtensionError};
pub use extension::{resolve, BlockSyntax, Extension, InlineSyntax, RendererConfig};
pub use render::{PulldownRenderer, RenderFault, Renderer};
pub use stats::{Stats, Tally};

/// Run every case of a loaded corpus, in section order.
///
/// Stops at the first harness error (unknown extension, or a render fault
/// when `throw_on_render_error` is set).
pub fn run_sections<'a, R>(
    renderer: &R,
    config: &Config,
    sections: &'a Sections,
    options: &CompareOptions,
) -> Result<Vec<CompareResult<'a>>, HarnessError>
where
    R: Renderer + ?Sized,
{
    sections
        .values()
        .flatten()
        .map(|case| compare(renderer, config, case, options))
        .collect()
}
