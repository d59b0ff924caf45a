// Shared test helpers for mdconform.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::PathBuf;

use mdconform::{PulldownRenderer, RenderFault, Renderer, RendererConfig};

/// Directory holding the fixture corpora.
pub fn corpus_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test-fixtures")
        .join("corpus")
}

/// A renderer that always returns the same output.
pub fn fixed(output: &'static str) -> impl Fn(&str, &RendererConfig) -> Result<String, RenderFault> {
    move |_, _| Ok(output.to_string())
}

/// A renderer that always faults.
pub fn faulty(_: &str, _: &RendererConfig) -> Result<String, RenderFault> {
    Err(RenderFault::new("renderer exploded").with_origin("faulty:1"))
}

/// Wraps the bundled renderer and records every configuration it receives.
#[derive(Default)]
pub struct Recording {
    pub configs: RefCell<Vec<RendererConfig>>,
}

impl Renderer for Recording {
    fn render(&self, markdown: &str, config: &RendererConfig) -> Result<String, RenderFault> {
        self.configs.borrow_mut().push(config.clone());
        PulldownRenderer.render(markdown, config)
    }
}

/// The bundled renderer with every extension switched off, whatever the
/// harness asks for.
pub fn without_extensions(markdown: &str, _: &RendererConfig) -> Result<String, RenderFault> {
    PulldownRenderer.render(markdown, &RendererConfig::default())
}
