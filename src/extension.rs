// Extension names → renderer configuration.

use std::fmt;
use std::str::FromStr;

use crate::error::UnsupportedExtensionError;

/// A Markdown syntax extension a test case may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Extension {
    Autolink,
    Strikethrough,
    Table,
    Tagfilter,
}

impl Extension {
    pub const ALL: [Extension; 4] = [
        Extension::Autolink,
        Extension::Strikethrough,
        Extension::Table,
        Extension::Tagfilter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Extension::Autolink => "autolink",
            Extension::Strikethrough => "strikethrough",
            Extension::Table => "table",
            Extension::Tagfilter => "tagfilter",
        }
    }
}

impl FromStr for Extension {
    type Err = UnsupportedExtensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Extension::ALL
            .into_iter()
            .find(|ext| ext.name() == s)
            .ok_or_else(|| UnsupportedExtensionError(s.to_string()))
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inline-level syntax additions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineSyntax {
    /// GFM extended autolinks (`www.`, `http(s)://`, bare e-mail addresses).
    Autolink,
    /// `~~text~~`.
    Strikethrough,
}

/// Block-level syntax additions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockSyntax {
    /// GFM pipe tables.
    Table,
}

/// Renderer configuration derived from a set of extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RendererConfig {
    pub inline_syntaxes: Vec<InlineSyntax>,
    pub block_syntaxes: Vec<BlockSyntax>,
    /// Escape disallowed raw HTML tags during render.
    pub tagfilter: bool,
}

impl RendererConfig {
    pub fn has_inline(&self, syntax: InlineSyntax) -> bool {
        self.inline_syntaxes.contains(&syntax)
    }

    pub fn has_block(&self, syntax: BlockSyntax) -> bool {
        self.block_syntaxes.contains(&syntax)
    }

    /// Enable one extension. Enabling the same extension twice is a no-op.
    pub fn enable(&mut self, extension: Extension) {
        match extension {
            Extension::Autolink => push_unique(&mut self.inline_syntaxes, InlineSyntax::Autolink),
            Extension::Strikethrough => {
                push_unique(&mut self.inline_syntaxes, InlineSyntax::Strikethrough)
            }
            Extension::Table => push_unique(&mut self.block_syntaxes, BlockSyntax::Table),
            Extension::Tagfilter => self.tagfilter = true,
        }
    }
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if !list.contains(&item) {
        list.push(item);
    }
}

/// Resolve extension names into a renderer configuration.
///
/// Fails on the first name without a known mapping; unknown names are never
/// dropped.
///
/// ```
/// use mdconform::{resolve, BlockSyntax};
///
/// let config = resolve(["table", "tagfilter"]).unwrap();
/// assert!(config.has_block(BlockSyntax::Table));
/// assert!(config.tagfilter);
/// assert!(resolve(["bogus"]).is_err());
/// ```
pub fn resolve<I, S>(names: I) -> Result<RendererConfig, UnsupportedExtensionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut config = RendererConfig::default();
    for name in names {
        config.enable(name.as_ref().parse()?);
    }
    Ok(config)
}
