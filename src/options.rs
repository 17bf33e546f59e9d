//! Host-facing configuration (§6): six flat knobs, not a `Constructs`-style
//! toggle struct — each parser/writer takes only the knobs that apply to it.

use crate::diagnostic::Report;
use crate::html::TreeContext;
use encoding_rs::Encoding;

/// Configuration for the HTML parser.
#[derive(Clone, Debug, Default)]
pub struct HtmlParserOptions {
    /// Force this encoding instead of sniffing one from the input.
    pub encoding: Option<&'static Encoding>,
    /// Parse as a document, or as a fragment in the context of some element;
    /// also carries the scripting-enabled flag that governs `<noscript>`
    /// handling.
    pub context: TreeContext,
    /// Where diagnostics go; defaults to discarding them.
    pub report: Report,
}

/// Configuration for the XML parser.
#[derive(Clone, Debug, Default)]
pub struct XmlParserOptions {
    /// Force this encoding instead of sniffing one from the input.
    pub encoding: Option<&'static Encoding>,
    /// Where diagnostics go; defaults to discarding them.
    pub report: Report,
}

/// A host-supplied policy for choosing namespace prefixes in XML writer
/// output. Returning `None` tells the writer to mint its own `nsN` prefix.
pub type NamespacePolicy = Box<dyn FnMut(&str) -> Option<String>>;

/// Configuration for the HTML writer.
#[derive(Clone, Debug, Default)]
pub struct HtmlWriterOptions {
    /// Where diagnostics (an unbalanced `EndElement`, most likely) go;
    /// defaults to discarding them.
    pub report: Report,
}

/// Configuration for the XML writer.
#[derive(Default)]
pub struct XmlWriterOptions {
    /// Called with each namespace URI the writer needs a prefix for, before
    /// it falls back to minting `nsN`.
    pub namespace: Option<NamespacePolicy>,
    /// Where diagnostics (an unbalanced `EndElement`, most likely) go;
    /// defaults to discarding them.
    pub report: Report,
}
