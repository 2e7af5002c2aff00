//! How a field finds its node(s) on a rendered page.

/// A DOM query. Selectors are static per platform profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(&'static str),
    XPath(&'static str),
}

/// What to read from a matched node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capture {
    /// The node's `textContent`, untrimmed.
    Text,
    /// The named attribute; a node without it reads as absent.
    Attribute(&'static str),
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css `{selector}`"),
            Locator::XPath(path) => write!(f, "xpath `{path}`"),
        }
    }
}
