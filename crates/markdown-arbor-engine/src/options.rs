//! Capability toggles consumed by the parser.

/// Boolean switches controlling which layers of the grammar are active.
///
/// All switches default to off, which gives a plain CommonMark+GFM parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Recognize `@Name(arguments) { content }` block directives.
    pub block_directives: bool,
    /// Recognize the minimal Doxygen command set (`@param`, `@returns`,
    /// `@discussion`, `@note`, `@abstract`/`@brief`), with either `@` or
    /// `\` prefixes.
    pub minimal_doxygen: bool,
    /// Promote double-backtick code spans to symbol-link nodes.
    pub symbol_links: bool,
    /// Enable smart punctuation in the CommonMark core (curly quotes,
    /// dashes, ellipses).
    pub smart_punctuation: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_directives(mut self, enabled: bool) -> Self {
        self.block_directives = enabled;
        self
    }

    pub fn minimal_doxygen(mut self, enabled: bool) -> Self {
        self.minimal_doxygen = enabled;
        self
    }

    pub fn symbol_links(mut self, enabled: bool) -> Self {
        self.symbol_links = enabled;
        self
    }

    pub fn smart_punctuation(mut self, enabled: bool) -> Self {
        self.smart_punctuation = enabled;
        self
    }
}
