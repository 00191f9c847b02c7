use thiserror::Error;

/// Result type for classifier operations
pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Errors that can occur while classifying one file
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Failed to parse the source code
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The syntax tree contains errors
    #[error("Syntax error near line {line}")]
    SyntaxError { line: usize },

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl ClassifierError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }
}
