use crate::error::{ClassifierError, Result};
use context_protocol::Dialect;
use tree_sitter::Parser;

/// Tree-sitter grammar for a dialect. The JavaScript grammar covers JSX and
/// decorators; typed dialects need the TypeScript grammars, and only the TSX
/// variant accepts markup.
pub(crate) fn grammar_for(dialect: Dialect) -> tree_sitter::Language {
    match (dialect.is_typed(), dialect.has_markup()) {
        (false, _) => tree_sitter_javascript::LANGUAGE.into(),
        (true, false) => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        (true, true) => tree_sitter_typescript::LANGUAGE_TSX.into(),
    }
}

pub(crate) fn parser_for(dialect: Dialect) -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&grammar_for(dialect))
        .map_err(|e| ClassifierError::tree_sitter(format!("Failed to set language: {e}")))?;
    Ok(parser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dialect_has_a_grammar() {
        for dialect in [
            Dialect::Plain,
            Dialect::Typed,
            Dialect::MarkupPlain,
            Dialect::MarkupTyped,
        ] {
            assert!(parser_for(dialect).is_ok(), "{dialect}");
        }
    }

    #[test]
    fn markup_only_parses_cleanly_with_markup_grammar() {
        let code = "const a = <div className=\"x\" />;";
        let mut tsx = parser_for(Dialect::MarkupTyped).unwrap();
        assert!(!tsx.parse(code, None).unwrap().root_node().has_error());

        let mut plain_ts = parser_for(Dialect::Typed).unwrap();
        assert!(plain_ts.parse(code, None).unwrap().root_node().has_error());
    }
}
