//! Structural passes: define substitution, parenthesis nesting and comma lists

use super::errors::CompileError;
use super::operators::Operator;
use super::processing::{TokenProcessor, Worklist};
use super::token::{ParenthesisType, Sequence, SequenceId, StatementKind, Token, TokenList};
use log::trace;

impl<'a> TokenProcessor<'a> {
    /// Splice the content of every define used in `sequence`.
    ///
    /// Spliced tokens are not scanned again, so a define naming another define
    /// is not expanded further.
    pub(crate) fn process_defines(&self, tokens: &mut TokenList, sequence: SequenceId) {
        let mut i = 0;
        while i < tokens.len(sequence) {
            let define = match tokens.at(sequence, i) {
                Token::Identifier(name) => self.globals.define_by_name(name),
                _ => None,
            };
            let Some(define) = define else {
                i += 1;
                continue;
            };

            trace!(
                "line {}: expanding define '{}' ({} tokens)",
                self.line_number,
                define.name,
                define.content.len()
            );
            tokens.erase(sequence, i);
            for (k, token) in define.content.iter().enumerate() {
                tokens.insert(sequence, i + k, token.clone());
            }
            i += define.content.len();
        }
    }

    /// Nest every delimited range of `root` into a group token.
    ///
    /// Returns the worklist of sequences to process: the content of each
    /// non-empty group in the order its closing delimiter appears, then `root`.
    pub(crate) fn process_parentheses(
        &self,
        tokens: &mut TokenList,
        root: SequenceId,
    ) -> Result<Worklist, CompileError> {
        let mut units = Worklist::new();
        let mut open: Vec<(ParenthesisType, usize)> = Vec::new();

        let mut i = 0;
        while i < tokens.len(root) {
            let closing = match tokens.at(root, i).as_operator() {
                Some(Operator::ParenthesisLeft) => {
                    open.push((ParenthesisType::Parenthesis, i));
                    None
                }
                Some(Operator::BracketLeft) => {
                    open.push((ParenthesisType::Bracket, i));
                    None
                }
                Some(Operator::ParenthesisRight) => Some(ParenthesisType::Parenthesis),
                Some(Operator::BracketRight) => Some(ParenthesisType::Bracket),
                _ => None,
            };

            if let Some(kind) = closing {
                let start = match open.pop() {
                    Some((open_kind, start)) if open_kind == kind => start,
                    _ => return Err(self.structure_error("Parenthesis not matching (too many closed)")),
                };

                tokens.erase(root, i);
                let content = tokens.move_range(root, start + 1, i - start - 1);
                tokens.replace_at(
                    root,
                    start,
                    Token::statement(StatementKind::Parenthesis { kind, content }, None),
                );
                if !tokens.is_empty(content) {
                    units.push(content);
                }
                i = start;
            }
            i += 1;
        }

        if !open.is_empty() {
            return Err(self.structure_error("Parenthesis not matching (too many open)"));
        }

        units.push(root);
        Ok(units)
    }

    /// Split every unit containing commas into a comma-separated list.
    ///
    /// The unit is left holding a single [`Token::CommaSeparated`]; its items
    /// are queued right after it so they are processed before the next unit.
    pub(crate) fn process_comma_separators(
        &self,
        tokens: &mut TokenList,
        units: &mut Worklist,
    ) -> Result<(), CompileError> {
        let mut k = 0;
        while k < units.len() {
            let unit = units[k];
            let has_comma = tokens
                .sequence(unit)
                .iter()
                .any(|&id| tokens.token(id).as_operator() == Some(Operator::CommaSeparator));

            if has_comma {
                let content = tokens.replace_sequence(unit, Sequence::new());
                let parts: Vec<Sequence> = content
                    .split(|&id| tokens.token(id).as_operator() == Some(Operator::CommaSeparator))
                    .map(|part| part.to_vec())
                    .collect();

                let mut items = Vec::with_capacity(parts.len());
                for part in parts {
                    if part.is_empty() {
                        return Err(self.structure_error("Empty item in comma-separated list"));
                    }
                    items.push(tokens.new_sequence(part));
                }

                tokens.insert(unit, 0, Token::CommaSeparated(items.clone()));
                units.splice(k + 1..k + 1, items.iter().copied());
                k += items.len();
            }
            k += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::compiler::processing::test_support::*;
    use super::*;
    use crate::program::globals::GlobalsLookup;

    fn structure(source: &str) -> Result<(TokenList, Worklist), CompileError> {
        let globals = globals();
        let mut scope = scope();
        let mut tokens = TokenList::parse(source).unwrap();
        let processor = TokenProcessor::new(&globals, &mut scope);
        let root = tokens.root();
        let mut units = processor.process_parentheses(&mut tokens, root)?;
        processor.process_comma_separators(&mut tokens, &mut units)?;
        Ok((tokens, units))
    }

    #[test]
    fn test_nested_groups_are_queued_innermost_first() {
        let (tokens, units) = structure("a * (b + [c - (d)])").unwrap();

        let rendered: Vec<String> = units.iter().map(|&u| tokens.render_sequence(u)).collect();
        assert_eq!(
            rendered,
            vec![
                "d",
                "c - (group d)",
                "b + (bracket c - (group d))",
                "a * (group b + (bracket c - (group d)))",
            ]
        );
        assert_eq!(*units.last().unwrap(), tokens.root());
    }

    #[test]
    fn test_empty_group_is_not_queued() {
        let (tokens, units) = structure("f()").unwrap();
        assert_eq!(units, vec![tokens.root()]);
        assert_eq!(tokens.render(), "f (group )");
    }

    #[test]
    fn test_mismatched_delimiters() {
        for source in ["(a]", "a)", "[a)"] {
            let err = structure(source).unwrap_err();
            assert_eq!(err.message(), "Parenthesis not matching (too many closed)", "{}", source);
        }
        let err = structure("((a)").unwrap_err();
        assert_eq!(err.message(), "Parenthesis not matching (too many open)");
    }

    #[test]
    fn test_comma_items_follow_their_unit() {
        let (tokens, units) = structure("f(a, b + 1, g(c, d)) + 2").unwrap();

        let rendered: Vec<String> = units.iter().map(|&u| tokens.render_sequence(u)).collect();
        assert_eq!(
            rendered,
            vec![
                "{c, d}",
                "c",
                "d",
                "{a, b + 1, g (group {c, d})}",
                "a",
                "b + 1",
                "g (group {c, d})",
                "f (group {a, b + 1, g (group {c, d})}) + 2",
            ]
        );
    }

    #[test]
    fn test_empty_comma_item_is_rejected() {
        let err = structure("f(a, , b)").unwrap_err();
        assert!(matches!(err, CompileError::Structure { .. }));
        assert_eq!(err.message(), "Empty item in comma-separated list");
    }

    #[test]
    fn test_define_is_spliced_once() {
        let mut globals = GlobalsLookup::new();
        let content = TokenList::parse("(LIMIT + 1)").unwrap();
        let content: Vec<Token> = content
            .sequence(content.root())
            .iter()
            .map(|&id| content.token(id).clone())
            .collect();
        globals.add_define("NEXT", content);
        globals.add_define("LIMIT", vec![Token::constant(9)]);

        let mut scope = scope();
        let mut tokens = TokenList::parse("NEXT * LIMIT").unwrap();
        let processor = TokenProcessor::new(&globals, &mut scope);
        let root = tokens.root();
        processor.process_defines(&mut tokens, root);

        assert_eq!(tokens.render(), "( LIMIT + 1 ) * 9");
    }
}
