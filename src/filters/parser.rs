//! Query parser for incremental history search.
//!
//! Parses the text typed into the search box into a [`BooleanQuery`].
//!
//! # Syntax
//!
//! ```text
//! query      := group (OR group)*
//! group      := term_expr ([AND] term_expr)*
//! term_expr  := [NOT] expression
//! expression := field:value | value
//! value      := word | "quoted value"
//! field      := command | dir | directory | host | hostname (case-insensitive)
//! ```
//!
//! # Rules
//!
//! - Unqualified terms search the command text
//! - Adjacent expressions are AND'd; `AND` may also be written explicitly
//! - `OR` and `NOT` are keywords only in upper case and outside quotes, so
//!   `git log --not` still searches for the word `--not`
//! - An unknown qualifier (`origin:main`) is part of the term, not an error
//! - Terms that are blank after trimming are dropped
//! - A trailing `AND`/`OR` is ignored, so `git OR` matches like `git`; a
//!   leading or doubled operator is an error
//!
//! # Examples
//!
//! ```rust
//! # use dirhist::filters::parser::parse_query;
//! // Two command terms, both required
//! let query = parse_query("git push").unwrap();
//!
//! // Restrict to a directory, quoted to keep the space
//! let query = parse_query("make dir:\"my project\"").unwrap();
//!
//! // Either host, excluding docker commands
//! let query = parse_query("host:laptop OR host:desktop NOT docker").unwrap();
//! ```
//!
//! # Errors
//!
//! A malformed query never stops a search. [`parse_or_fallback`] swaps any
//! [`ParseError`] for a literal match of the whole text against the command.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use super::ast::{BooleanQuery, Condition, FilterField, OrGroup};

/// Why a query could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unterminated quote starting at byte {position}")]
    UnterminatedQuote { position: usize },
    #[error("{keyword} needs an expression on both sides")]
    DanglingOperator { keyword: &'static str },
    #[error("NOT must be followed by an expression")]
    MissingNegationOperand,
}

/// Token types produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// field:value or a bare term
    Expr { field: FilterField, value: String },
    And,
    Or,
    Not,
}

/// A whitespace-delimited word with quotes removed
#[derive(Debug)]
struct Word {
    text: String,
    quoted: bool,
    /// Byte offset in `text` of a `:` that precedes any quote
    field_split: Option<usize>,
}

/// Tokenize query input
fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(_, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let word = read_word(&mut chars)?;

        if !word.quoted {
            match word.text.as_str() {
                "AND" => {
                    tokens.push(Token::And);
                    continue;
                }
                "OR" => {
                    tokens.push(Token::Or);
                    continue;
                }
                "NOT" => {
                    tokens.push(Token::Not);
                    continue;
                }
                _ => {}
            }
        }

        tokens.push(word_to_expr(word));
    }

    Ok(tokens)
}

/// Read a word up to the next unquoted whitespace, stripping quotes
fn read_word(chars: &mut Peekable<CharIndices>) -> Result<Word, ParseError> {
    let mut text = String::new();
    let mut quoted = false;
    let mut field_split = None;
    let mut open_quote: Option<usize> = None;

    while let Some(&(pos, ch)) = chars.peek() {
        match (ch, open_quote) {
            ('"', None) => {
                open_quote = Some(pos);
                quoted = true;
            }
            ('"', Some(_)) => open_quote = None,
            (c, None) if c.is_whitespace() => break,
            (':', None) if !quoted && field_split.is_none() => {
                field_split = Some(text.len());
                text.push(':');
            }
            (c, _) => text.push(c),
        }
        chars.next();
    }

    if let Some(position) = open_quote {
        return Err(ParseError::UnterminatedQuote { position });
    }

    Ok(Word { text, quoted, field_split })
}

fn word_to_expr(word: Word) -> Token {
    if let Some(split) = word.field_split
        && let Some(field) = FilterField::from_name(&word.text[..split])
    {
        return Token::Expr { field, value: word.text[split + 1..].to_string() };
    }
    Token::Expr { field: FilterField::Command, value: word.text }
}

/// Parse query text into a [`BooleanQuery`]
///
/// Examples:
/// - "git" → one command condition
/// - "git dir:/srv" → command AND directory
/// - "git OR hg" → two groups
/// - "NOT sudo" → negated command condition
/// - "\"git st" → [`ParseError::UnterminatedQuote`]
pub fn parse_query(input: &str) -> Result<BooleanQuery, ParseError> {
    if input.trim().is_empty() {
        return Ok(BooleanQuery::new());
    }

    let tokens = tokenize(input)?;

    let mut groups = Vec::new();
    let mut current = Vec::new();
    // An expression was seen in the current group (even one dropped as blank)
    let mut group_has_expr = false;
    let mut pending_not = false;
    let mut pending_operator: Option<&'static str> = None;

    for token in tokens {
        match token {
            Token::Expr { field, value } => {
                if let Some(condition) = Condition::new(field, &value, pending_not) {
                    current.push(condition);
                }
                pending_not = false;
                pending_operator = None;
                group_has_expr = true;
            }
            Token::Not => {
                if pending_not {
                    return Err(ParseError::MissingNegationOperand);
                }
                pending_not = true;
            }
            Token::And | Token::Or => {
                let keyword = if token == Token::And { "AND" } else { "OR" };
                if pending_not {
                    return Err(ParseError::MissingNegationOperand);
                }
                if !group_has_expr || pending_operator.is_some() {
                    return Err(ParseError::DanglingOperator { keyword });
                }
                pending_operator = Some(keyword);
                if token == Token::Or {
                    groups.push(OrGroup::new(std::mem::take(&mut current)));
                    group_has_expr = false;
                }
            }
        }
    }

    if pending_not {
        return Err(ParseError::MissingNegationOperand);
    }

    // A trailing AND/OR is still being typed; the empty group it opened is dropped
    groups.push(OrGroup::new(current));
    Ok(BooleanQuery::from_groups(groups))
}

/// Parse, falling back to a literal command match on any error
///
/// The search box must keep working while the user is mid-way through typing
/// a quote, so errors are only logged.
pub fn parse_or_fallback(input: &str) -> BooleanQuery {
    match parse_query(input) {
        Ok(query) => query,
        Err(e) => {
            tracing::debug!(error = %e, query = input, "query parse failed, matching literally");
            BooleanQuery::literal(input)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(field: FilterField, term: &str, negated: bool) -> Condition {
        Condition { field, term: term.to_string(), negated }
    }

    #[test]
    fn test_tokenize_bare_word() {
        let tokens = tokenize("git").unwrap();
        assert_eq!(tokens, vec![Token::Expr {
            field: FilterField::Command,
            value: "git".to_string()
        }]);
    }

    #[test]
    fn test_tokenize_field_value() {
        let tokens = tokenize("dir:/srv/app").unwrap();
        assert_eq!(tokens, vec![Token::Expr {
            field: FilterField::Directory,
            value: "/srv/app".to_string()
        }]);
    }

    #[test]
    fn test_tokenize_quoted_value() {
        let tokens = tokenize("dir:\"my project\"").unwrap();
        assert_eq!(tokens, vec![Token::Expr {
            field: FilterField::Directory,
            value: "my project".to_string()
        }]);
    }

    #[test]
    fn test_tokenize_bare_quoted_term() {
        let tokens = tokenize("\"git st\" make").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], Token::Expr {
            field: FilterField::Command,
            value: "git st".to_string()
        });
    }

    #[test]
    fn test_tokenize_keywords() {
        let tokens = tokenize("a AND b OR NOT c").unwrap();
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[1], Token::And);
        assert_eq!(tokens[3], Token::Or);
        assert_eq!(tokens[4], Token::Not);
    }

    #[test]
    fn test_tokenize_lowercase_keywords_are_terms() {
        let tokens = tokenize("or not and").unwrap();
        assert!(tokens.iter().all(|t| matches!(t, Token::Expr { .. })));
    }

    #[test]
    fn test_tokenize_quoted_keyword_is_term() {
        let tokens = tokenize("\"OR\"").unwrap();
        assert_eq!(tokens, vec![Token::Expr {
            field: FilterField::Command,
            value: "OR".to_string()
        }]);
    }

    #[test]
    fn test_tokenize_unterminated_quote() {
        let result = tokenize("git \"status");
        assert_eq!(result, Err(ParseError::UnterminatedQuote { position: 4 }));
    }

    #[test]
    fn test_tokenize_unknown_field_is_command_term() {
        let tokens = tokenize("origin:main").unwrap();
        assert_eq!(tokens, vec![Token::Expr {
            field: FilterField::Command,
            value: "origin:main".to_string()
        }]);
    }

    #[test]
    fn test_tokenize_colon_inside_quotes_not_a_field() {
        let tokens = tokenize("\"dir:x\"").unwrap();
        assert_eq!(tokens, vec![Token::Expr {
            field: FilterField::Command,
            value: "dir:x".to_string()
        }]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_query("").unwrap().is_empty());
        assert!(parse_query("   \t").unwrap().is_empty());
    }

    #[test]
    fn test_parse_implicit_and() {
        let query = parse_query("git push").unwrap();
        assert_eq!(query.groups.len(), 1);
        assert_eq!(query.groups[0].conditions, vec![
            cond(FilterField::Command, "git", false),
            cond(FilterField::Command, "push", false),
        ]);
    }

    #[test]
    fn test_parse_explicit_and_is_same_as_implicit() {
        assert_eq!(parse_query("git AND push").unwrap(), parse_query("git push").unwrap());
    }

    #[test]
    fn test_parse_or_groups() {
        let query = parse_query("git dir:/a OR make").unwrap();
        assert_eq!(query.groups.len(), 2);
        assert_eq!(query.groups[0].conditions.len(), 2);
        assert_eq!(query.groups[1].conditions, vec![cond(FilterField::Command, "make", false)]);
    }

    #[test]
    fn test_parse_not() {
        let query = parse_query("NOT host:ci").unwrap();
        assert_eq!(query.groups[0].conditions, vec![cond(FilterField::Host, "ci", true)]);
    }

    #[test]
    fn test_parse_field_synonyms() {
        let query = parse_query("directory:/x hostname:box command:ls").unwrap();
        let fields: Vec<_> = query.groups[0].conditions.iter().map(|c| c.field).collect();
        assert_eq!(fields, vec![FilterField::Directory, FilterField::Host, FilterField::Command]);
    }

    #[test]
    fn test_parse_blank_value_dropped() {
        let query = parse_query("dir: git").unwrap();
        assert_eq!(query.groups[0].conditions, vec![cond(FilterField::Command, "git", false)]);

        let query = parse_query("host:\"  \"").unwrap();
        assert!(query.is_empty());
    }

    #[test]
    fn test_parse_blank_group_dropped() {
        let query = parse_query("dir: OR make").unwrap();
        assert_eq!(query.groups.len(), 1);
        assert_eq!(query.groups[0].conditions[0].term, "make");
    }

    #[test]
    fn test_parse_quoted_value_trimmed() {
        let query = parse_query("\" ls -la \"").unwrap();
        assert_eq!(query.groups[0].conditions[0].term, "ls -la");
    }

    #[test]
    fn test_parse_dangling_or() {
        assert_eq!(parse_query("OR git"), Err(ParseError::DanglingOperator { keyword: "OR" }));
        assert_eq!(
            parse_query("git OR OR make"),
            Err(ParseError::DanglingOperator { keyword: "OR" })
        );
    }

    #[test]
    fn test_parse_dangling_and() {
        assert_eq!(parse_query("AND git"), Err(ParseError::DanglingOperator { keyword: "AND" }));
    }

    #[test]
    fn test_parse_trailing_operator_ignored() {
        let git = parse_query("git").unwrap();
        assert_eq!(parse_query("git OR").unwrap(), git);
        assert_eq!(parse_query("git OR ").unwrap(), git);
        assert_eq!(parse_query("git AND").unwrap(), git);
        assert_eq!(
            parse_query("git OR OR"),
            Err(ParseError::DanglingOperator { keyword: "OR" })
        );
    }

    #[test]
    fn test_parse_not_without_operand() {
        assert_eq!(parse_query("git NOT"), Err(ParseError::MissingNegationOperand));
        assert_eq!(parse_query("NOT OR git"), Err(ParseError::MissingNegationOperand));
        assert_eq!(parse_query("NOT NOT git"), Err(ParseError::MissingNegationOperand));
    }

    #[test]
    fn test_parse_unterminated_quote() {
        assert!(matches!(parse_query("dir:\"my"), Err(ParseError::UnterminatedQuote { .. })));
    }

    #[test]
    fn test_fallback_on_error() {
        let query = parse_or_fallback("echo \"hi");
        assert_eq!(query, BooleanQuery::literal("echo \"hi"));
    }

    #[test]
    fn test_fallback_passthrough() {
        assert_eq!(parse_or_fallback("git dir:/a"), parse_query("git dir:/a").unwrap());
    }

    #[test]
    fn test_parse_is_deterministic() {
        for raw in ["git", "a OR b", "\"x", "NOT", "dir:\"a b\" host:c", ""] {
            assert_eq!(parse_query(raw), parse_query(raw));
        }
    }
}
