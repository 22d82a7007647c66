//! Lexical reduction: strip comments and docstring-shaped literals while
//! keeping the column layout of every remaining token.

use crate::error::TokenizeError;
use crate::token::{Token, TokenKind};
use crate::tokenizer::tokenize;

/// Tokenize `source` and rebuild it without comments and docstrings.
pub fn reduce(source: &str) -> Result<String, TokenizeError> {
    let tokens = tokenize(source)?;
    Ok(reduce_tokens(&tokens))
}

/// Rebuild source text from `tokens`, dropping comments and any string
/// literal that directly follows an `Indent` token.
///
/// The kind tracked for the docstring check is that of the token right
/// before, whether or not that token was kept. It starts out as `Indent`, so
/// a literal opening the file is dropped as well.
pub fn reduce_tokens(tokens: &[Token]) -> String {
    let mut output = String::new();
    let mut prev_kind = TokenKind::Indent;
    let mut last_row = 0;
    let mut last_col = 0;

    for token in tokens {
        let previous = std::mem::replace(&mut prev_kind, token.kind);

        if token.kind == TokenKind::Comment {
            continue;
        }
        if token.kind == TokenKind::String && previous == TokenKind::Indent {
            continue;
        }

        if token.start.row > last_row {
            last_col = 0;
        }
        if token.start.col > last_col {
            output.extend(std::iter::repeat(' ').take(token.start.col - last_col));
        }
        output.push_str(&token.text);

        last_row = token.end.row;
        last_col = token.end.col;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_source_is_unchanged() {
        let source = "def add(a, b):\n    return a + b\n\n\nclass Foo:\n    x = [1,\n         2]\n";
        assert_eq!(reduce(source).unwrap(), source);
    }

    #[test]
    fn test_reduction_is_idempotent() {
        let source = "def f(x):\n    '''doc'''\n    return x  # done\n";
        let once = reduce(source).unwrap();
        let twice = reduce(&once).unwrap();
        assert_eq!(once, twice);
    }

    /// `n` spaces, the footprint a removed token leaves behind.
    fn pad(n: usize) -> String {
        " ".repeat(n)
    }

    #[test]
    fn test_removes_comments() {
        let source = "x = 1  # trailing\n# full line\ny = 2\n";
        let expected = format!("x = 1{}\n{}\ny = 2\n", pad(12), pad(11));
        assert_eq!(reduce(source).unwrap(), expected);
    }

    #[test]
    fn test_comment_removal_keeps_following_columns() {
        let source = "def f():\n    a = 1  # note\n    b = 2\n";
        let reduced = reduce(source).unwrap();
        assert_eq!(reduced, format!("def f():\n    a = 1{}\n    b = 2\n", pad(8)));

        let original_b = source.lines().nth(2).unwrap().find('b');
        let reduced_b = reduced.lines().nth(2).unwrap().find('b');
        assert_eq!(original_b, reduced_b);
    }

    #[test]
    fn test_removes_function_docstring() {
        let source = "def f():\n    \"\"\"Docs.\"\"\"\n    return 1\n";
        let expected = format!("def f():\n{}\n    return 1\n", pad(15));
        assert_eq!(reduce(source).unwrap(), expected);
    }

    #[test]
    fn test_removes_class_docstring() {
        let source = "class A:\n    'doc'\n    x = 1\n";
        let expected = format!("class A:\n{}\n    x = 1\n", pad(9));
        assert_eq!(reduce(source).unwrap(), expected);
    }

    #[test]
    fn test_keeps_module_level_assigned_string() {
        let source = "x = 1\nMESSAGE = \"\"\"Docs.\"\"\"\n";
        assert_eq!(reduce(source).unwrap(), source);
    }

    #[test]
    fn test_drops_leading_module_string() {
        let source = "\"\"\"Module docs.\"\"\"\nx = 1\n";
        assert_eq!(reduce(source).unwrap(), format!("{}\nx = 1\n", pad(18)));
    }

    #[test]
    fn test_strips_leading_string_in_any_block() {
        let source = "if x:\n    'not a docstring'\n    y = 1\n";
        let expected = format!("if x:\n{}\n    y = 1\n", pad(21));
        assert_eq!(reduce(source).unwrap(), expected);
    }

    #[test]
    fn test_string_after_other_statement_is_kept() {
        let source = "def f():\n    x = 1\n    'kept'\n";
        assert_eq!(reduce(source).unwrap(), source);
    }

    #[test]
    fn test_propagates_tokenize_errors() {
        assert!(reduce("s = '''open\n").is_err());
    }
}
