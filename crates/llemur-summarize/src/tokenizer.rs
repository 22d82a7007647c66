//! Python tokenizer
//!
//! Splits Python source into the token stream the classic `tokenize` module
//! produces: comments are tokens, indentation changes become `Indent` and
//! `Dedent` tokens, and every token carries its start and end position so
//! layout can be rebuilt from the stream.

use crate::error::TokenizeError;
use crate::token::{Position, Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

const TAB_SIZE: usize = 8;

/// Operators and delimiters, longest first so the alternation is maximal munch.
const OPERATORS: &[&str] = &[
    "**=", "...", "//=", ">>=", "<<=", "!=", "%=", "&=", "**", "*=", "+=", "-=", "->", "//",
    "/=", ":=", "<<", "<=", "==", ">=", ">>", "@=", "^=", "|=", "%", "&", "(", ")", "*", "+",
    ",", "-", ".", "/", ":", ";", "<", "=", ">", "@", "[", "]", "^", "{", "|", "}", "~",
];

static PSEUDO_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&pseudo_token_pattern()).expect("pseudo-token pattern is a valid regex")
});

/// Leading whitespace followed by exactly one token candidate in group 1.
fn pseudo_token_pattern() -> String {
    let prefix = r"(?:[bB][rR]?|[rR][bBfF]?|[uU]|[fF][rR]?)?";
    let digits = r"[0-9](?:_?[0-9])*";
    let exponent = format!(r"[eE][-+]?{digits}");
    let point_float = format!(r"(?:{digits}\.(?:{digits})?|\.{digits})(?:{exponent})?");
    let exp_float = format!("{digits}{exponent}");
    let float = format!("(?:{point_float}|{exp_float})");
    let imaginary = format!("(?:{digits}[jJ]|{float}[jJ])");
    let int = r"(?:0[xX](?:_?[0-9a-fA-F])+|0[bB](?:_?[01])+|0[oO](?:_?[0-7])+|0(?:_?0)*|[1-9](?:_?[0-9])*)";
    let number = format!("(?:{imaginary}|{float}|{int})");
    let operators = OPERATORS
        .iter()
        .map(|op| regex::escape(op))
        .collect::<Vec<_>>()
        .join("|");
    let single = format!(r#"{prefix}'[^\n'\\]*(?:\\.[^\n'\\]*)*(?:'|\\\r?\n)"#);
    let double = format!(r#"{prefix}"[^\n"\\]*(?:\\.[^\n"\\]*)*(?:"|\\\r?\n)"#);

    format!(
        r#"^[ \f\t]*(\\\r?\n|\z|#[^\r\n]*|{prefix}(?:'''|""")|{number}|\r?\n|{operators}|{single}|{double}|\w+)"#
    )
}

/// Tokenize Python source text.
pub fn tokenize(source: &str) -> Result<Vec<Token>, TokenizeError> {
    Tokenizer::new(source).run()
}

/// A string literal spanning several physical lines.
struct ContinuedString {
    text: String,
    start: Position,
    /// Closing delimiter: one or three quote characters
    quote: &'static str,
    /// Single-quoted literal that continues only through a trailing backslash
    needs_continuation: bool,
}

struct Tokenizer<'a> {
    lines: std::str::SplitInclusive<'a, char>,
    tokens: Vec<Token>,
    indents: Vec<usize>,
    paren_level: isize,
    continued: bool,
    pending: Option<ContinuedString>,
}

impl<'a> Tokenizer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: source.split_inclusive('\n'),
            tokens: Vec::new(),
            indents: vec![0],
            paren_level: 0,
            continued: false,
            pending: None,
        }
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>, start: Position, end: Position) {
        self.tokens.push(Token::new(kind, text, start, end));
    }

    fn run(mut self) -> Result<Vec<Token>, TokenizeError> {
        let mut lnum = 0;
        let mut line: &str = "";
        let mut last_line: &str;

        loop {
            last_line = line;
            line = self.lines.next().unwrap_or("");
            lnum += 1;
            let max = line.len();
            let mut pos = 0;

            if let Some(mut pending) = self.pending.take() {
                if line.is_empty() {
                    return Err(TokenizeError::UnterminatedString(pending.start));
                }
                if let Some(end) = find_string_end(line, pending.quote) {
                    pending.text.push_str(&line[..end]);
                    let end_pos = Position::new(lnum, char_col(line, end));
                    self.push(TokenKind::String, pending.text, pending.start, end_pos);
                    pos = end;
                } else if pending.needs_continuation
                    && !line.ends_with("\\\n")
                    && !line.ends_with("\\\r\n")
                {
                    pending.text.push_str(line);
                    let end_pos = Position::new(lnum, char_col(line, max));
                    self.push(TokenKind::ErrorToken, pending.text, pending.start, end_pos);
                    continue;
                } else {
                    pending.text.push_str(line);
                    self.pending = Some(pending);
                    continue;
                }
            } else if self.paren_level == 0 && !self.continued {
                if line.is_empty() {
                    break;
                }

                let mut column = 0;
                for byte in line.bytes() {
                    match byte {
                        b' ' => column += 1,
                        b'\t' => column = (column / TAB_SIZE + 1) * TAB_SIZE,
                        b'\x0c' => column = 0,
                        _ => break,
                    }
                    pos += 1;
                }
                if pos == max {
                    break;
                }

                let rest = &line[pos..];
                if rest.starts_with(['#', '\r', '\n']) {
                    if rest.starts_with('#') {
                        let comment = rest.trim_end_matches(['\r', '\n']);
                        let start = Position::new(lnum, pos);
                        let end = Position::new(lnum, pos + comment.chars().count());
                        self.push(TokenKind::Comment, comment, start, end);
                        pos += comment.len();
                    }
                    let start = Position::new(lnum, char_col(line, pos));
                    let end = Position::new(lnum, char_col(line, max));
                    self.push(TokenKind::Nl, &line[pos..], start, end);
                    continue;
                }

                let current = self.indents.last().copied().unwrap_or(0);
                if column > current {
                    self.indents.push(column);
                    let indent = &line[..pos];
                    self.push(
                        TokenKind::Indent,
                        indent,
                        Position::new(lnum, 0),
                        Position::new(lnum, pos),
                    );
                }
                while column < self.indents.last().copied().unwrap_or(0) {
                    if !self.indents.contains(&column) {
                        return Err(TokenizeError::InconsistentDedent { line: lnum });
                    }
                    self.indents.pop();
                    let at = Position::new(lnum, pos);
                    self.push(TokenKind::Dedent, "", at, at);
                }
            } else {
                if line.is_empty() {
                    return Err(TokenizeError::UnterminatedStatement(Position::new(lnum, 0)));
                }
                self.continued = false;
            }

            pos = self.scan_line(line, lnum, pos);
            debug_assert!(pos >= max || self.pending.is_some());
        }

        if !last_line.is_empty()
            && !last_line.ends_with(['\r', '\n'])
            && !last_line.trim().starts_with('#')
        {
            let width = last_line.chars().count();
            self.push(
                TokenKind::Newline,
                "",
                Position::new(lnum - 1, width),
                Position::new(lnum - 1, width + 1),
            );
        }
        let eof = Position::new(lnum, 0);
        for _ in 1..self.indents.len() {
            self.push(TokenKind::Dedent, "", eof, eof);
        }
        self.push(TokenKind::EndMarker, "", eof, eof);

        Ok(self.tokens)
    }

    /// Emit the tokens of one physical line starting at byte `pos`.
    ///
    /// Returns the byte offset where scanning stopped; stopping early means a
    /// multi-line string literal is now pending.
    fn scan_line(&mut self, line: &str, lnum: usize, mut pos: usize) -> usize {
        let max = line.len();

        while pos < max {
            let Some(group) = PSEUDO_TOKEN
                .captures(&line[pos..])
                .and_then(|caps| caps.get(1))
            else {
                let ch = line[pos..].chars().next().unwrap_or(' ');
                let col = char_col(line, pos);
                self.push(
                    TokenKind::ErrorToken,
                    ch.to_string(),
                    Position::new(lnum, col),
                    Position::new(lnum, col + 1),
                );
                pos += ch.len_utf8();
                continue;
            };

            let start = pos + group.start();
            let end = pos + group.end();
            pos = end;
            if start == end {
                continue;
            }

            let token = &line[start..end];
            let spos = Position::new(lnum, char_col(line, start));
            let epos = Position::new(lnum, char_col(line, end));
            let initial = token.chars().next().unwrap_or(' ');

            if initial.is_ascii_digit() || (initial == '.' && token != "." && token != "...") {
                self.push(TokenKind::Number, token, spos, epos);
            } else if initial == '\r' || initial == '\n' {
                let kind = if self.paren_level > 0 {
                    TokenKind::Nl
                } else {
                    TokenKind::Newline
                };
                self.push(kind, token, spos, epos);
            } else if initial == '#' {
                self.push(TokenKind::Comment, token, spos, epos);
            } else if let Some(quote) = triple_quote(token) {
                match find_string_end(&line[pos..], quote) {
                    Some(offset) => {
                        pos += offset;
                        let epos = Position::new(lnum, char_col(line, pos));
                        self.push(TokenKind::String, &line[start..pos], spos, epos);
                    }
                    None => {
                        self.pending = Some(ContinuedString {
                            text: line[start..].to_string(),
                            start: spos,
                            quote,
                            needs_continuation: false,
                        });
                        return max;
                    }
                }
            } else if let Some(quote) = single_quote(token) {
                if token.ends_with('\n') {
                    self.pending = Some(ContinuedString {
                        text: line[start..].to_string(),
                        start: spos,
                        quote,
                        needs_continuation: true,
                    });
                    return max;
                }
                self.push(TokenKind::String, token, spos, epos);
            } else if initial.is_alphabetic() || initial == '_' {
                self.push(TokenKind::Name, token, spos, epos);
            } else if initial == '\\' {
                self.continued = true;
            } else {
                match initial {
                    '(' | '[' | '{' => self.paren_level += 1,
                    ')' | ']' | '}' => self.paren_level -= 1,
                    _ => {}
                }
                self.push(TokenKind::Op, token, spos, epos);
            }
        }

        pos
    }
}

/// Character column of byte offset `byte` within `line`.
fn char_col(line: &str, byte: usize) -> usize {
    line[..byte].chars().count()
}

/// Split a string-literal prefix (`rb`, `f`, ...) from the quoted part.
fn split_prefix(token: &str) -> (&str, &str) {
    let split = token
        .find(|c: char| c == '\'' || c == '"')
        .unwrap_or(token.len());
    token.split_at(split)
}

/// Closing delimiter when `token` opens a triple-quoted literal.
fn triple_quote(token: &str) -> Option<&'static str> {
    match split_prefix(token) {
        (prefix, "'''") if prefix.len() <= 2 => Some("'''"),
        (prefix, "\"\"\"") if prefix.len() <= 2 => Some("\"\"\""),
        _ => None,
    }
}

/// Closing delimiter when `token` is a single-quoted literal.
fn single_quote(token: &str) -> Option<&'static str> {
    let (prefix, rest) = split_prefix(token);
    if prefix.len() > 2 || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if rest.starts_with('\'') {
        Some("'")
    } else if rest.starts_with('"') {
        Some("\"")
    } else {
        None
    }
}

/// Byte offset just past the first unescaped `quote` in `text`.
fn find_string_end(text: &str, quote: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let quote = quote.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
        } else if bytes[i..].starts_with(quote) {
            return Some(i + quote.len());
        } else {
            i += 1;
        }
    }
    None
}
