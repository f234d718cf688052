//! Tokenizer for LaTeX math input.

use crate::error::ParseError;

/// Kinds of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A decimal literal such as `12` or `0.25`.
    Number(String),
    /// A single ASCII letter.
    Letter(char),
    /// A control sequence without its backslash, e.g. `frac`.
    Command(String),
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `^`
    Caret,
    /// `_`
    Underscore,
    /// `=`
    Equals,
    /// `|`
    Pipe,
    /// `,`
    Comma,
}

/// A token with its byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What was read.
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub pos: usize,
}

/// Spacing commands that produce no token.
const SPACING_COMMANDS: [&str; 2] = ["quad", "qquad"];

/// Splits the input into tokens.
///
/// # Errors
///
/// Returns an error on characters that have no meaning in math mode.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let mut text = String::new();
            let mut seen_dot = false;
            while let Some(&(_, d)) = chars.peek() {
                if d.is_ascii_digit() {
                    text.push(d);
                } else if d == '.' && !seen_dot {
                    seen_dot = true;
                    text.push(d);
                } else {
                    break;
                }
                chars.next();
            }
            if text == "." {
                return Err(ParseError::new(pos, "unexpected '.'"));
            }
            tokens.push(Token {
                kind: TokenKind::Number(text),
                pos,
            });
            continue;
        }

        if c.is_ascii_alphabetic() {
            chars.next();
            tokens.push(Token {
                kind: TokenKind::Letter(c),
                pos,
            });
            continue;
        }

        if c == '\\' {
            chars.next();
            let mut name = String::new();
            while let Some(&(_, d)) = chars.peek() {
                if d.is_ascii_alphabetic() {
                    name.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                let Some((_, escaped)) = chars.next() else {
                    return Err(ParseError::new(pos, "dangling backslash"));
                };
                let kind = match escaped {
                    ',' | ':' | ';' | '!' | ' ' => continue,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '|' => TokenKind::Pipe,
                    other => {
                        return Err(ParseError::new(
                            pos,
                            format!("unsupported escape '\\{other}'"),
                        ))
                    }
                };
                tokens.push(Token { kind, pos });
                continue;
            }
            if SPACING_COMMANDS.contains(&name.as_str()) {
                continue;
            }
            tokens.push(Token {
                kind: TokenKind::Command(name),
                pos,
            });
            continue;
        }

        let kind = match c {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '+' => TokenKind::Plus,
            '-' | '\u{2212}' => TokenKind::Minus,
            '*' | '\u{00b7}' | '\u{00d7}' => TokenKind::Star,
            '/' | '\u{00f7}' => TokenKind::Slash,
            '^' => TokenKind::Caret,
            '_' => TokenKind::Underscore,
            '=' => TokenKind::Equals,
            '|' => TokenKind::Pipe,
            ',' => TokenKind::Comma,
            other => {
                return Err(ParseError::new(
                    pos,
                    format!("unexpected character '{other}'"),
                ))
            }
        };
        chars.next();
        tokens.push(Token { kind, pos });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_numbers_and_letters() {
        assert_eq!(
            kinds("2x + 0.5"),
            vec![
                TokenKind::Number("2".into()),
                TokenKind::Letter('x'),
                TokenKind::Plus,
                TokenKind::Number("0.5".into()),
            ]
        );
    }

    #[test]
    fn test_commands() {
        assert_eq!(
            kinds(r"\frac{1}{x}"),
            vec![
                TokenKind::Command("frac".into()),
                TokenKind::LBrace,
                TokenKind::Number("1".into()),
                TokenKind::RBrace,
                TokenKind::LBrace,
                TokenKind::Letter('x'),
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_spacing_is_skipped() {
        assert_eq!(
            kinds(r"x\,\quad y"),
            vec![TokenKind::Letter('x'), TokenKind::Letter('y')]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("x + 12").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.pos).collect();
        assert_eq!(positions, vec![0, 2, 4]);
    }

    #[test]
    fn test_rejects_unknown_characters() {
        let err = tokenize("x # y").unwrap_err();
        assert_eq!(err.position, 2);
    }
}
