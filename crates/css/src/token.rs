//! Selector tokenizer (the token subset of CSS Syntax Level 3 that selectors use).

use std::fmt;

use crate::error::SelectorError;

#[derive(Debug, Clone, PartialEq)]
pub enum CssToken {
    Ident(String),
    /// Name immediately followed by `(`; the paren is consumed.
    Function(String),
    Hash { value: String, is_id: bool },
    String(String),
    /// Numeric literal, kept as written (sign included) for `an+b` parsing.
    Number(String),
    Dimension { number: String, unit: String },
    Whitespace,
    Colon,
    Comma,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Delim(char),
}

impl fmt::Display for CssToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssToken::Ident(name) => write!(f, "{name}"),
            CssToken::Function(name) => write!(f, "{name}("),
            CssToken::Hash { value, .. } => write!(f, "#{value}"),
            CssToken::String(value) => write!(f, "{value:?}"),
            CssToken::Number(repr) => write!(f, "{repr}"),
            CssToken::Dimension { number, unit } => write!(f, "{number}{unit}"),
            CssToken::Whitespace => write!(f, " "),
            CssToken::Colon => write!(f, ":"),
            CssToken::Comma => write!(f, ","),
            CssToken::LBracket => write!(f, "["),
            CssToken::RBracket => write!(f, "]"),
            CssToken::LParen => write!(f, "("),
            CssToken::RParen => write!(f, ")"),
            CssToken::Delim(c) => write!(f, "{c}"),
        }
    }
}

/// Tokenize a selector string. Comments are dropped.
pub fn tokenize(input: &str) -> Result<Vec<CssToken>, SelectorError> {
    CssTokenizer::new(input).tokenize_all()
}

pub struct CssTokenizer {
    input: Vec<char>,
    pos: usize,
}

impl CssTokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    pub fn tokenize_all(&mut self) -> Result<Vec<CssToken>, SelectorError> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token()? {
            tokens.push(tok);
        }
        Ok(tokens)
    }

    /// Consume and return the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<CssToken>, SelectorError> {
        self.consume_comments()?;

        let Some(ch) = self.peek() else {
            return Ok(None);
        };

        if is_whitespace(ch) {
            self.consume_whitespace();
            return Ok(Some(CssToken::Whitespace));
        }

        if ch == '"' || ch == '\'' {
            return self.consume_string(ch).map(Some);
        }

        if ch == '#' {
            self.pos += 1;
            if self.peek().is_some_and(is_name_char) || self.starts_valid_escape_at(self.pos) {
                let is_id = self.would_start_ident_at(self.pos);
                let value = self.consume_name();
                return Ok(Some(CssToken::Hash { value, is_id }));
            }
            return Ok(Some(CssToken::Delim('#')));
        }

        if self.starts_number_at(self.pos) {
            return Ok(Some(self.consume_numeric()));
        }

        if self.would_start_ident_at(self.pos) {
            return Ok(Some(self.consume_ident_like()));
        }

        if ch == '\\' {
            return Err(SelectorError::Unterminated("escape"));
        }

        self.pos += 1;
        Ok(Some(match ch {
            ':' => CssToken::Colon,
            ',' => CssToken::Comma,
            '[' => CssToken::LBracket,
            ']' => CssToken::RBracket,
            '(' => CssToken::LParen,
            ')' => CssToken::RParen,
            other => CssToken::Delim(other),
        }))
    }

    // --- Helper methods ---

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn char_at(&self, idx: usize) -> Option<char> {
        self.input.get(idx).copied()
    }

    fn consume_comments(&mut self) -> Result<(), SelectorError> {
        while self.peek() == Some('/') && self.char_at(self.pos + 1) == Some('*') {
            self.pos += 2;
            loop {
                match (self.peek(), self.char_at(self.pos + 1)) {
                    (Some('*'), Some('/')) => {
                        self.pos += 2;
                        break;
                    }
                    (Some(_), _) => self.pos += 1,
                    (None, _) => return Err(SelectorError::Unterminated("comment")),
                }
            }
        }
        Ok(())
    }

    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }
    }

    fn consume_string(&mut self, quote: char) -> Result<CssToken, SelectorError> {
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(ch) = self.peek() else {
                return Err(SelectorError::Unterminated("string"));
            };
            self.pos += 1;
            match ch {
                c if c == quote => return Ok(CssToken::String(value)),
                '\n' => return Err(SelectorError::Unterminated("string")),
                '\\' => match self.peek() {
                    None => return Err(SelectorError::Unterminated("string")),
                    Some('\n') => self.pos += 1,
                    Some(_) => value.push(self.consume_escape()),
                },
                c => value.push(c),
            }
        }
    }

    /// Consume the code point after a backslash (the backslash is already consumed).
    fn consume_escape(&mut self) -> char {
        let Some(ch) = self.peek() else {
            return '\u{FFFD}';
        };
        self.pos += 1;
        if !ch.is_ascii_hexdigit() {
            return ch;
        }

        let mut hex = String::from(ch);
        while hex.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            hex.push(self.input[self.pos]);
            self.pos += 1;
        }
        if self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }
        match u32::from_str_radix(&hex, 16) {
            Ok(0) | Err(_) => '\u{FFFD}',
            Ok(cp) => char::from_u32(cp).unwrap_or('\u{FFFD}'),
        }
    }

    fn starts_valid_escape_at(&self, idx: usize) -> bool {
        self.char_at(idx) == Some('\\') && self.char_at(idx + 1).is_some_and(|c| c != '\n')
    }

    fn would_start_ident_at(&self, start: usize) -> bool {
        match self.char_at(start) {
            Some('-') => match self.char_at(start + 1) {
                Some(next) if is_name_start_char(next) || next == '-' => true,
                Some('\\') => self.starts_valid_escape_at(start + 1),
                _ => false,
            },
            Some('\\') => self.starts_valid_escape_at(start),
            Some(ch) => is_name_start_char(ch),
            None => false,
        }
    }

    fn starts_number_at(&self, start: usize) -> bool {
        let digit_at = |i: usize| self.char_at(i).is_some_and(|c| c.is_ascii_digit());
        match self.char_at(start) {
            Some(c) if c.is_ascii_digit() => true,
            Some('+' | '-') => {
                digit_at(start + 1) || (self.char_at(start + 1) == Some('.') && digit_at(start + 2))
            }
            Some('.') => digit_at(start + 1),
            _ => false,
        }
    }

    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if is_name_char(ch) {
                name.push(ch);
                self.pos += 1;
            } else if self.starts_valid_escape_at(self.pos) {
                self.pos += 1;
                name.push(self.consume_escape());
            } else {
                break;
            }
        }
        name
    }

    fn consume_numeric(&mut self) -> CssToken {
        let mut number = String::new();
        if let Some(sign @ ('+' | '-')) = self.peek() {
            number.push(sign);
            self.pos += 1;
        }
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            number.push(c);
            self.pos += 1;
        }
        if self.peek() == Some('.') && self.char_at(self.pos + 1).is_some_and(|c| c.is_ascii_digit()) {
            number.push('.');
            self.pos += 1;
            while let Some(c) = self.peek().filter(char::is_ascii_digit) {
                number.push(c);
                self.pos += 1;
            }
        }

        if self.would_start_ident_at(self.pos) {
            let unit = self.consume_name();
            return CssToken::Dimension { number, unit };
        }
        CssToken::Number(number)
    }

    fn consume_ident_like(&mut self) -> CssToken {
        let name = self.consume_name();
        if self.peek() == Some('(') {
            self.pos += 1;
            return CssToken::Function(name);
        }
        CssToken::Ident(name)
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

fn is_name_start_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || !ch.is_ascii()
}

fn is_name_char(ch: char) -> bool {
    is_name_start_char(ch) || ch.is_ascii_digit() || ch == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(input: &str) -> Vec<CssToken> {
        tokenize(input).unwrap()
    }

    #[test]
    fn compound_selector_tokens() {
        assert_eq!(
            toks("div.intro#main"),
            vec![
                CssToken::Ident("div".into()),
                CssToken::Delim('.'),
                CssToken::Ident("intro".into()),
                CssToken::Hash { value: "main".into(), is_id: true },
            ]
        );
    }

    #[test]
    fn combinators_are_delims() {
        assert_eq!(
            toks("a > b + c ~ d"),
            vec![
                CssToken::Ident("a".into()),
                CssToken::Whitespace,
                CssToken::Delim('>'),
                CssToken::Whitespace,
                CssToken::Ident("b".into()),
                CssToken::Whitespace,
                CssToken::Delim('+'),
                CssToken::Whitespace,
                CssToken::Ident("c".into()),
                CssToken::Whitespace,
                CssToken::Delim('~'),
                CssToken::Whitespace,
                CssToken::Ident("d".into()),
            ]
        );
    }

    #[test]
    fn function_and_nth_arguments() {
        assert_eq!(
            toks(":nth-child(2n+1)"),
            vec![
                CssToken::Colon,
                CssToken::Function("nth-child".into()),
                CssToken::Dimension { number: "2".into(), unit: "n".into() },
                CssToken::Number("+1".into()),
                CssToken::RParen,
            ]
        );
        assert_eq!(
            toks("(-n-3)"),
            vec![CssToken::LParen, CssToken::Ident("-n-3".into()), CssToken::RParen]
        );
    }

    #[test]
    fn hex_escapes_decode_in_names() {
        // `#\31 23` is the escaped form of the id "123".
        assert_eq!(
            toks(r"#\31 23"),
            vec![CssToken::Hash { value: "123".into(), is_id: true }]
        );
        assert_eq!(toks(r"#a\ b"), vec![CssToken::Hash { value: "a b".into(), is_id: true }]);
        assert_eq!(toks(r".\31 a"), vec![CssToken::Delim('.'), CssToken::Ident("1a".into())]);
        assert_eq!(toks(r".\0 x"), vec![CssToken::Delim('.'), CssToken::Ident("\u{FFFD}x".into())]);
    }

    #[test]
    fn hash_with_leading_digit_is_not_an_id() {
        assert_eq!(toks("#1a"), vec![CssToken::Hash { value: "1a".into(), is_id: false }]);
    }

    #[test]
    fn strings_and_comments() {
        assert_eq!(
            toks(r#"[title="a \"b\""]/* x */"#),
            vec![
                CssToken::LBracket,
                CssToken::Ident("title".into()),
                CssToken::Delim('='),
                CssToken::String(r#"a "b""#.into()),
                CssToken::RBracket,
            ]
        );
    }

    #[test]
    fn unterminated_inputs_are_errors() {
        assert_eq!(tokenize("[a='b"), Err(SelectorError::Unterminated("string")));
        assert_eq!(tokenize("a /* open"), Err(SelectorError::Unterminated("comment")));
        assert_eq!(tokenize("a\\"), Err(SelectorError::Unterminated("escape")));
    }
}
