//! DOT tokenizer.
//!
//! Produces positioned tokens from decoded text. Quoted and HTML strings
//! keep their delimiters and escapes verbatim; comments, whitespace and
//! `#` preprocessor lines are dropped.

use crate::error::{DotError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare name, keywords included.
    Name(String),
    Numeral(String),
    /// `"..."` including the quotes.
    Quoted(String),
    /// `<...>` including the outer angle brackets.
    Html(String),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Equals,
    Colon,
    Plus,
    /// `->`
    Arrow,
    /// `--`
    Line,
    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Name(s) | TokenKind::Numeral(s) | TokenKind::Quoted(s) | TokenKind::Html(s) => {
                format!("'{s}'")
            }
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::Semi => "';'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Equals => "'='".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Arrow => "'->'".to_string(),
            TokenKind::Line => "'--'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }

    /// True for a bare name equal (case-insensitively) to `keyword`.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, TokenKind::Name(s) if s.eq_ignore_ascii_case(keyword))
    }
}

/// A token with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub offset: usize,
    /// 1-based line
    pub line: usize,
    /// 1-based column, in characters
    pub column: usize,
}

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    /// Only whitespace seen since the last newline.
    line_start: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            line_start: true,
        }
    }

    /// Tokenize the whole input; the last token is always `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.line_start = true;
        } else {
            self.column += 1;
            if !c.is_whitespace() {
                self.line_start = false;
            }
        }
        Some(c)
    }

    fn error(&self, line: usize, column: usize, message: impl Into<String>) -> DotError {
        DotError::parse(line, column, message)
    }

    fn skip_trivia(&mut self) -> Result<()> {
        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '#' if self.line_start => self.skip_line(),
                '/' if self.peek_second() == Some('/') => self.skip_line(),
                '/' if self.peek_second() == Some('*') => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => return Err(self.error(line, column, "unterminated comment")),
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;
        let (offset, line, column) = (self.pos, self.line, self.column);
        let token = |kind| Token {
            kind,
            offset,
            line,
            column,
        };

        let Some(c) = self.peek() else {
            return Ok(token(TokenKind::Eof));
        };

        let kind = match c {
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ';' => self.single(TokenKind::Semi),
            ',' => self.single(TokenKind::Comma),
            '=' => self.single(TokenKind::Equals),
            ':' => self.single(TokenKind::Colon),
            '+' => self.single(TokenKind::Plus),
            '"' => self.quoted(line, column)?,
            '<' => self.html(line, column)?,
            '-' => match self.peek_second() {
                Some('>') => {
                    self.bump();
                    self.bump();
                    TokenKind::Arrow
                }
                Some('-') => {
                    self.bump();
                    self.bump();
                    TokenKind::Line
                }
                Some(d) if d.is_ascii_digit() || d == '.' => self.numeral(),
                _ => return Err(self.error(line, column, "unexpected character '-'")),
            },
            '.' if self.peek_second().is_some_and(|d| d.is_ascii_digit()) => self.numeral(),
            d if d.is_ascii_digit() => self.numeral(),
            c if c.is_ascii_alphabetic() || c == '_' || !c.is_ascii() => self.name(),
            other => return Err(self.error(line, column, format!("unexpected character {other:?}"))),
        };
        Ok(token(kind))
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn name(&mut self) -> TokenKind {
        let text = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii());
        TokenKind::Name(text.to_string())
    }

    fn numeral(&mut self) -> TokenKind {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        self.take_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') {
            self.bump();
            self.take_while(|c| c.is_ascii_digit());
        }
        TokenKind::Numeral(self.src[start..self.pos].to_string())
    }

    fn quoted(&mut self, line: usize, column: usize) -> Result<TokenKind> {
        let start = self.pos;
        self.bump();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => {
                    // Escapes are kept as written.
                    self.bump();
                }
                Some(_) => {}
                None => return Err(self.error(line, column, "unterminated quoted string")),
            }
        }
        Ok(TokenKind::Quoted(self.src[start..self.pos].to_string()))
    }

    fn html(&mut self, line: usize, column: usize) -> Result<TokenKind> {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.bump() {
                Some('<') => depth += 1,
                Some('>') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Some(_) => {}
                None => return Err(self.error(line, column, "unterminated HTML string")),
            }
        }
        Ok(TokenKind::Html(self.src[start..self.pos].to_string()))
    }
}

/// Tokenize `src`.
pub fn tokenize(src: &str) -> Result<Vec<Token>> {
    Lexer::new(src).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn name(s: &str) -> TokenKind {
        TokenKind::Name(s.to_string())
    }

    #[test]
    fn test_punctuation_and_operators() {
        assert_eq!(
            kinds("a -> b -- c [x=1, y; z] {}:+"),
            vec![
                name("a"),
                TokenKind::Arrow,
                name("b"),
                TokenKind::Line,
                name("c"),
                TokenKind::LBracket,
                name("x"),
                TokenKind::Equals,
                TokenKind::Numeral("1".into()),
                TokenKind::Comma,
                name("y"),
                TokenKind::Semi,
                name("z"),
                TokenKind::RBracket,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Colon,
                TokenKind::Plus,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_arrow_without_spaces() {
        assert_eq!(kinds("a->b"), vec![name("a"), TokenKind::Arrow, name("b"), TokenKind::Eof]);
    }

    #[test]
    fn test_numerals() {
        assert_eq!(
            kinds("1 -2.5 .5 3."),
            vec![
                TokenKind::Numeral("1".into()),
                TokenKind::Numeral("-2.5".into()),
                TokenKind::Numeral(".5".into()),
                TokenKind::Numeral("3.".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_keeps_quotes_and_escapes() {
        assert_eq!(
            kinds(r#""say \"hi\"" "node""#),
            vec![
                TokenKind::Quoted(r#""say \"hi\"""#.into()),
                TokenKind::Quoted("\"node\"".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_html_nesting() {
        assert_eq!(
            kinds("<<b>bold</b>> x"),
            vec![TokenKind::Html("<<b>bold</b>>".into()), name("x"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_comments_discarded() {
        let src = "# preprocessor line\na // trailing\n/* block\ncomment */ b";
        assert_eq!(kinds(src), vec![name("a"), name("b"), TokenKind::Eof]);
    }

    #[test]
    fn test_hash_inside_line_is_an_error() {
        let err = tokenize("a # b").unwrap_err();
        assert!(matches!(err, DotError::Parse { line: 1, column: 3, .. }));
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("digraph {\n  a -> b\n}").unwrap();
        let a = &tokens[2];
        assert_eq!(a.kind, name("a"));
        assert_eq!((a.line, a.column, a.offset), (2, 3, 12));
    }

    #[test]
    fn test_unicode_names() {
        assert_eq!(kinds("añnó"), vec![name("añnó"), TokenKind::Eof]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("a [label=\"oops]").unwrap_err();
        match err {
            DotError::Parse { line, column, message } => {
                assert_eq!((line, column), (1, 10));
                assert!(message.contains("unterminated"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_comment() {
        assert!(tokenize("a /* never closed").unwrap_err().is_parse());
    }
}
