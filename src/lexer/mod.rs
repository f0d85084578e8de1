use crate::lexer::cursor::Cursor;
use crate::span::{Idx, Span};

pub mod cursor;

/// Source token with its location.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// Text of the token within `src`.
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.span.as_range()]
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// Any run of non-whitespace; classified later against the symbol table.
    Word,
    Comment,
    Whitespace,
    Newline,
    Eof,
}

/// Test if a character separates words within a line.
pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

/// Both `;` and `//` start a comment running to end of line.
fn is_comment_start(first: char, second: char) -> bool {
    first == ';' || (first == '/' && second == '/')
}

pub fn tokenize(input: &str) -> impl Iterator<Item = Token> + '_ {
    let mut cursor = Cursor::new(input);
    std::iter::from_fn(move || {
        let token = cursor.advance_token();
        if token.kind != TokenKind::Eof {
            Some(token)
        } else {
            None
        }
    })
}

/// Split source into lines of word tokens. Comments and whitespace are dropped but
/// every physical line is kept, so blank lines come back empty.
pub fn split_lines(input: &str) -> Vec<Vec<Token>> {
    let mut lines = Vec::new();
    let mut line = Vec::new();
    for token in tokenize(input) {
        match token.kind {
            TokenKind::Word => line.push(token),
            TokenKind::Newline => lines.push(std::mem::take(&mut line)),
            TokenKind::Comment | TokenKind::Whitespace | TokenKind::Eof => {}
        }
    }
    lines.push(line);
    lines
}

impl Cursor<'_> {
    pub fn advance_token(&mut self) -> Token {
        let (first, second) = (self.first(), self.second());
        let kind = match self.bump() {
            None => TokenKind::Eof,
            Some(_) if is_comment_start(first, second) => {
                self.take_while(|c| c != '\n');
                TokenKind::Comment
            }
            Some('\n') => TokenKind::Newline,
            Some(c) if is_whitespace(c) => {
                self.take_while(is_whitespace);
                TokenKind::Whitespace
            }
            Some(_) => {
                while !self.is_eof() {
                    let (c, next) = (self.first(), self.second());
                    if is_whitespace(c) || c == '\n' || is_comment_start(c, next) {
                        break;
                    }
                    self.bump();
                }
                TokenKind::Word
            }
        };
        let span = Span::new(Idx(self.token_start()), self.pos_in_token());
        self.reset_pos();
        Token::new(kind, span)
    }
}
