use miette::Result;

use crate::{
    error,
    lexer::{tokenize, TokenKind},
    memory::Memory,
    symbol::{Word, MEMORY_SIZE},
};

/// Parse a numeric program image: decimal words separated by whitespace or newlines.
pub fn parse_image(src: &str) -> Result<Vec<Word>> {
    let words = tokenize(src)
        .filter(|tok| tok.kind == TokenKind::Word)
        .map(|tok| {
            let text = tok.text(src);
            text.parse::<u16>()
                .ok()
                .filter(|_| text.chars().all(|c| c.is_ascii_digit()))
                .and_then(Word::new)
                .ok_or_else(|| error::load_invalid_word(src, tok.span))
        })
        .collect::<Result<Vec<_>>>()?;

    if words.len() > MEMORY_SIZE {
        return Err(error::load_too_large(words.len()));
    }
    Ok(words)
}

/// Parse an image and place it in fresh memory.
pub fn load(src: &str) -> Result<Memory> {
    Memory::from_image(&parse_image(src)?)
}

/// Render an image in the format accepted by [`parse_image`].
pub fn format_image(words: &[Word]) -> String {
    let mut out = words
        .iter()
        .map(Word::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    out.push('\n');
    out
}
