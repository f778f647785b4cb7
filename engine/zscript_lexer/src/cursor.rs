//! Byte cursor over source text.
//!
//! The cursor advances byte-by-byte and reports `0x00` past the end of
//! input, so scanning loops terminate on the virtual sentinel without a
//! separate bounds check at every dispatch site. `is_eof` compares positions,
//! not bytes, so an interior null byte in source never reads as end of
//! input.

/// A cheap, copyable read position over source bytes.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    /// The byte at the current position, or `0x00` at EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.byte_at(self.pos)
    }

    /// The byte one position ahead, or `0x00`.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.byte_at(self.pos + 1)
    }

    #[inline]
    fn byte_at(&self, pos: u32) -> u8 {
        self.src.as_bytes().get(pos as usize).copied().unwrap_or(0)
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    /// Advance past one full UTF-8 character, using the leading byte to
    /// determine its width.
    #[inline]
    pub fn advance_char(&mut self) {
        let width = match self.current() {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        self.pos = (self.pos + width).min(self.src.len() as u32);
    }

    /// The character at the current position, for error reporting.
    pub fn current_char(&self) -> char {
        self.src
            .get(self.pos as usize..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or('\0')
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos as usize >= self.src.len()
    }

    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Extract a source substring. `start..end` must lie on character
    /// boundaries, which holds for all token boundaries the scanner tracks.
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        &self.src[start as usize..end as usize]
    }

    /// Advance while `pred` holds for the current byte. `pred(0)` must be
    /// false so the loop stops at EOF.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Jump to the next `\n` or EOF. Used to skip comment bodies and the
    /// shebang line.
    pub fn eat_until_newline_or_eof(&mut self) {
        let remaining = &self.src.as_bytes()[(self.pos as usize).min(self.src.len())..];
        match memchr::memchr(b'\n', remaining) {
            Some(offset) => self.pos += offset as u32,
            None => self.pos = self.src.len() as u32,
        }
    }
}
