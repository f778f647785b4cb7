//! Line/column lookup over source text.
//!
//! Pre-computes line start offsets once, then answers span-to-position
//! queries by binary search. The renderer uses it for the `--> file:line:col`
//! header and for slicing the offending line out of the source.

use memchr::memchr_iter;

/// Pre-computed line offset table for a single source buffer.
#[derive(Clone, Debug)]
pub struct LineIndex {
    /// Byte offset of each line start. `offsets[0]` is always 0.
    offsets: Vec<u32>,
    /// Total source length in bytes.
    len: u32,
}

impl LineIndex {
    /// Scan the source once, recording every line start.
    pub fn new(source: &str) -> Self {
        let mut offsets = vec![0u32];
        offsets.extend(memchr_iter(b'\n', source.as_bytes()).map(|i| (i + 1) as u32));
        LineIndex {
            offsets,
            len: source.len() as u32,
        }
    }

    /// 1-based line number containing the byte offset.
    pub fn line(&self, offset: u32) -> u32 {
        let idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        idx as u32 + 1
    }

    /// 1-based (line, column) for a byte offset. Column counts characters,
    /// not bytes, from the start of the line.
    pub fn line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line(offset);
        let start = self.line_start(line) as usize;
        let end = (offset as usize).min(source.len());
        let col = source[start..end].chars().count() as u32 + 1;
        (line, col)
    }

    /// Byte offset where the given 1-based line starts.
    fn line_start(&self, line: u32) -> u32 {
        self.offsets
            .get(line.saturating_sub(1) as usize)
            .copied()
            .unwrap_or(0)
    }

    /// The text of a 1-based line, without its trailing newline.
    pub fn line_text<'src>(&self, source: &'src str, line: u32) -> &'src str {
        let start = self.line_start(line) as usize;
        let end = self
            .offsets
            .get(line as usize)
            .map_or(self.len as usize, |next| {
                // Drop the '\n' (and a preceding '\r' if present).
                let mut end = (*next as usize).saturating_sub(1);
                if source.as_bytes().get(end.wrapping_sub(1)) == Some(&b'\r') {
                    end -= 1;
                }
                end
            });
        &source[start.min(source.len())..end.min(source.len())]
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> u32 {
        self.offsets.len() as u32
    }
}
