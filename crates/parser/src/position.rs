use std::fmt;
use std::sync::Arc;

/// Location of a lexeme or node in the source text.
///
/// `offset` is the absolute byte offset from the start of the input and
/// `line` is 1-based. Offsets are stored as `u32` to keep nodes small, which
/// limits inputs to 4 GiB; larger values are clamped rather than wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub filename: Option<Arc<str>>,
}

impl Position {
    #[inline]
    pub fn new(offset: usize, line: usize, filename: Option<Arc<str>>) -> Self {
        Self {
            offset: clamp_u32(offset),
            line: clamp_u32(line),
            filename,
        }
    }

    #[inline]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(name) => write!(f, "{name}:{}:{}", self.line, self.offset),
            None => write!(f, "{}:{}", self.line, self.offset),
        }
    }
}

#[inline]
const fn clamp_u32(x: usize) -> u32 {
    if x > u32::MAX as usize {
        u32::MAX
    } else {
        x as u32
    }
}

/// Byte offsets of every `\n` in a source, for offset -> line lookups.
#[derive(Debug, Clone, Default)]
pub(crate) struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(src: &str) -> Self {
        Self {
            newlines: memchr::memchr_iter(b'\n', src.as_bytes()).collect(),
        }
    }

    /// 1-based line containing `offset`. A newline belongs to the line it ends.
    #[inline]
    pub(crate) fn line_of(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&nl| nl < offset) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_with_and_without_filename() {
        let p = Position::new(12, 3, None);
        assert_eq!(p.to_string(), "3:12");

        let p = Position::new(0, 1, Some(Arc::from("main.go")));
        assert_eq!(p.to_string(), "main.go:1:0");
    }

    #[test]
    fn line_index_counts_newlines_before_offset() {
        let idx = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(idx.line_of(0), 1);
        assert_eq!(idx.line_of(2), 1);
        assert_eq!(idx.line_of(3), 2);
        assert_eq!(idx.line_of(6), 3);
        assert_eq!(idx.line_of(7), 4);
        assert_eq!(idx.line_of(100), 4);
    }
}
