//! Line sources consumed by the scanner.

/// Read-only, random-access view over the lines of a document.
///
/// `line_at` must return the raw text of line `index` without its terminator
/// for every `index < line_count()`.
pub trait LineSource {
    /// Total number of lines
    fn line_count(&self) -> usize;

    /// Raw text of the zero-based line `index`
    fn line_at(&self, index: usize) -> &str;
}

impl<S: AsRef<str>> LineSource for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_at(&self, index: usize) -> &str {
        self[index].as_ref()
    }
}

impl<S: AsRef<str>> LineSource for Vec<S> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_at(&self, index: usize) -> &str {
        self[index].as_ref()
    }
}

/// Lines of a complete text, split the way an editor counts them.
///
/// Splits on `\n` and drops one trailing `\r` per line, so LF and CRLF
/// documents yield identical lines. A trailing terminator produces a final
/// empty line; empty text is a single empty line.
#[derive(Debug, Clone)]
pub struct TextLines<'a> {
    lines: Vec<&'a str>,
}

impl<'a> TextLines<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        Self { lines }
    }

    /// Iterate over the lines in order
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().copied()
    }
}

impl LineSource for TextLines<'_> {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_at(&self, index: usize) -> &str {
        self.lines[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines_lf() {
        let lines = TextLines::new("a\nb\nc");
        assert_eq!(lines.line_count(), 3);
        assert_eq!(lines.line_at(1), "b");
    }

    #[test]
    fn test_text_lines_crlf() {
        let lines = TextLines::new("a {\r\n}\r\n");
        assert_eq!(lines.iter().collect::<Vec<_>>(), vec!["a {", "}", ""]);
    }

    #[test]
    fn test_text_lines_empty() {
        let lines = TextLines::new("");
        assert_eq!(lines.line_count(), 1);
        assert_eq!(lines.line_at(0), "");
    }

    #[test]
    fn test_lone_carriage_return_kept_inside_line() {
        // Only a \r directly before \n is a terminator
        let lines = TextLines::new("a\rb\n");
        assert_eq!(lines.line_at(0), "a\rb");
    }

    #[test]
    fn test_slice_source() {
        let lines = ["x", "y"];
        assert_eq!(lines[..].line_count(), 2);
        assert_eq!(lines[..].line_at(0), "x");

        let owned = vec!["x".to_string()];
        assert_eq!(owned.line_count(), 1);
        assert_eq!(owned.line_at(0), "x");
    }
}
