/// Accumulates decoded text and hands out complete lines.
///
/// Holds at most one unterminated line between calls to [`LineBuffer::next_line`]
/// returning `None`.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Split off the text before the first `\n`, with trailing whitespace
    /// trimmed. Returns `None` when no complete line is buffered.
    pub fn next_line(&mut self) -> Option<String> {
        let idx = self.buf.find('\n')?;
        let line = self.buf[..idx].trim_end().to_string();
        self.buf.drain(..=idx);
        Some(line)
    }

    /// The unterminated tail still waiting for a newline.
    pub fn remainder(&self) -> &str {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_lines() {
        let mut lines = LineBuffer::new();
        lines.push("one\r\ntwo\n\n");
        assert_eq!(lines.next_line().as_deref(), Some("one"));
        assert_eq!(lines.next_line().as_deref(), Some("two"));
        assert_eq!(lines.next_line().as_deref(), Some(""));
        assert_eq!(lines.next_line(), None);
        assert_eq!(lines.remainder(), "");
    }

    #[test]
    fn test_partial_line_waits_for_newline() {
        let mut lines = LineBuffer::new();
        lines.push("data: {\"cho");
        assert_eq!(lines.next_line(), None);
        assert_eq!(lines.remainder(), "data: {\"cho");
        lines.push("ices\":[]}  \nnext");
        assert_eq!(lines.next_line().as_deref(), Some("data: {\"choices\":[]}"));
        assert_eq!(lines.next_line(), None);
        assert_eq!(lines.remainder(), "next");
    }
}
