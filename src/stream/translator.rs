use std::io;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tracing::{debug, warn};

use super::decoder::Utf8Decoder;
use super::delta::extract_delta;
use super::lines::LineBuffer;
use crate::protocol::RelayEvent;

/// Turns upstream chat-completion stream bytes into relay events.
///
/// Owns the decoder and line buffer for one response. [`StreamTranslator::finish`]
/// consumes the translator, so nothing can be emitted after the done event.
#[derive(Debug, Default)]
pub struct StreamTranslator {
    decoder: Utf8Decoder,
    lines: LineBuffer,
    deltas: usize,
}

impl StreamTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one upstream chunk and drain every complete line it finishes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<RelayEvent> {
        let text = self.decoder.decode(chunk);
        self.lines.push(&text);

        let mut events = Vec::new();
        while let Some(line) = self.lines.next_line() {
            if let Some(text) = extract_delta(&line) {
                events.push(RelayEvent::Delta { text });
            }
        }
        self.deltas += events.len();
        events
    }

    /// Close the translation. An unterminated trailing line is dropped.
    pub fn finish(self) -> RelayEvent {
        let remainder = self.lines.remainder().len() + self.decoder.pending().len();
        if remainder > 0 {
            debug!(bytes = remainder, "discarding unterminated trailing line");
        }
        debug!(deltas = self.deltas, "upstream stream finished");
        RelayEvent::Done
    }
}

/// Translate an upstream body stream into SSE records.
///
/// A read error ends the output stream with that error; no done event follows.
pub fn translate<S, E>(upstream: S) -> impl Stream<Item = Result<Bytes, io::Error>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    async_stream::stream! {
        futures_util::pin_mut!(upstream);
        let mut translator = StreamTranslator::new();

        while let Some(chunk) = upstream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!(error = %e, "error reading upstream stream");
                    yield Err(io::Error::other(e));
                    return;
                }
            };
            for event in translator.feed(&chunk) {
                yield Ok(Bytes::from(event.to_sse()));
            }
        }

        yield Ok(Bytes::from(translator.finish().to_sse()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    const DONE: &str = "data: {\"type\":\"done\"}\n\n";

    fn chunk(content: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({"choices": [{"delta": {"content": content}}]})
        )
    }

    async fn run(chunks: Vec<Vec<u8>>) -> String {
        let upstream = stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok::<_, io::Error>(Bytes::from(c))),
        );
        let out: Vec<Bytes> = translate(upstream)
            .map(|r| r.unwrap())
            .collect()
            .await;
        out.iter()
            .map(|b| std::str::from_utf8(b).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_feed_emits_in_line_order() {
        let mut translator = StreamTranslator::new();
        let input = format!("{}{}data: [DONE]\n\n", chunk("A"), chunk("B"));
        let events = translator.feed(input.as_bytes());
        assert_eq!(
            events,
            vec![
                RelayEvent::Delta { text: "A".into() },
                RelayEvent::Delta { text: "B".into() },
            ]
        );
        assert_eq!(translator.finish(), RelayEvent::Done);
    }

    #[tokio::test]
    async fn test_translate_deltas_then_done() {
        let out = run(vec![
            chunk("A").into_bytes(),
            chunk("B").into_bytes(),
            b"data: [DONE]\n\n".to_vec(),
        ])
        .await;
        assert_eq!(
            out,
            format!(
                "data: {{\"type\":\"delta\",\"text\":\"A\"}}\n\n\
                 data: {{\"type\":\"delta\",\"text\":\"B\"}}\n\n{DONE}"
            )
        );
    }

    #[tokio::test]
    async fn test_line_split_across_chunks() {
        let line = chunk("split");
        let (a, b) = line.split_at(10);
        let out = run(vec![a.as_bytes().to_vec(), b.as_bytes().to_vec()]).await;
        assert_eq!(
            out,
            format!("data: {{\"type\":\"delta\",\"text\":\"split\"}}\n\n{DONE}")
        );
    }

    #[tokio::test]
    async fn test_multibyte_split_across_chunks() {
        let line = chunk("héllo 🦀");
        let bytes = line.as_bytes();
        let cut = line.find('🦀').unwrap() + 2;
        let out = run(vec![bytes[..cut].to_vec(), bytes[cut..].to_vec()]).await;
        assert_eq!(
            out,
            format!("data: {{\"type\":\"delta\",\"text\":\"héllo 🦀\"}}\n\n{DONE}")
        );
    }

    #[tokio::test]
    async fn test_malformed_line_is_skipped() {
        let input = format!("data: {{oops\n\n{}", chunk("after"));
        let out = run(vec![input.into_bytes()]).await;
        assert_eq!(
            out,
            format!("data: {{\"type\":\"delta\",\"text\":\"after\"}}\n\n{DONE}")
        );
    }

    #[tokio::test]
    async fn test_unterminated_trailing_line_is_dropped() {
        let input = format!("{}{}", chunk("kept"), chunk("lost").trim_end());
        let out = run(vec![input.into_bytes()]).await;
        assert_eq!(
            out,
            format!("data: {{\"type\":\"delta\",\"text\":\"kept\"}}\n\n{DONE}")
        );
    }

    #[tokio::test]
    async fn test_leading_bom_does_not_hide_first_line() {
        let mut first = b"\xEF\xBB\xBF".to_vec();
        first.extend_from_slice(chunk("first").as_bytes());
        let out = run(vec![first]).await;
        assert_eq!(
            out,
            format!("data: {{\"type\":\"delta\",\"text\":\"first\"}}\n\n{DONE}")
        );
    }

    #[tokio::test]
    async fn test_empty_upstream_yields_only_done() {
        assert_eq!(run(vec![]).await, DONE);
    }

    #[tokio::test]
    async fn test_read_error_ends_stream_without_done() {
        let upstream = stream::iter(vec![
            Ok(Bytes::from(chunk("A"))),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
            Ok(Bytes::from(chunk("B"))),
        ]);
        let items: Vec<_> = translate(upstream).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].as_ref().unwrap(),
            &Bytes::from("data: {\"type\":\"delta\",\"text\":\"A\"}\n\n")
        );
        assert!(items[1].is_err());
    }
}
