/// Incremental UTF-8 decoder.
///
/// A multi-byte sequence cut by a chunk boundary is held back until the next
/// call. Invalid sequences decode to U+FFFD, so decoding never fails. A
/// leading byte order mark is stripped.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
    started: bool,
}

const BOM: &[u8] = b"\xEF\xBB\xBF";

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, carrying any incomplete trailing sequence over
    /// to the following call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(chunk);

        if !self.started {
            if input.len() < BOM.len() && BOM.starts_with(&input) {
                self.pending = input;
                return String::new();
            }
            self.started = true;
            if input.starts_with(BOM) {
                input.drain(..BOM.len());
            }
        }

        let mut out = String::with_capacity(input.len());
        let mut rest = input.as_slice();

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // valid_up_to() marks a UTF-8 boundary.
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending.extend_from_slice(after);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Bytes of an incomplete sequence still waiting for more input.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }
}
