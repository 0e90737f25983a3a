//! Incremental UTF-8 accumulation of a streamed response body.

/// Accumulates response chunks for one in-flight request.
///
/// Bytes arrive in arbitrary chunk boundaries, so a multi-byte UTF-8
/// sequence may be split across two chunks. Complete sequences are decoded
/// immediately; an incomplete trailing sequence is held back until the next
/// chunk supplies the rest. Invalid sequences decode to U+FFFD.
#[derive(Debug, Default)]
pub struct StreamBuffer {
    text: String,
    pending: Vec<u8>,
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of raw bytes, decoding as much as possible.
    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(s) => {
                    self.text.push_str(s);
                    self.pending.clear();
                    return;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    self.text
                        .push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        // Invalid bytes in the middle: replace and keep going.
                        Some(bad) => {
                            self.text.push('\u{FFFD}');
                            self.pending.drain(..valid + bad);
                        }
                        // Incomplete trailing sequence: wait for the next chunk.
                        None => {
                            self.pending.drain(..valid);
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Everything decoded so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Finish the stream, flushing any dangling incomplete sequence as U+FFFD.
    pub fn finish(mut self) -> String {
        if !self.pending.is_empty() {
            self.text.push('\u{FFFD}');
        }
        self.text
    }
}
