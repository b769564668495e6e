//! Incremental parser for the platform's `text/event-stream` framing.
//!
//! The server emits `data: <json>` lines terminated by a blank line, plus
//! `:`-prefixed comment lines as keep-alives. Chunk boundaries fall
//! anywhere, so the parser buffers bytes and only ever decodes complete
//! lines.

/// Feed chunks in, get complete event payloads out.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a transport chunk; returns the payloads of every event the
    /// chunk completed (possibly none).
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                // Blank line flushes the in-progress event.
                if !self.data.is_empty() {
                    events.push(self.data.join("\n"));
                    self.data.clear();
                }
            } else if let Some(rest) = line.strip_prefix("data:") {
                self.data.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
            } else if line.starts_with(':') {
                // Keep-alive comment.
            } else {
                // `event:`/`id:`/`retry:` fields — the platform does not
                // use them; ignore.
            }
        }
        events
    }
}
