//! Incremental `text/event-stream` framing.
//!
//! Bytes go in as they arrive from the transport; complete events come out.
//! Lines end with `\n` or `\r\n`. Multiple `data:` lines are joined with
//! `\n`, `:` lines are comments, and a blank line dispatches the event.
//! A line longer than the configured cap is reported as an error and
//! discarded up to its terminating newline, together with the event it
//! belonged to.

use crate::error::SseError;

/// Default cap on a single line, in bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 4 * 1024 * 1024;

/// One dispatched event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseFrame {
    pub event: Option<String>,
    pub data: String,
    pub id: Option<String>,
    pub retry: Option<u64>,
}

#[derive(Debug)]
pub struct SseParser {
    buffer: Vec<u8>,
    max_line_len: usize,
    /// Skipping the tail of an oversized line.
    discarding: bool,
    event: Option<String>,
    data: Vec<String>,
    id: Option<String>,
    retry: Option<u64>,
    last_event_id: Option<String>,
}

impl Default for SseParser {
    fn default() -> Self {
        Self::with_max_line_len(DEFAULT_MAX_LINE_LEN)
    }
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line_len(max_line_len: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_line_len,
            discarding: false,
            event: None,
            data: Vec::new(),
            id: None,
            retry: None,
            last_event_id: None,
        }
    }

    /// Feed a chunk. Returns every event completed by it, in order, with an
    /// `Err` in place of each line that exceeded the cap.
    ///
    /// Only whole lines are decoded, so a multi-byte character split across
    /// chunks is reassembled before decoding.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Result<SseFrame, SseError>> {
        let mut out = Vec::new();
        let mut rest = chunk;

        while !rest.is_empty() {
            let Some(pos) = rest.iter().position(|&b| b == b'\n') else {
                if !self.discarding {
                    self.buffer.extend_from_slice(rest);
                    if self.buffer.len() > self.max_line_len {
                        out.push(Err(self.overflow()));
                        self.discarding = true;
                    }
                }
                break;
            };

            let (line, tail) = rest.split_at(pos + 1);
            rest = tail;
            if self.discarding {
                self.discarding = false;
                continue;
            }

            self.buffer.extend_from_slice(&line[..pos]);
            if self.buffer.len() > self.max_line_len {
                out.push(Err(self.overflow()));
                continue;
            }

            let mut line = std::mem::take(&mut self.buffer);
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(frame) = self.process_line(&line) {
                out.push(Ok(frame));
            }
        }
        out
    }

    /// `id` of the last dispatched event, if any carried one.
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    /// Drop a partially received event.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
        self.event = None;
        self.data.clear();
        self.id = None;
        self.retry = None;
    }

    fn overflow(&mut self) -> SseError {
        let len = self.buffer.len();
        tracing::warn!("SSE line exceeded {} bytes, dropping the event", self.max_line_len);
        self.reset();
        SseError::Parse(format!(
            "line of {} bytes exceeds the {} byte limit",
            len, self.max_line_len
        ))
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "data" => self.data.push(value.to_string()),
            "event" => self.event = Some(value.to_string()),
            "id" if !value.contains('\0') => self.id = Some(value.to_string()),
            "retry" => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.retry = Some(ms);
                }
            }
            other => tracing::trace!("Ignoring SSE field {}", other),
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        let id = self.id.take();
        let retry = self.retry.take();

        if id.is_some() {
            self.last_event_id = id.clone();
        }
        if self.data.is_empty() {
            return None;
        }

        let data = self.data.join("\n");
        self.data.clear();
        Some(SseFrame {
            event,
            data,
            id,
            retry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(parser: &mut SseParser, chunk: &[u8]) -> Vec<SseFrame> {
        parser
            .feed(chunk)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_single_event() {
        let mut parser = SseParser::new();
        let frames = frames(&mut parser, b"data: {\"stream_id\":\"abc123\"}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "{\"stream_id\":\"abc123\"}");
        assert_eq!(frames[0].event, None);
    }

    #[test]
    fn test_crlf_and_multiline_data() {
        let mut parser = SseParser::new();
        let frames = frames(
            &mut parser,
            b"event: update\r\nid: 7\r\ndata: a\r\ndata: b\r\n\r\n",
        );
        assert_eq!(
            frames,
            vec![SseFrame {
                event: Some("update".into()),
                data: "a\nb".into(),
                id: Some("7".into()),
                retry: None,
            }]
        );
        assert_eq!(parser.last_event_id(), Some("7"));
    }

    #[test]
    fn test_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"da").is_empty());
        assert!(parser.feed(b"ta: hel").is_empty());
        assert!(parser.feed(b"lo\n").is_empty());
        let frames = frames(&mut parser, b"\n");
        assert_eq!(frames[0].data, "hello");
    }

    #[test]
    fn test_split_multibyte_char() {
        let mut parser = SseParser::new();
        let text = "data: é\n\n".as_bytes();
        assert!(parser.feed(&text[..7]).is_empty());
        let frames = frames(&mut parser, &text[7..]);
        assert_eq!(frames[0].data, "é");
    }

    #[test]
    fn test_comments_and_empty_events_are_skipped() {
        let mut parser = SseParser::new();
        let frames = frames(&mut parser, b": keep-alive\n\nretry: 3000\n\ndata:x\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "x");
        assert_eq!(frames[0].retry, None);
    }

    #[test]
    fn test_unterminated_line_over_cap_is_dropped() {
        let mut parser = SseParser::with_max_line_len(16);

        // Partial event, then a line that never ends within the cap.
        assert!(parser.feed(b"event: big\ndata: ").is_empty());
        let out = parser.feed(&[b'x'; 32]);
        assert_eq!(out.len(), 1);
        assert!(matches!(&out[0], Err(SseError::Parse(_))));
        assert!(parser.buffer.is_empty());

        // The rest of the oversized line is skipped, the next event is clean.
        assert!(parser.feed(&[b'x'; 64]).is_empty());
        let frames = frames(&mut parser, b"xx\n\ndata: ok\n\n");
        assert_eq!(
            frames,
            vec![SseFrame {
                data: "ok".into(),
                ..SseFrame::default()
            }]
        );
    }

    #[test]
    fn test_complete_line_over_cap_keeps_later_events() {
        let mut parser = SseParser::with_max_line_len(8);
        let out = parser.feed(b"data: 0123456789\n\ndata: ok\n\n");
        assert_eq!(out.len(), 2);
        assert!(out[0].is_err());
        assert_eq!(out[1].as_ref().map(|f| f.data.as_str()).ok(), Some("ok"));
    }
}
