//! Incremental `<think>` / answer splitting over cumulative streaming payloads.
//!
//! Reasoning models stream a single response string that grows with every event and may
//! wrap their chain of thought in `<think>...</think>`. [`ThinkSplitter`] keeps a byte offset
//! into that cumulative string so each event only scans the newly appended suffix.

pub const OPEN_TAG: &str = "<think>";
pub const CLOSE_TAG: &str = "</think>";

/// Which side of a tag boundary the splitter is currently writing to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Segment {
    #[default]
    Answer,
    Thinking,
}

/// Text appended to each segment by one call to [`ThinkSplitter::ingest`] or
/// [`ThinkSplitter::finish`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitDelta {
    pub thinking: String,
    pub answer: String,
    /// The payload no longer extends what was consumed before. Previously emitted text is
    /// void and the splitter started over from the beginning of this payload.
    pub restarted: bool,
}

impl SplitDelta {
    pub fn is_empty(&self) -> bool {
        self.thinking.is_empty() && self.answer.is_empty() && !self.restarted
    }

    fn push(&mut self, segment: Segment, text: &str) {
        match segment {
            Segment::Thinking => self.thinking.push_str(text),
            Segment::Answer => self.answer.push_str(text),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThinkSplitter {
    consumed: usize,
    segment: Segment,
    thinking: String,
    answer: String,
    held: String,
    /// Per-segment tail that could join with later text of the same segment into a marker.
    pending_thinking: String,
    pending_answer: String,
}

impl ThinkSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the latest cumulative payload and return what it added.
    ///
    /// A trailing fragment that could still become a tag marker (`<`, `</th`, ...) is held
    /// back until the next payload or [`finish`](Self::finish).
    pub fn ingest(&mut self, payload: &str) -> SplitDelta {
        let mut delta = SplitDelta::default();

        if payload.len() < self.consumed || !payload.is_char_boundary(self.consumed) {
            *self = Self::default();
            delta.restarted = true;
        }

        let mut rest = &payload[self.consumed..];
        loop {
            if let Some((idx, marker)) = find_marker(rest) {
                self.emit(&mut delta, &rest[..idx], false);
                self.segment = if marker == OPEN_TAG {
                    Segment::Thinking
                } else {
                    Segment::Answer
                };
                let advance = idx + marker.len();
                self.consumed += advance;
                rest = &rest[advance..];
                continue;
            }

            let ready = rest.len() - partial_marker_len(rest);
            self.emit(&mut delta, &rest[..ready], false);
            self.consumed += ready;
            self.held.clear();
            self.held.push_str(&rest[ready..]);
            return delta;
        }
    }

    /// End of stream: whatever was held back is literal text of its segment.
    pub fn finish(&mut self) -> SplitDelta {
        let mut delta = SplitDelta::default();
        let held = std::mem::take(&mut self.held);
        self.consumed += held.len();
        self.emit(&mut delta, &held, true);

        let current = self.segment;
        self.segment = match current {
            Segment::Thinking => Segment::Answer,
            Segment::Answer => Segment::Thinking,
        };
        self.emit(&mut delta, "", true);
        self.segment = current;
        delta
    }

    pub fn thinking(&self) -> &str {
        &self.thinking
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// `true` while an opened `<think>` span has not been closed yet.
    pub fn is_thinking(&self) -> bool {
        self.segment == Segment::Thinking
    }

    pub fn into_parts(self) -> (String, String) {
        (self.thinking, self.answer)
    }

    /// Append `text` to the current segment.
    ///
    /// Text from two separate spans of one segment can meet at a seam and spell a marker
    /// (`x<thi` + `nk>z`). The tail of each span that could start a marker stays pending
    /// until the segment continues, and any marker formed across the seam is dropped.
    fn emit(&mut self, delta: &mut SplitDelta, text: &str, flush: bool) {
        let segment = self.segment;
        let pending = match segment {
            Segment::Thinking => &mut self.pending_thinking,
            Segment::Answer => &mut self.pending_answer,
        };
        if text.is_empty() && (pending.is_empty() || !flush) {
            return;
        }

        let mut joined = std::mem::take(pending);
        joined.push_str(text);
        strip_markers(&mut joined);

        let ready = if flush {
            joined.len()
        } else {
            joined.len() - partial_marker_len(&joined)
        };
        pending.push_str(&joined[ready..]);
        joined.truncate(ready);
        if joined.is_empty() {
            return;
        }

        match segment {
            Segment::Thinking => self.thinking.push_str(&joined),
            Segment::Answer => self.answer.push_str(&joined),
        }
        delta.push(segment, &joined);
    }
}

/// Split a complete response into `(thinking, answer)`.
pub fn split_complete(text: &str) -> (String, String) {
    let mut splitter = ThinkSplitter::new();
    splitter.ingest(text);
    splitter.finish();
    splitter.into_parts()
}

fn find_marker(text: &str) -> Option<(usize, &'static str)> {
    let open = text.find(OPEN_TAG).map(|idx| (idx, OPEN_TAG));
    let close = text.find(CLOSE_TAG).map(|idx| (idx, CLOSE_TAG));
    match (open, close) {
        (Some(o), Some(c)) => Some(if o.0 <= c.0 { o } else { c }),
        (o, c) => o.or(c),
    }
}

fn strip_markers(text: &mut String) {
    while let Some((idx, marker)) = find_marker(text) {
        text.replace_range(idx..idx + marker.len(), "");
    }
}

/// Length of the longest suffix of `text` that is a proper prefix of either marker.
fn partial_marker_len(text: &str) -> usize {
    let max = text.len().min(CLOSE_TAG.len() - 1);
    (1..=max)
        .rev()
        .find(|&len| {
            let start = text.len() - len;
            text.is_char_boundary(start) && {
                let tail = &text[start..];
                OPEN_TAG.starts_with(tail) || CLOSE_TAG.starts_with(tail)
            }
        })
        .unwrap_or(0)
}
