pub mod geometry;
pub mod matching;
pub mod think;

pub use geometry::{Rect, outer_rect};
pub use matching::{fragment_matches, normalize_text, texts_match};
pub use think::{CLOSE_TAG, OPEN_TAG, Segment, SplitDelta, ThinkSplitter, split_complete};
