//! Two-pass delimiter scanner splitting a document into prose and math.

use std::borrow::Cow;

const BLOCK_DELIMITER: &str = "$$";
const INLINE_DELIMITER: char = '$';

/// A span of a mixed document, borrowing from the input.
///
/// The math variants hold the content between the delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Prose(&'a str),
    BlockMath(&'a str),
    InlineMath(&'a str),
}

impl<'a> Segment<'a> {
    /// The text this segment was cut from, delimiters included.
    pub fn original(&self) -> Cow<'a, str> {
        match *self {
            Self::Prose(text) => Cow::Borrowed(text),
            Self::BlockMath(math) => Cow::Owned(format!("{BLOCK_DELIMITER}{math}{BLOCK_DELIMITER}")),
            Self::InlineMath(math) => {
                Cow::Owned(format!("{INLINE_DELIMITER}{math}{INLINE_DELIMITER}"))
            }
        }
    }

    pub fn is_math(&self) -> bool {
        !matches!(self, Self::Prose(_))
    }
}

/// Split `doc` into prose, block math and inline math segments.
///
/// Block spans `$$...$$` are found first: the shortest pair enclosing at least
/// one character, possibly across lines. The remaining prose is then scanned
/// for inline spans `$...$` whose content is non-empty and holds neither a
/// line break nor a `$`. Unmatched delimiters stay in the prose.
///
/// # Examples
///
/// ```
/// use mathpipe_core::mixed::{segment, Segment};
///
/// assert_eq!(
///     segment("intro $$a+b$$ outro"),
///     vec![
///         Segment::Prose("intro "),
///         Segment::BlockMath("a+b"),
///         Segment::Prose(" outro"),
///     ]
/// );
/// ```
pub fn segment(doc: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    for block in split_block_math(doc) {
        match block {
            Segment::Prose(prose) => split_inline_math(prose, &mut segments),
            math => segments.push(math),
        }
    }
    tracing::debug!(
        segments = segments.len(),
        math = segments.iter().filter(|s| s.is_math()).count(),
        "Segmented mixed document"
    );
    segments
}

fn split_block_math(doc: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut prose_start = 0;
    let mut cursor = 0;

    while let Some(offset) = doc[cursor..].find(BLOCK_DELIMITER) {
        let open = cursor + offset;
        let body_start = open + BLOCK_DELIMITER.len();
        // The content must hold at least one character.
        let Some(first) = doc[body_start..].chars().next() else {
            break;
        };
        let search_from = body_start + first.len_utf8();
        let Some(close_offset) = doc[search_from..].find(BLOCK_DELIMITER) else {
            break;
        };
        let close = search_from + close_offset;

        if prose_start < open {
            segments.push(Segment::Prose(&doc[prose_start..open]));
        }
        segments.push(Segment::BlockMath(&doc[body_start..close]));

        prose_start = close + BLOCK_DELIMITER.len();
        cursor = prose_start;
    }

    if prose_start < doc.len() {
        segments.push(Segment::Prose(&doc[prose_start..]));
    }

    segments
}

fn split_inline_math<'a>(prose: &'a str, segments: &mut Vec<Segment<'a>>) {
    let mut prose_start = 0;
    let mut cursor = 0;

    while let Some(offset) = prose[cursor..].find(INLINE_DELIMITER) {
        let open = cursor + offset;
        let body_start = open + 1;
        let Some(close_offset) = prose[body_start..].find(INLINE_DELIMITER) else {
            break;
        };
        let close = body_start + close_offset;
        let math = &prose[body_start..close];

        if math.is_empty() || math.contains('\n') {
            cursor = body_start;
            continue;
        }

        if prose_start < open {
            segments.push(Segment::Prose(&prose[prose_start..open]));
        }
        segments.push(Segment::InlineMath(math));

        prose_start = close + 1;
        cursor = prose_start;
    }

    if prose_start < prose.len() {
        segments.push(Segment::Prose(&prose[prose_start..]));
    }
}
