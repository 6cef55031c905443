//! Line classifier
//!
//! The pseudo-language has no tokens that span lines, so lexing is a matter
//! of looking at one line at a time: measure its indentation (leading tab
//! characters), then decide whether it is blank, a comment, or an action.

use log::trace;

/// What a single source line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    /// `# message`; the message is trimmed and may be empty
    Comment(&'a str),
    Action {
        payload: &'a str,
        /// Text after a whitespace-preceded `#`, if non-empty
        trailing_comment: Option<&'a str>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    /// 0-based index of the line in the source
    pub index: usize,
    pub depth: usize,
    pub kind: LineKind<'a>,
    pub raw: &'a str,
}

/// A line that fits none of the known shapes, e.g. one indented with spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnrecognizedLine<'a> {
    pub index: usize,
    pub raw: &'a str,
}

/// Yields classified lines of a source text in order.
pub struct Lexer<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().enumerate(),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<ClassifiedLine<'a>, UnrecognizedLine<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, raw) = self.lines.next()?;
        Some(classify_line(index, raw))
    }
}

/// Classifies one raw line (without its line terminator).
pub fn classify_line(index: usize, raw: &str) -> Result<ClassifiedLine<'_>, UnrecognizedLine<'_>> {
    let depth = raw.chars().take_while(|c| *c == '\t').count();
    let rest = &raw[depth..];

    let kind = if rest.trim().is_empty() {
        LineKind::Blank
    } else if rest.starts_with(char::is_whitespace) {
        // Indentation is tabs only; anything else before the first
        // visible character is ambiguous.
        return Err(UnrecognizedLine { index, raw });
    } else if let Some(message) = rest.strip_prefix('#') {
        LineKind::Comment(message.trim())
    } else {
        let (payload, trailing_comment) = split_trailing_comment(rest);
        LineKind::Action {
            payload,
            trailing_comment,
        }
    };

    trace!("line {}: depth {} {:?}", index + 1, depth, kind);

    Ok(ClassifiedLine {
        index,
        depth,
        kind,
        raw,
    })
}

fn split_trailing_comment(text: &str) -> (&str, Option<&str>) {
    let marker = text
        .char_indices()
        .zip(text.chars().skip(1))
        .find(|((_, c), next)| c.is_whitespace() && *next == '#')
        .map(|((pos, c), _)| pos + c.len_utf8());

    match marker {
        Some(hash) => {
            let comment = text[hash + 1..].trim();
            let comment = (!comment.is_empty()).then_some(comment);
            (text[..hash].trim_end(), comment)
        }
        None => (text.trim_end(), None),
    }
}
