//! Segment state machine.
//!
//! Splits a route id (a path relative to the app directory, extension
//! stripped) into semantic segments, used for naming and parent matching,
//! and raw segments, the spelling used for path construction.
//!
//! | Input              | Semantic            |
//! |--------------------|---------------------|
//! | `users.$id`        | `users`, `:id`      |
//! | `files/$`          | `files`, `*`        |
//! | `($lang).about`    | `:lang?`, `about`   |
//! | `[sitemap.xml]`    | `sitemap.xml`       |
//! | `admin+/users`     | `admin`, `users`    |

use super::convention::RuleSet;
use super::error::SegmentError;

/// What ended a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// `.`
    Dot,
    /// `/` or `\`
    Folder,
    /// `+/` (hybrid only)
    FlatFolder,
    /// End of the id.
    End,
}

/// One parsed segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub semantic: String,
    pub raw: String,
    pub end: Boundary,
    /// Byte offset in the id where the segment text ends.
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Escape,
    Optional,
    OptionalEscape,
}

/// The segment state machine for one convention and marker pair.
#[derive(Debug, Clone, Copy)]
pub struct SegmentParser {
    rules: RuleSet,
    param: char,
    colocation: char,
}

impl SegmentParser {
    pub const fn new(rules: RuleSet, param: char, colocation: char) -> Self {
        Self {
            rules,
            param,
            colocation,
        }
    }

    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Parse a route id into segments.
    pub fn parse(&self, id: &str) -> Result<Vec<Segment>, SegmentError> {
        let chars: Vec<(usize, char)> = id.char_indices().collect();
        let mut segments = Vec::new();
        let mut semantic = String::new();
        let mut raw = String::new();
        let mut state = State::Normal;
        let mut i = 0;

        while i < chars.len() {
            let (offset, c) = chars[i];
            i += 1;

            match state {
                State::Normal => {
                    if self.is_flat_folder(&chars, i - 1, !raw.is_empty()) {
                        push_segment(
                            &mut segments,
                            &mut semantic,
                            &mut raw,
                            Boundary::FlatFolder,
                            offset,
                        )?;
                        // skip the separator after the marker
                        i += 1;
                        continue;
                    }
                    if let Some(boundary) = boundary_of(c) {
                        push_segment(&mut segments, &mut semantic, &mut raw, boundary, offset)?;
                        continue;
                    }
                    raw.push(c);
                    match c {
                        '[' => state = State::Escape,
                        '(' => state = State::Optional,
                        c if c == self.param && semantic.is_empty() => {
                            let splat = self.at_segment_end(&chars, i);
                            semantic.push(if splat { '*' } else { ':' });
                        }
                        c => semantic.push(c),
                    }
                }
                State::Escape => {
                    raw.push(c);
                    if c == ']' {
                        state = State::Normal;
                    } else {
                        semantic.push(c);
                    }
                }
                State::Optional => {
                    raw.push(c);
                    match c {
                        ')' => {
                            semantic.push('?');
                            state = State::Normal;
                        }
                        '[' => state = State::OptionalEscape,
                        c if c == self.param && semantic.is_empty() => {
                            let closes = chars.get(i).is_some_and(|&(_, next)| next == ')');
                            if closes || self.at_segment_end(&chars, i) {
                                return Err(SegmentError::OptionalSplat { id: id.to_string() });
                            }
                            semantic.push(':');
                        }
                        c => semantic.push(c),
                    }
                }
                State::OptionalEscape => {
                    raw.push(c);
                    if c == ']' {
                        state = State::Optional;
                    } else {
                        semantic.push(c);
                    }
                }
            }
        }

        match state {
            State::Normal => {}
            State::Escape | State::OptionalEscape => {
                return Err(SegmentError::Unterminated {
                    open: '[',
                    id: id.to_string(),
                });
            }
            State::Optional => {
                return Err(SegmentError::Unterminated {
                    open: '(',
                    id: id.to_string(),
                });
            }
        }

        push_segment(&mut segments, &mut semantic, &mut raw, Boundary::End, id.len())?;
        Ok(segments)
    }

    /// `name+/`: the colocation marker closing a non-empty segment right
    /// before a folder separator.
    fn is_flat_folder(&self, chars: &[(usize, char)], at: usize, has_text: bool) -> bool {
        self.rules.flat_folders
            && has_text
            && chars.get(at).is_some_and(|&(_, c)| c == self.colocation)
            && chars
                .get(at + 1)
                .is_some_and(|&(_, c)| boundary_of(c) == Some(Boundary::Folder))
    }

    fn at_segment_end(&self, chars: &[(usize, char)], at: usize) -> bool {
        match chars.get(at) {
            None => true,
            Some(&(_, c)) => boundary_of(c).is_some() || self.is_flat_folder(chars, at, true),
        }
    }
}

fn boundary_of(c: char) -> Option<Boundary> {
    match c {
        '.' => Some(Boundary::Dot),
        '/' | '\\' => Some(Boundary::Folder),
        _ => None,
    }
}

fn push_segment(
    segments: &mut Vec<Segment>,
    semantic: &mut String,
    raw: &mut String,
    end: Boundary,
    offset: usize,
) -> Result<(), SegmentError> {
    let semantic = std::mem::take(semantic);
    let raw = std::mem::take(raw);
    if semantic.is_empty() {
        return Ok(());
    }

    for ch in ['*', ':'] {
        if raw.contains(ch) {
            return Err(SegmentError::InvalidChar { segment: raw, ch });
        }
    }
    if raw.contains('/') || raw.contains('\\') {
        return Err(SegmentError::EmbeddedSlash { segment: semantic });
    }

    segments.push(Segment {
        semantic,
        raw,
        end,
        offset,
    });
    Ok(())
}

/// Folder ancestors of a parsed id that may receive a synthesized parent,
/// as `(segment count, byte offset of the folder end)`.
///
/// Stops at the first dotted or flat folder: from there on the author
/// spelled nesting explicitly.
pub fn folder_ancestors(segments: &[Segment]) -> Vec<(usize, usize)> {
    let mut points = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        match segment.end {
            Boundary::Folder => points.push((i + 1, segment.offset)),
            Boundary::Dot | Boundary::FlatFolder => break,
            Boundary::End => {}
        }
    }
    points
}
