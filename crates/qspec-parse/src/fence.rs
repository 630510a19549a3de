//! Code fence tracking for the directive line scanner.
//!
//! Directive markers (`:::`) inside fenced code blocks are literal code
//! and must not open or close containers. The scanner feeds every line
//! through a [`FenceTracker`] and skips marker detection while a fence
//! is open.

/// Tracks fence state during line-by-line scanning.
///
/// Fences use three or more backticks or tildes. The closing fence must
/// repeat the opening character at least as many times and may only be
/// followed by whitespace.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    /// Marker character and run length of the open fence, if any.
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether the scanner is currently inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Advance the state by one line.
    pub(crate) fn update(&mut self, line: &str) {
        let trimmed = line.trim_start();
        match self.open {
            Some((marker, len)) => {
                if closes_fence(trimmed, marker, len) {
                    self.open = None;
                }
            }
            None => self.open = opens_fence(trimmed),
        }
    }
}

/// Marker character and run length if the line opens a fence.
fn opens_fence(trimmed: &str) -> Option<(char, usize)> {
    let marker = trimmed.chars().next().filter(|&c| c == '`' || c == '~')?;
    let len = trimmed.chars().take_while(|&c| c == marker).count();
    (len >= 3).then_some((marker, len))
}

/// Whether the line closes a fence opened with `marker` repeated
/// `min_len` times.
fn closes_fence(trimmed: &str, marker: char, min_len: usize) -> bool {
    let len = trimmed.chars().take_while(|&c| c == marker).count();
    len >= min_len && trimmed[len..].chars().all(char::is_whitespace)
}
