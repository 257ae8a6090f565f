//! Offset to line/column translation for diagnostics.

use std::fmt;

/// 1-based line and column of a char offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

/// Translates a char offset into `input`.
///
/// An offset at or past the end maps to the position just after the last char.
pub fn translate(input: &[char], offset: u32) -> Position {
    translate_all(input, &[offset])[0]
}

/// Translates several offsets in a single pass over `input`.
///
/// Results come back in the order the offsets were given.
pub fn translate_all(input: &[char], offsets: &[u32]) -> Vec<Position> {
    let mut order: Vec<usize> = (0..offsets.len()).collect();
    order.sort_by_key(|&i| offsets[i]);

    let mut positions = vec![Position::default(); offsets.len()];
    let mut pending = order.into_iter().peekable();
    let (mut line, mut column) = (1, 1);

    for (i, &ch) in input.iter().enumerate() {
        while let Some(&next) = pending.peek() {
            if offsets[next] as usize != i {
                break;
            }
            positions[next] = Position::new(line, column);
            pending.next();
        }
        if pending.peek().is_none() {
            return positions;
        }

        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    for next in pending {
        positions[next] = Position::new(line, column);
    }
    positions
}
