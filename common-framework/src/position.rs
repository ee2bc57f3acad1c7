use std::fmt;

/// Represents a location in the input of a parse.
///
/// Text sources fill in real line and column numbers; other sources
/// report everything on line 1 with the column tracking the element index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Element offset from the start of the input
    pub offset: usize,
}

impl Position {
    /// Creates a new position at the start of the input.
    pub fn new() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// Creates a position with the given values.
    pub fn at(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Returns the position after stepping over `ch`.
    pub fn step(self, ch: char) -> Self {
        if ch == '\n' {
            Self::at(self.line + 1, 1, self.offset + 1)
        } else {
            Self::at(self.line, self.column + 1, self.offset + 1)
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_of_input() {
        assert_eq!(Position::default(), Position::at(1, 1, 0));
    }

    #[test]
    fn test_step_over_line_break() {
        let pos = Position::new().step('a').step('\n').step('b');
        assert_eq!(pos, Position::at(2, 2, 3));
    }

    #[test]
    fn test_step_counts_characters_not_bytes() {
        let pos = "héé".chars().fold(Position::new(), Position::step);
        assert_eq!(pos, Position::at(1, 4, 3));
    }

    #[test]
    fn test_display_omits_offset() {
        assert_eq!(Position::at(3, 4, 20).to_string(), "line 3, column 4");
    }
}
