//! Navigation cursor over the active result sequence.

use crate::{NodeId, store::Hit};

/// Stepping direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Down the stack.
    Next,
    /// Up the stack.
    Prev,
}

impl Direction {
    /// The signed step.
    fn offset(self) -> i64 {
        match self {
            Self::Next => 1,
            Self::Prev => -1,
        }
    }
}

/// Index of the current match, or none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationCursor {
    /// Current position in the active sequence.
    index: Option<usize>,
}

impl NavigationCursor {
    /// Creates a cursor with no selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current index.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Steps with wraparound over a sequence of `len` items.
    ///
    /// With no selection, `Next` lands on the first item and `Prev` on the last. An empty
    /// sequence leaves the cursor unset.
    pub fn step(&mut self, direction: Direction, len: usize) -> Option<usize> {
        if len == 0 {
            self.index = None;
            return None;
        }
        let next = match (self.index, direction) {
            (None, Direction::Next) => 0,
            (None, Direction::Prev) => len - 1,
            (Some(index), _) => {
                let len = len as i64;
                (index as i64 + direction.offset()).rem_euclid(len) as usize
            }
        };
        self.index = Some(next);
        self.index
    }

    /// Moves to the first item, or to none when empty.
    pub fn first(&mut self, len: usize) -> Option<usize> {
        self.index = (len > 0).then_some(0);
        self.index
    }

    /// Pulls the index back into range after the sequence shrank.
    pub fn clamp(&mut self, len: usize) -> Option<usize> {
        self.index = match self.index {
            _ if len == 0 => None,
            Some(index) if index >= len => Some(len - 1),
            other => other,
        };
        self.index
    }

    /// Moves to the hit with identity `id`, clamping when it is gone.
    pub fn restore<N>(&mut self, id: NodeId, hits: &[Hit<N>]) -> Option<usize> {
        match hits.iter().position(|hit| hit.id == id) {
            Some(position) => {
                self.index = Some(position);
                self.index
            }
            None => self.clamp(hits.len()),
        }
    }

    /// Clears the selection.
    pub fn reset(&mut self) {
        self.index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_wraps_forward() {
        let mut cursor = NavigationCursor::new();
        cursor.first(3);
        cursor.step(Direction::Next, 3);
        cursor.step(Direction::Next, 3);
        assert_eq!(cursor.index(), Some(2));
        assert_eq!(cursor.step(Direction::Next, 3), Some(0));
    }

    #[test]
    fn test_step_wraps_backward() {
        let mut cursor = NavigationCursor::new();
        cursor.first(4);
        assert_eq!(cursor.step(Direction::Prev, 4), Some(3));
    }

    #[test]
    fn test_step_from_none() {
        let mut cursor = NavigationCursor::new();
        assert_eq!(cursor.step(Direction::Next, 5), Some(0));

        cursor.reset();
        assert_eq!(cursor.step(Direction::Prev, 5), Some(4));
    }

    #[test]
    fn test_step_on_empty_is_noop() {
        let mut cursor = NavigationCursor::new();
        assert_eq!(cursor.step(Direction::Next, 0), None);
        assert_eq!(cursor.step(Direction::Prev, 0), None);
    }

    #[test]
    fn test_navigation_is_cyclic() {
        for len in 1..=7 {
            let mut cursor = NavigationCursor::new();
            cursor.first(len);
            for _ in 0..len {
                cursor.step(Direction::Prev, len);
            }
            for _ in 0..len {
                cursor.step(Direction::Next, len);
            }
            assert_eq!(cursor.index(), Some(0), "len {len}");
        }
    }

    #[test]
    fn test_clamp() {
        let mut cursor = NavigationCursor::new();
        cursor.first(5);
        cursor.step(Direction::Prev, 5);
        assert_eq!(cursor.clamp(3), Some(2));
        assert_eq!(cursor.clamp(3), Some(2));
        assert_eq!(cursor.clamp(0), None);
        // Clamping an unset cursor keeps it unset
        assert_eq!(cursor.clamp(4), None);
    }

    #[test]
    fn test_restore_by_identity() {
        let hits = [
            Hit {
                node: 'a',
                id: NodeId::Synthetic(7),
            },
            Hit {
                node: 'b',
                id: NodeId::Synthetic(3),
            },
        ];
        let mut cursor = NavigationCursor::new();
        assert_eq!(cursor.restore(NodeId::Synthetic(3), &hits), Some(1));

        cursor.first(5);
        cursor.step(Direction::Prev, 5);
        // Gone: falls back to clamping the old position
        assert_eq!(cursor.restore(NodeId::Host(1), &hits), Some(1));
    }
}
