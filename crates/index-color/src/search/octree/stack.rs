//! Fixed-capacity backtrack stack for the tree search.

/// Deepest tree the stack can hold: one frame per level of 16-bit samples.
pub const MAX_DEPTH: usize = 16;

/// Array-backed stack of `(node, octant)` frames. Never allocates.
#[derive(Debug, Clone, Copy)]
pub struct BacktrackStack {
    frames: [(u32, u8); MAX_DEPTH],
    len: usize,
}

impl BacktrackStack {
    #[inline]
    pub fn new() -> Self {
        Self {
            frames: [(0, 0); MAX_DEPTH],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, node: u32, q: usize) {
        debug_assert!(self.len < MAX_DEPTH, "tree deeper than {MAX_DEPTH} levels");
        debug_assert!(q < 16);
        self.frames[self.len] = (node, q as u8);
        self.len += 1;
    }

    #[inline]
    pub fn pop(&mut self) -> Option<(u32, usize)> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let (node, q) = self.frames[self.len];
        Some((node, q as usize))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for BacktrackStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifo_order() {
        let mut stack = BacktrackStack::new();
        stack.push(0, 3);
        stack.push(7, 15);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop(), Some((7, 15)));
        assert_eq!(stack.pop(), Some((0, 3)));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_full_depth() {
        let mut stack = BacktrackStack::new();
        for level in 0..MAX_DEPTH {
            stack.push(level as u32, level % 16);
        }
        assert_eq!(stack.len(), MAX_DEPTH);
    }
}
