//! Subtree scans used while inspecting sibling cells.

use super::search::{Best, TreeSearch};
use super::tree::Slot;
use crate::color::plane_distance;

impl<const N: usize> TreeSearch<'_, N> {
    /// Visit every leaf below `node`.
    ///
    /// Used when the best-so-far ball covers the whole subtree, so no
    /// geometric pruning can skip anything.
    pub(super) fn scan_full(&self, node: u32, c: &[u32; N], best: &mut Best) {
        for &slot in self.tree.slots(node) {
            match slot {
                Slot::Empty => {}
                Slot::Leaf(index) => self.offer_leaf(index, c, best),
                Slot::Child(child) => self.scan_full(child, c, best),
            }
        }
    }

    /// Visit the leaves below `node` whose cells may still beat `best`.
    ///
    /// `node` covers the cube `[lo, lo + size)` on every axis. At each level
    /// the octant nearest the query is visited first, and any child cube
    /// whose closest point is farther than the best distance is skipped.
    pub(super) fn scan_partial(
        &self,
        node: u32,
        lo: &[u32; N],
        size: u32,
        c: &[u32; N],
        best: &mut Best,
    ) {
        let half = size >> 1;
        let slots = self.tree.slots(node);

        let mut first = 0usize;
        for i in 0..N {
            if c[i] >= lo[i] + half {
                first |= 1 << i;
            }
        }

        for k in 0..slots.len() {
            let q = k ^ first;
            match slots[q] {
                Slot::Empty => {}
                Slot::Leaf(index) => self.offer_leaf(index, c, best),
                Slot::Child(child) => {
                    let mut child_lo = *lo;
                    for i in 0..N {
                        if q & (1 << i) != 0 {
                            child_lo[i] += half;
                        }
                    }
                    if best.reaches(self.box_near_distance(c, &child_lo, half)) {
                        self.scan_partial(child, &child_lo, half, c, best);
                    }
                }
            }
        }
    }

    /// Distance from `c` to the closest point of the cube `[lo, lo + size)`.
    pub(super) fn box_near_distance(&self, c: &[u32; N], lo: &[u32; N], size: u32) -> u64 {
        (0..N)
            .map(|i| {
                let hi = lo[i] + size - 1;
                if c[i] < lo[i] {
                    plane_distance(lo[i], c[i], self.shift)
                } else if c[i] > hi {
                    plane_distance(c[i], hi, self.shift)
                } else {
                    0
                }
            })
            .sum()
    }

    /// Distance from `c` to the farthest corner of the cube `[lo, lo + size)`.
    pub(super) fn box_far_distance(&self, c: &[u32; N], lo: &[u32; N], size: u32) -> u64 {
        (0..N)
            .map(|i| {
                let hi = lo[i] + size - 1;
                plane_distance(c[i], lo[i], self.shift).max(plane_distance(c[i], hi, self.shift))
            })
            .sum()
    }
}
