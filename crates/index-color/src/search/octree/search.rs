//! Nearest-color search over an [`OctTree`].
//!
//! The search descends to the cell containing the query, then backtracks up
//! the recorded path. At each level it inspects only those sibling cells
//! that the squared-distance-to-plane tests cannot rule out, and climbs
//! further only while the best-so-far ball still crosses a face of the
//! enclosing node that is not the edge of color space.

use super::stack::BacktrackStack;
use super::tree::{octant, OctTree, Slot};
use crate::color::{distance, plane_distance};

/// Result of a nearest-color query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nearest {
    /// Palette index, without any colormap offset.
    pub index: u32,
    /// Squared distance under the tree's shift.
    pub distance: u32,
}

/// Best candidate seen so far.
///
/// Equal distances resolve to the lower palette index, matching the
/// first-wins order of a linear scan.
#[derive(Debug, Clone, Copy)]
pub(super) struct Best {
    pub index: u32,
    pub distance: u32,
}

impl Best {
    fn none() -> Self {
        Self {
            index: u32::MAX,
            distance: u32::MAX,
        }
    }

    #[inline]
    pub fn offer(&mut self, index: u32, distance: u32) {
        if distance < self.distance || (distance == self.distance && index < self.index) {
            self.index = index;
            self.distance = distance;
        }
    }

    #[inline]
    pub fn reaches(&self, bound: u64) -> bool {
        bound <= self.distance as u64
    }
}

/// Query context binding a tree to the bias-shifted palette it indexes.
///
/// `N` is the channel count and must equal the tree's.
pub struct TreeSearch<'a, const N: usize> {
    pub(super) tree: &'a OctTree,
    palette: &'a [u32],
    pub(super) shift: u32,
    color_max: u64,
}

impl<'a, const N: usize> TreeSearch<'a, N> {
    /// `palette` holds `N` bias-shifted values per entry, the same values
    /// the tree was built from.
    pub fn new(tree: &'a OctTree, palette: &'a [u32], shift: u32) -> Self {
        debug_assert_eq!(tree.channels(), N);
        debug_assert_eq!(palette.len() % N, 0);
        Self {
            tree,
            palette,
            shift,
            color_max: 1u64 << tree.sample_bits(),
        }
    }

    #[inline]
    fn color(&self, index: u32) -> [u32; N] {
        let mut color = [0u32; N];
        color.copy_from_slice(&self.palette[index as usize * N..][..N]);
        color
    }

    #[inline]
    pub(super) fn offer_leaf(&self, index: u32, c: &[u32; N], best: &mut Best) {
        best.offer(index, distance(c, &self.color(index), self.shift));
    }

    /// Closest palette entry to `c` (bias-shifted channel values).
    pub fn nearest(&self, c: &[u32; N]) -> Nearest {
        let min_pass = self.tree.min_pass();
        let mut stack = BacktrackStack::new();
        let mut node = OctTree::ROOT;
        let mut pass = self.tree.sample_bits() - 1;
        let mut position = [0u32; N];
        let mut best = Best::none();
        let mut q;

        // Descend to the cell holding `c`
        loop {
            q = octant(c, pass);
            let size = 1u32 << pass;
            for (p, &ci) in position.iter_mut().zip(c) {
                *p |= ci & size;
            }

            match self.tree.slot(node, q) {
                Slot::Leaf(index) => {
                    let color = self.color(index);
                    let d = distance(c, &color, self.shift);
                    if color == *c || pass == min_pass {
                        return Nearest { index, distance: d };
                    }
                    best.offer(index, d);
                    break;
                }
                Slot::Child(child) => {
                    stack.push(node, q);
                    node = child;
                    pass -= 1;
                }
                Slot::Empty => break,
            }
        }

        // Backtrack while a closer color may lie outside the current node
        loop {
            let continue_up = self.check_neighbours(node, q, pass, &position, c, &mut best);
            let size = 1u32 << pass;
            for p in position.iter_mut() {
                *p &= !size;
            }
            if !continue_up {
                break;
            }
            match stack.pop() {
                Some((parent, parent_q)) => {
                    node = parent;
                    q = parent_q;
                    pass += 1;
                }
                None => break,
            }
        }

        debug_assert!(best.index != u32::MAX, "search over an empty tree");
        Nearest {
            index: best.index,
            distance: best.distance,
        }
    }

    /// Inspect the siblings of cell `q` in `node` and report whether the
    /// search has to climb to the parent level.
    ///
    /// `position` is the lower corner of cell `q`, whose edge is
    /// `1 << pass`. For every axis, `near[i]` is the distance term from the
    /// query to the sibling across that axis. A sibling across the axis set
    /// `m` can only hold a closer color when the sum of `near` over `m`
    /// does not exceed the best distance.
    fn check_neighbours(
        &self,
        node: u32,
        q: usize,
        pass: u32,
        position: &[u32; N],
        c: &[u32; N],
        best: &mut Best,
    ) -> bool {
        let size = 1u32 << pass;
        let slots = self.tree.slots(node);

        let mut sibling_lo = [0u32; N];
        let mut near = [0u64; N];
        for i in 0..N {
            if q & (1 << i) != 0 {
                sibling_lo[i] = position[i] - size;
                near[i] = plane_distance(c[i], position[i] - 1, self.shift);
            } else {
                sibling_lo[i] = position[i] + size;
                near[i] = plane_distance(position[i] + size, c[i], self.shift);
            }
        }

        // Face neighbours first, then edges, then corners
        for count in 1..=N as u32 {
            for m in 1..(1usize << N) {
                if m.count_ones() != count {
                    continue;
                }
                let bound: u64 = (0..N).filter(|&i| m & (1 << i) != 0).map(|i| near[i]).sum();
                if !best.reaches(bound) {
                    continue;
                }

                match slots[q ^ m] {
                    Slot::Empty => {}
                    Slot::Leaf(index) => self.offer_leaf(index, c, best),
                    Slot::Child(child) => {
                        let mut lo = *position;
                        for i in 0..N {
                            if m & (1 << i) != 0 {
                                lo[i] = sibling_lo[i];
                            }
                        }
                        if best.reaches(self.box_far_distance(c, &lo, size)) {
                            self.scan_full(child, c, best);
                        } else {
                            self.scan_partial(child, &lo, size, c, best);
                        }
                    }
                }
            }
        }

        (0..N).any(|i| {
            let node_lo = if q & (1 << i) != 0 {
                position[i] - size
            } else {
                position[i]
            };
            let node_hi = node_lo as u64 + 2 * size as u64;
            let below = node_lo > 0 && best.reaches(plane_distance(c[i], node_lo - 1, self.shift));
            let above = node_hi < self.color_max
                && best.reaches(plane_distance(node_hi as u32, c[i], self.shift));
            below || above
        })
    }
}
