//! Oct-tree storage and construction.
//!
//! Nodes live in a flat arena: node `n` owns slots `n * 2^N .. (n + 1) * 2^N`
//! where `N` is the channel count. Each slot is a tagged [`Slot`], so a leaf
//! index can never be mistaken for a child reference.

/// Content of one octant of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    /// No palette color falls in this octant.
    #[default]
    Empty,
    /// Exactly one palette color (by index) falls in this octant.
    Leaf(u32),
    /// Several palette colors fall in this octant; the value is the child
    /// node id.
    Child(u32),
}

/// Octant of `color` at subdivision level `pass`: bit `i` of the result is
/// bit `pass` of channel `i`.
#[inline]
pub fn octant(color: &[u32], pass: u32) -> usize {
    color
        .iter()
        .enumerate()
        .fold(0, |q, (i, &c)| q | ((((c >> pass) & 1) as usize) << i))
}

/// Prebuilt spatial index over a palette.
///
/// Built once from bias-shifted palette colors and read-only afterwards.
#[derive(Debug, Clone)]
pub struct OctTree {
    slots: Vec<Slot>,
    channels: usize,
    sample_bits: u32,
    depth: u32,
}

impl OctTree {
    /// Id of the root node.
    pub const ROOT: u32 = 0;

    /// Build a tree over `colors` (interleaved, `channels` values per entry,
    /// each in `0..2^sample_bits`), subdividing at most `depth` levels.
    ///
    /// Colors are inserted in index order. A color becomes a leaf at the
    /// first level where no earlier color shares its octant. Colors that
    /// still collide at the depth limit keep the earlier entry.
    pub fn build(colors: &[u32], channels: usize, sample_bits: u32, depth: u32) -> Self {
        debug_assert!(channels == 3 || channels == 4);
        debug_assert!(depth >= 1 && depth <= sample_bits);
        debug_assert!(colors.len() % channels == 0);

        let mut tree = Self {
            slots: vec![Slot::Empty; 1 << channels],
            channels,
            sample_bits,
            depth,
        };
        for index in 0..colors.len() / channels {
            tree.insert(colors, index as u32);
        }
        tree
    }

    fn insert(&mut self, colors: &[u32], index: u32) {
        let channels = self.channels;
        let color = &colors[index as usize * channels..][..channels];
        let min_pass = self.min_pass();
        let mut node = Self::ROOT;
        let mut pass = self.sample_bits - 1;

        loop {
            let at = self.slot_offset(node, octant(color, pass));
            match self.slots[at] {
                Slot::Empty => {
                    self.slots[at] = Slot::Leaf(index);
                    return;
                }
                Slot::Child(child) => {
                    node = child;
                    pass -= 1;
                }
                Slot::Leaf(other) => {
                    let other_color = &colors[other as usize * channels..][..channels];
                    let same_cell = color
                        .iter()
                        .zip(other_color)
                        .all(|(a, b)| a >> min_pass == b >> min_pass);
                    if pass == min_pass || same_cell {
                        return;
                    }

                    let child = self.push_node();
                    self.slots[at] = Slot::Child(child);
                    let moved = self.slot_offset(child, octant(other_color, pass - 1));
                    self.slots[moved] = Slot::Leaf(other);
                    node = child;
                    pass -= 1;
                }
            }
        }
    }

    fn push_node(&mut self) -> u32 {
        let id = self.node_count() as u32;
        self.slots
            .resize(self.slots.len() + (1 << self.channels), Slot::Empty);
        id
    }

    #[inline]
    fn slot_offset(&self, node: u32, q: usize) -> usize {
        ((node as usize) << self.channels) + q
    }

    /// Slot `q` of `node`.
    #[inline]
    pub fn slot(&self, node: u32, q: usize) -> Slot {
        self.slots[self.slot_offset(node, q)]
    }

    /// All slots of `node`, indexed by octant.
    #[inline]
    pub fn slots(&self, node: u32) -> &[Slot] {
        let start = self.slot_offset(node, 0);
        &self.slots[start..start + (1 << self.channels)]
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Bits per bias-shifted channel value (8 or 16).
    #[inline]
    pub fn sample_bits(&self) -> u32 {
        self.sample_bits
    }

    /// Maximum number of subdivision levels.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Lowest `pass` a leaf can sit at.
    #[inline]
    pub fn min_pass(&self) -> u32 {
        self.sample_bits - self.depth
    }

    pub fn node_count(&self) -> usize {
        self.slots.len() >> self.channels
    }

    pub fn leaf_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Leaf(_)))
            .count()
    }
}
