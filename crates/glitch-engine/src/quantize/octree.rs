use std::collections::HashMap;

use tracing::{debug, warn};

use crate::buffer::PixelBuffer;
use crate::color::{compose, rgb_components, with_opaque_alpha};

include!(concat!(env!("OUT_DIR"), "/squares_lut.rs"));

/// Deepest level of the tree; a leaf at this level holds a single color.
pub const MAX_TREE_DEPTH: usize = 8;

/// Node count above which a whole level is pruned during insertion.
pub const MAX_NODES: usize = 266_817;

pub const MIN_COLORS: usize = 2;
pub const MAX_COLORS: usize = 255;

const ROOT: usize = 0;

/// Output of [`OctreeQuantizer::quantize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantized {
    /// The image redrawn with palette colors only, alpha forced to 255.
    pub buffer: PixelBuffer,
    /// Palette entries as opaque ARGB.
    pub colormap: Vec<u32>,
    /// Palette index of every pixel.
    pub indices: Vec<u8>,
}

/// Reduces an image to at most `max_colors` colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctreeQuantizer {
    max_colors: usize,
}

impl OctreeQuantizer {
    /// Quantizer producing at most `max_colors` colors.
    ///
    /// Values outside `[2, 255]` are clamped.
    pub fn new(max_colors: usize) -> Self {
        let clamped = max_colors.clamp(MIN_COLORS, MAX_COLORS);
        if clamped != max_colors {
            warn!(max_colors, clamped, "Palette size out of range, clamping");
        }
        Self {
            max_colors: clamped,
        }
    }

    pub fn max_colors(&self) -> usize {
        self.max_colors
    }

    /// Quantize `buffer`, leaving it untouched.
    ///
    /// An image that already has no more than `max_colors` distinct colors
    /// comes back unchanged apart from alpha, with those colors as the
    /// palette in order of first appearance.
    pub fn quantize(&self, buffer: &PixelBuffer) -> Quantized {
        if let Some(identity) = self.identity(buffer) {
            debug!(colors = identity.colormap.len(), "Image already within palette size");
            return identity;
        }

        let mut tree = Octree::new(self.max_colors, buffer.len());
        for &argb in buffer.pixels() {
            tree.insert(rgb_components(argb));
        }
        let populated = tree.live;
        tree.reduce_to(self.max_colors);
        let colormap = tree.build_colormap();

        let mut output = buffer.clone();
        let mut indices = Vec::with_capacity(buffer.len());
        let mut cache: HashMap<u32, u8> = HashMap::new();
        for pixel in output.pixels_mut() {
            let rgb = rgb_components(*pixel);
            let index = *cache
                .entry(*pixel & 0x00FF_FFFF)
                .or_insert_with(|| tree.nearest(rgb, &colormap));
            indices.push(index);
            *pixel = colormap[usize::from(index)];
        }

        debug!(
            max_colors = self.max_colors,
            palette = colormap.len(),
            nodes_before = populated,
            nodes_after = tree.live,
            depth = tree.depth,
            "Octree quantization complete"
        );
        Quantized {
            buffer: output,
            colormap,
            indices,
        }
    }

    fn identity(&self, buffer: &PixelBuffer) -> Option<Quantized> {
        let mut slots: HashMap<u32, u8> = HashMap::new();
        let mut colormap = Vec::new();
        let mut indices = Vec::with_capacity(buffer.len());
        for &argb in buffer.pixels() {
            let color = with_opaque_alpha(argb);
            let next = colormap.len();
            let index = match slots.get(&color) {
                Some(&index) => index,
                None => {
                    if next >= self.max_colors {
                        return None;
                    }
                    colormap.push(color);
                    slots.insert(color, next as u8);
                    next as u8
                }
            };
            indices.push(index);
        }
        let mut output = buffer.clone();
        for pixel in output.pixels_mut() {
            *pixel = with_opaque_alpha(*pixel);
        }
        Some(Quantized {
            buffer: output,
            colormap,
            indices,
        })
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: usize,
    children: [Option<usize>; 8],
    /// Octant of this node within its parent.
    id: u8,
    level: usize,
    /// Bit `i` set while child `i` is alive.
    census: u8,
    mid: [i32; 3],
    /// Pixel mass of the subtree, weighted by level.
    weight: u64,
    unique: u32,
    sums: [u64; 3],
    palette_index: Option<u8>,
}

impl Node {
    fn new(mid: [i32; 3], parent: usize, id: u8, level: usize) -> Self {
        Self {
            parent,
            children: [None; 8],
            id,
            level,
            census: 0,
            mid,
            weight: 0,
            unique: 0,
            sums: [0; 3],
            palette_index: None,
        }
    }

    fn octant(&self, rgb: [u8; 3]) -> usize {
        let [r, g, b] = rgb.map(i32::from);
        usize::from(r > self.mid[0])
            | usize::from(g > self.mid[1]) << 1
            | usize::from(b > self.mid[2]) << 2
    }

    fn live_children(&self) -> impl Iterator<Item = usize> + '_ {
        (0..8).filter_map(move |i| {
            if self.census & (1 << i) != 0 {
                self.children[i]
            } else {
                None
            }
        })
    }
}

/// Arena-backed octree. Nodes are never removed from the arena; pruning
/// clears the parent's census bit and folds the node's pixels upward.
struct Octree {
    nodes: Vec<Node>,
    /// Nodes reachable from the root, root excluded.
    live: usize,
    depth: usize,
    shift: [u32; MAX_TREE_DEPTH + 1],
}

impl Octree {
    fn new(max_colors: usize, pixel_count: usize) -> Self {
        let mut depth = 1;
        let mut mc = max_colors;
        while mc != 0 {
            mc >>= 2;
            depth += 1;
        }
        let depth = depth.min(MAX_TREE_DEPTH);

        // Weights shrink with pixel count so the root mass fits in 32 bits.
        let mut max_shift = 32u32.saturating_sub(usize::BITS - pixel_count.leading_zeros());
        let mut shift = [0; MAX_TREE_DEPTH + 1];
        for slot in shift.iter_mut().take(depth + 1) {
            *slot = max_shift;
            max_shift = max_shift.saturating_sub(1);
        }

        let mut root = Node::new([128; 3], ROOT, 0, 0);
        root.weight = u64::MAX;
        Self {
            nodes: vec![root],
            live: 0,
            depth,
            shift,
        }
    }

    fn insert(&mut self, rgb: [u8; 3]) {
        if self.live > MAX_NODES && self.depth > 1 {
            self.prune_level(ROOT);
            self.depth -= 1;
        }

        let mut node = ROOT;
        for level in 1..=self.depth {
            let id = self.nodes[node].octant(rgb);
            let child = match self.nodes[node].children[id] {
                Some(child) => child,
                None => {
                    let bisect = (1i32 << (MAX_TREE_DEPTH - level)) >> 1;
                    let parent_mid = self.nodes[node].mid;
                    let mut mid = [0; 3];
                    for (axis, m) in mid.iter_mut().enumerate() {
                        let offset = if id & (1 << axis) != 0 { bisect } else { -bisect };
                        *m = parent_mid[axis] + offset;
                    }
                    let child = self.nodes.len();
                    self.nodes.push(Node::new(mid, node, id as u8, level));
                    self.nodes[node].children[id] = Some(child);
                    self.nodes[node].census |= 1 << id;
                    self.live += 1;
                    child
                }
            };
            node = child;
            self.nodes[node].weight += 1u64 << self.shift[level];
        }

        let leaf = &mut self.nodes[node];
        leaf.unique += 1;
        for (sum, c) in leaf.sums.iter_mut().zip(rgb) {
            *sum += u64::from(c);
        }
    }

    fn prune_level(&mut self, node: usize) {
        let children: Vec<usize> = self.nodes[node].live_children().collect();
        for child in children {
            self.prune_level(child);
        }
        if self.nodes[node].level == self.depth {
            self.prune(node);
        }
    }

    /// Fold `node` into its parent and detach it.
    fn prune(&mut self, node: usize) {
        if node == ROOT {
            return;
        }
        let Node {
            parent,
            id,
            unique,
            sums,
            ..
        } = self.nodes[node];
        let parent = &mut self.nodes[parent];
        parent.census &= !(1 << id);
        parent.unique += unique;
        for (total, s) in parent.sums.iter_mut().zip(sums) {
            *total += s;
        }
        self.live -= 1;
    }

    fn colorful(&self) -> usize {
        self.count_colorful(ROOT)
    }

    fn count_colorful(&self, node: usize) -> usize {
        let own = usize::from(self.nodes[node].unique > 0);
        own + self.nodes[node]
            .live_children()
            .map(|child| self.count_colorful(child))
            .sum::<usize>()
    }

    /// Prune ever heavier subtrees until at most `max_colors` nodes hold
    /// pixels.
    fn reduce_to(&mut self, max_colors: usize) {
        let mut colors = self.colorful();
        let mut next_threshold = 1u64;
        while colors > max_colors {
            let threshold = next_threshold;
            next_threshold = u64::MAX;
            colors = 0;
            self.reduce(ROOT, threshold, &mut next_threshold, &mut colors);
        }
    }

    fn reduce(&mut self, node: usize, threshold: u64, next: &mut u64, colors: &mut usize) {
        let children: Vec<usize> = self.nodes[node].live_children().collect();
        for child in children {
            self.reduce(child, threshold, next, colors);
        }
        let current = &self.nodes[node];
        if node != ROOT && current.weight <= threshold {
            self.prune(node);
        } else {
            if current.unique > 0 {
                *colors += 1;
            }
            *next = (*next).min(current.weight);
        }
    }

    /// Assign palette slots in post-order and return the palette.
    fn build_colormap(&mut self) -> Vec<u32> {
        let mut colormap = Vec::new();
        self.assign(ROOT, &mut colormap);
        colormap
    }

    fn assign(&mut self, node: usize, colormap: &mut Vec<u32>) {
        let children: Vec<usize> = self.nodes[node].live_children().collect();
        for child in children {
            self.assign(child, colormap);
        }
        let current = &mut self.nodes[node];
        if current.unique > 0 {
            let n = u64::from(current.unique);
            let mean = current.sums.map(|s| ((s + n / 2) / n).min(255) as u8);
            current.palette_index = Some(colormap.len() as u8);
            colormap.push(compose(mean));
        }
    }

    /// Palette index closest to `rgb`.
    ///
    /// Descends as far as the pruned tree allows, then searches the subtree
    /// of the parent of the node reached.
    fn nearest(&self, rgb: [u8; 3], colormap: &[u32]) -> u8 {
        let mut node = ROOT;
        loop {
            let id = self.nodes[node].octant(rgb);
            if self.nodes[node].census & (1 << id) == 0 {
                break;
            }
            match self.nodes[node].children[id] {
                Some(child) => node = child,
                None => break,
            }
        }
        let mut best = (u32::MAX, 0u8);
        self.closest(self.nodes[node].parent, rgb, colormap, &mut best);
        best.1
    }

    fn closest(&self, node: usize, rgb: [u8; 3], colormap: &[u32], best: &mut (u32, u8)) {
        for child in self.nodes[node].live_children() {
            self.closest(child, rgb, colormap, best);
        }
        if let Some(index) = self.nodes[node].palette_index {
            let candidate = rgb_components(colormap[usize::from(index)]);
            let distance: u32 = candidate
                .iter()
                .zip(rgb)
                .map(|(&c, t)| SQUARES[(i32::from(c) - i32::from(t) + 255) as usize])
                .sum();
            if distance < best.0 {
                *best = (distance, index);
            }
        }
    }
}
