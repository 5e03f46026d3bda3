//! Sample blocks and the buffer arena shared by every compiled unit.
//!
//! Every output port of every unit owns exactly one [`Block`] in the
//! [`BufferArena`]. Input ports never own arena slots; they hold
//! [`BufferId`] handles to other units' outputs and copy (or sum) them into a
//! unit-local block right before the unit computes.
//!
//! Blocks are allocated once at compile time and reused for the lifetime of
//! the loaded graph. Nothing in this module allocates after compilation.

use core::ops::Range;

/// Number of samples processed per block.
pub const BLOCK_SIZE: usize = 128;

/// One block of samples.
pub type Block = [f32; BLOCK_SIZE];

/// A silent block.
pub const SILENCE: Block = [0.0; BLOCK_SIZE];

/// Handle to a block inside a [`BufferArena`].
///
/// Handles are assigned sequentially at compile time and are only meaningful
/// for the arena that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub(crate) u32);

impl BufferId {
    /// Returns the raw slot index.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for BufferId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "buf[{}]", self.0)
    }
}

/// Flat pool of fixed-size blocks indexed by [`BufferId`].
///
/// A unit's output ports are allocated as one contiguous run, so the block
/// scheduler can hand a unit all of its outputs as a single `&mut [Block]`.
#[derive(Debug, Default)]
pub struct BufferArena {
    blocks: Vec<Block>,
}

impl BufferArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Allocates one zero-filled block and returns its handle.
    pub fn allocate(&mut self) -> BufferId {
        let id = BufferId(self.blocks.len() as u32);
        self.blocks.push(SILENCE);
        id
    }

    /// Allocates `count` contiguous zero-filled blocks.
    ///
    /// Returns the handle of the first block; the rest follow in order.
    pub fn allocate_run(&mut self, count: usize) -> BufferId {
        let first = BufferId(self.blocks.len() as u32);
        self.blocks.extend(core::iter::repeat_n(SILENCE, count));
        first
    }

    /// Returns the number of allocated blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if no block has been allocated.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the block behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle was not issued by this arena.
    #[inline]
    pub fn get(&self, id: BufferId) -> &Block {
        &self.blocks[id.0 as usize]
    }

    /// Returns the block behind a handle for writing.
    ///
    /// # Panics
    ///
    /// Panics if the handle was not issued by this arena.
    #[inline]
    pub fn get_mut(&mut self, id: BufferId) -> &mut Block {
        &mut self.blocks[id.0 as usize]
    }

    /// Returns a contiguous run of blocks for writing.
    #[inline]
    pub fn run_mut(&mut self, first: BufferId, count: usize) -> &mut [Block] {
        &mut self.blocks[Self::span(first, count)]
    }

    /// Returns a contiguous run of blocks.
    #[inline]
    pub fn run(&self, first: BufferId, count: usize) -> &[Block] {
        &self.blocks[Self::span(first, count)]
    }

    /// Copies the contents of `src` into `dst`.
    #[inline]
    pub fn copy(&mut self, src: BufferId, dst: BufferId) {
        let block = self.blocks[src.0 as usize];
        self.blocks[dst.0 as usize] = block;
    }

    fn span(first: BufferId, count: usize) -> Range<usize> {
        let start = first.0 as usize;
        start..start + count
    }
}

/// Adds `src` into `dst` sample by sample.
#[inline]
pub fn accumulate(dst: &mut Block, src: &Block) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d += *s;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_is_zero_filled_and_sequential() {
        let mut arena = BufferArena::new();
        let a = arena.allocate();
        let b = arena.allocate();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert!(arena.get(a).iter().all(|&s| s == 0.0));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn run_is_contiguous() {
        let mut arena = BufferArena::new();
        arena.allocate();
        let first = arena.allocate_run(2);
        assert_eq!(first.index(), 1);
        assert_eq!(arena.len(), 3);

        let run = arena.run_mut(first, 2);
        run[0][0] = 1.0;
        run[1][0] = 2.0;
        assert_eq!(arena.get(BufferId(1))[0], 1.0);
        assert_eq!(arena.get(BufferId(2))[0], 2.0);
    }

    #[test]
    fn empty_run() {
        let mut arena = BufferArena::new();
        let first = arena.allocate_run(0);
        assert!(arena.run_mut(first, 0).is_empty());
        assert!(arena.is_empty());
    }

    #[test]
    fn copy_between_blocks() {
        let mut arena = BufferArena::new();
        let a = arena.allocate();
        let b = arena.allocate();
        arena.get_mut(a).fill(0.5);
        arena.copy(a, b);
        assert!(arena.get(b).iter().all(|&s| s == 0.5));
        assert!(arena.get(a).iter().all(|&s| s == 0.5));
    }

    #[test]
    fn accumulate_sums() {
        let mut dst = [1.0; BLOCK_SIZE];
        let src = [0.25; BLOCK_SIZE];
        accumulate(&mut dst, &src);
        assert!(dst.iter().all(|&s| s == 1.25));
    }
}
