//! Image Access (spec.md §4.1, L0).
//!
//! Wraps the 128 KiB mutable byte buffer the rest of the engine operates
//! on. Superblock and group-descriptor views sit at fixed block offsets;
//! bitmap and inode-table locations are read from the group descriptor on
//! every call rather than cached, per spec.md §9's note that structured
//! views must be recomputed from the buffer base after any allocator call
//! rather than held across mutations.

use crate::error::{Error, Result};
use crate::ids::{BlockIndex, BlockNo, InodeIndex};
use crate::layout::{
    GroupDesc, Inode, Superblock, BLOCK_SIZE, GROUP_DESC_OFFSET, IMAGE_SIZE, SUPERBLOCK_OFFSET,
};

/// A borrowed handle onto the image buffer. No module-global state; every
/// operation takes one of these explicitly (spec.md §9).
pub struct Image<'a> {
    bytes: &'a mut [u8],
}

impl<'a> Image<'a> {
    /// Wraps a buffer as an ext2 image. The buffer must be exactly
    /// [`IMAGE_SIZE`] bytes; this is the host provider's contract, not
    /// something this engine negotiates.
    pub fn new(bytes: &'a mut [u8]) -> Self {
        assert_eq!(bytes.len(), IMAGE_SIZE, "image buffer must be 128 KiB");
        Self { bytes }
    }

    fn base(&self) -> *mut u8 {
        self.bytes.as_ptr() as *mut u8
    }

    pub fn superblock(&self) -> &Superblock {
        unsafe { &*(self.base().add(SUPERBLOCK_OFFSET) as *const Superblock) }
    }

    pub fn superblock_mut(&mut self) -> &mut Superblock {
        unsafe { &mut *(self.base().add(SUPERBLOCK_OFFSET) as *mut Superblock) }
    }

    pub fn group_desc(&self) -> &GroupDesc {
        unsafe { &*(self.base().add(GROUP_DESC_OFFSET) as *const GroupDesc) }
    }

    pub fn group_desc_mut(&mut self) -> &mut GroupDesc {
        unsafe { &mut *(self.base().add(GROUP_DESC_OFFSET) as *mut GroupDesc) }
    }

    /// Size, in bytes, of the inode bitmap (one full block, as laid out by
    /// spec.md §3 — always big enough for `inodes_count` bits at this
    /// image's scale).
    fn inode_bitmap_len(&self) -> usize {
        BLOCK_SIZE
    }

    fn block_bitmap_len(&self) -> usize {
        BLOCK_SIZE
    }

    pub fn inode_bitmap(&self) -> &[u8] {
        let off = self.group_desc().inode_bitmap as usize * BLOCK_SIZE;
        let len = self.inode_bitmap_len();
        &self.bytes[off..off + len]
    }

    pub fn inode_bitmap_mut(&mut self) -> &mut [u8] {
        let off = self.group_desc().inode_bitmap as usize * BLOCK_SIZE;
        let len = self.inode_bitmap_len();
        &mut self.bytes[off..off + len]
    }

    pub fn block_bitmap(&self) -> &[u8] {
        let off = self.group_desc().block_bitmap as usize * BLOCK_SIZE;
        let len = self.block_bitmap_len();
        &self.bytes[off..off + len]
    }

    pub fn block_bitmap_mut(&mut self) -> &mut [u8] {
        let off = self.group_desc().block_bitmap as usize * BLOCK_SIZE;
        let len = self.block_bitmap_len();
        &mut self.bytes[off..off + len]
    }

    fn inode_offset(&self, idx: InodeIndex) -> usize {
        let table_block = self.group_desc().inode_table as usize;
        let inode_size = self.superblock().inode_size();
        table_block * BLOCK_SIZE + idx.0 as usize * inode_size
    }

    pub fn inode(&self, idx: InodeIndex) -> &Inode {
        let off = self.inode_offset(idx);
        unsafe { &*(self.base().add(off) as *const Inode) }
    }

    pub fn inode_mut(&mut self, idx: InodeIndex) -> &mut Inode {
        let off = self.inode_offset(idx);
        unsafe { &mut *(self.base().add(off) as *mut Inode) }
    }

    /// Returns the 1024-byte block at the given 1-based block number.
    pub fn block(&self, no: BlockNo) -> &[u8] {
        let idx: BlockIndex = no.to_index();
        let off = idx.0 as usize * BLOCK_SIZE;
        &self.bytes[off..off + BLOCK_SIZE]
    }

    pub fn block_mut(&mut self, no: BlockNo) -> &mut [u8] {
        let idx: BlockIndex = no.to_index();
        let off = idx.0 as usize * BLOCK_SIZE;
        &mut self.bytes[off..off + BLOCK_SIZE]
    }

    /// Reads a little-endian `u32` block pointer at `index` within an
    /// indirect block (256 pointers per 1024-byte block).
    pub fn read_indirect_ptr(&self, block: BlockNo, index: usize) -> Option<BlockNo> {
        let blk = self.block(block);
        let off = index * 4;
        let raw = u32::from_le_bytes(blk[off..off + 4].try_into().unwrap());
        BlockNo::from_raw(raw)
    }

    pub fn write_indirect_ptr(&mut self, block: BlockNo, index: usize, ptr: BlockNo) {
        let blk = self.block_mut(block);
        let off = index * 4;
        blk[off..off + 4].copy_from_slice(&ptr.raw().to_le_bytes());
    }
}

/// Verifies the buffer looks like a sane image for this engine before any
/// operation touches it (signature check only; deeper consistency is the
/// checker's job per spec.md §4.8).
pub fn sanity_check(image: &Image) -> Result<()> {
    if image.superblock().signature != crate::layout::EXT2_SIGNATURE {
        return Err(Error::InvalidArgument);
    }
    Ok(())
}
