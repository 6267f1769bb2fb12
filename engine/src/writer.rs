//! File content layout (spec.md §4.6, L6).
//!
//! Lays a byte string across an inode's direct (≤12) and single-indirect
//! (≤256) blocks, matching `write_string_to_blocks`. Double and triple
//! indirection are never written by this engine (spec.md §6 Non-goals);
//! content beyond 12 + 256 blocks does not fit.

use crate::alloc;
use crate::error::{Error, Result};
use crate::ids::InodeNo;
use crate::image::Image;
use crate::layout::BLOCK_SIZE;

const DIRECT_COUNT: usize = 12;
const PTRS_PER_BLOCK: usize = 256;
const MAX_BYTES: usize = (DIRECT_COUNT + PTRS_PER_BLOCK) * BLOCK_SIZE;

/// Writes `content` as the inode's entire data, allocating blocks as
/// needed and recording `size`/`blocks` on the inode. The inode must be
/// freshly allocated with no existing data blocks.
pub fn write_content(image: &mut Image, inode_no: InodeNo, content: &[u8]) -> Result<()> {
    if content.len() > MAX_BYTES {
        return Err(Error::NoSpace);
    }

    image.inode_mut(inode_no.to_index()).size = content.len() as u32;

    let mut remaining = content;
    let mut direct_slot = 0usize;
    let mut blocks_used: u32 = 0;

    while !remaining.is_empty() && direct_slot < DIRECT_COUNT {
        let take = remaining.len().min(BLOCK_SIZE);
        let block_no = alloc::allocate_block(image)?;
        let block = image.block_mut(block_no);
        block.fill(0);
        block[..take].copy_from_slice(&remaining[..take]);
        image.inode_mut(inode_no.to_index()).i_block[direct_slot] = block_no.raw();
        direct_slot += 1;
        blocks_used += (BLOCK_SIZE / 512) as u32;
        remaining = &remaining[take..];
    }

    if !remaining.is_empty() {
        let indirect_no = alloc::allocate_block(image)?;
        {
            let block = image.block_mut(indirect_no);
            block.fill(0);
        }
        image.inode_mut(inode_no.to_index()).i_block[12] = indirect_no.raw();
        blocks_used += (BLOCK_SIZE / 512) as u32;

        let mut ptr_slot = 0usize;
        while !remaining.is_empty() {
            if ptr_slot >= PTRS_PER_BLOCK {
                return Err(Error::NoSpace);
            }
            let take = remaining.len().min(BLOCK_SIZE);
            let block_no = alloc::allocate_block(image)?;
            let block = image.block_mut(block_no);
            block.fill(0);
            block[..take].copy_from_slice(&remaining[..take]);
            image.write_indirect_ptr(indirect_no, ptr_slot, block_no);
            ptr_slot += 1;
            blocks_used += (BLOCK_SIZE / 512) as u32;
            remaining = &remaining[take..];
        }
    }

    image.inode_mut(inode_no.to_index()).blocks = blocks_used;
    Ok(())
}
