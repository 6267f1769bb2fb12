//! Allocation (spec.md §4.3, L2).
//!
//! Every allocation or release touches three things together: the bitmap
//! bit, the superblock's free count, and the group descriptor's free
//! count. The original keeps these three in lockstep by hand in
//! `new_inode`/`new_block`/`rm_inode`/`rm_block`; this module is the one
//! place that's allowed to touch them, so nothing else can let them drift.

use crate::bitmap;
use crate::error::{Error, Result};
use crate::ids::{BlockIndex, BlockNo, InodeIndex, InodeNo};
use crate::image::Image;
use crate::layout::FIRST_NON_RESERVED_INODE;

/// Inode index 1 (inode number 2) is root; indices 0..9 are otherwise
/// reserved for filesystem bookkeeping per spec.md §3's reserved-inode
/// rule (root excepted).
fn is_reserved(idx: InodeIndex) -> bool {
    let no = idx.to_no().raw();
    no != 2 && no < FIRST_NON_RESERVED_INODE
}

pub fn allocate_inode(image: &mut Image) -> Result<InodeNo> {
    let inodes_count = image.superblock().inodes_count;
    let idx = loop {
        let candidate = bitmap::scan_free(image.inode_bitmap(), inodes_count)
            .ok_or(Error::NoSpace)
            .map(InodeIndex)?;
        if !is_reserved(candidate) {
            break candidate;
        }
        bitmap::set(image.inode_bitmap_mut(), candidate.0);
    };
    bitmap::set(image.inode_bitmap_mut(), idx.0);
    image.superblock_mut().free_inodes_count -= 1;
    image.group_desc_mut().free_inodes_count -= 1;
    Ok(idx.to_no())
}

pub fn free_inode(image: &mut Image, no: InodeNo) {
    let idx = no.to_index();
    bitmap::clear(image.inode_bitmap_mut(), idx.0);
    image.superblock_mut().free_inodes_count += 1;
    image.group_desc_mut().free_inodes_count += 1;
}

pub fn allocate_block(image: &mut Image) -> Result<BlockNo> {
    let blocks_count = image.superblock().blocks_count;
    let idx = bitmap::scan_free(image.block_bitmap(), blocks_count)
        .ok_or(Error::NoSpace)
        .map(BlockIndex)?;
    bitmap::set(image.block_bitmap_mut(), idx.0);
    image.superblock_mut().free_blocks_count -= 1;
    image.group_desc_mut().free_blocks_count -= 1;
    Ok(idx.to_no())
}

pub fn free_block(image: &mut Image, no: BlockNo) {
    let idx = no.to_index();
    bitmap::clear(image.block_bitmap_mut(), idx.0);
    image.superblock_mut().free_blocks_count += 1;
    image.group_desc_mut().free_blocks_count += 1;
}

pub fn is_inode_allocated(image: &Image, no: InodeNo) -> bool {
    bitmap::is_set(image.inode_bitmap(), no.to_index().0)
}

pub fn is_block_allocated(image: &Image, no: BlockNo) -> bool {
    bitmap::is_set(image.block_bitmap(), no.to_index().0)
}

pub fn mark_inode_allocated(image: &mut Image, no: InodeNo) {
    bitmap::set(image.inode_bitmap_mut(), no.to_index().0);
}

pub fn mark_block_allocated(image: &mut Image, no: BlockNo) {
    bitmap::set(image.block_bitmap_mut(), no.to_index().0);
}

/// Marks a previously-freed inode allocated again and reconciles the free
/// counters, as `restore` does when reviving a tombstoned entry (distinct
/// from `allocate_inode`, which picks the bit itself rather than being
/// told which one to reclaim).
pub fn restore_inode(image: &mut Image, no: InodeNo) {
    mark_inode_allocated(image, no);
    image.superblock_mut().free_inodes_count -= 1;
    image.group_desc_mut().free_inodes_count -= 1;
}

pub fn restore_block(image: &mut Image, no: BlockNo) {
    mark_block_allocated(image, no);
    image.superblock_mut().free_blocks_count -= 1;
    image.group_desc_mut().free_blocks_count -= 1;
}
