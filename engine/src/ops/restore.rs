//! `restore`: undelete a removed entry (spec.md §4.7, grounded on
//! `ext2_restore.c`).
//!
//! `remove_entry` never zeroes a non-first entry's header when it swallows
//! it into the preceding entry's `rec_len` — only the preceding entry's
//! `rec_len` changes. So a removed entry's inode number, name, and type
//! are still physically present in the slack the preceding live entry now
//! claims, provided no later `append_entry` call has overwritten that
//! space. This walks every live entry's slack looking for such a
//! tombstone whose name matches and whose inode and data blocks are still
//! unallocated, and revives the first one found.

use crate::alloc;
use crate::dirent;
use crate::error::{Error, Result};
use crate::image::Image;
use crate::layout::{min_rec_len, DIR_ENTRY_HEADER_SIZE, FT_DIR};
use crate::path;
use crate::walker;

pub fn restore(image: &mut Image, abs_path: &str) -> Result<()> {
    if !abs_path.starts_with('/') {
        return Err(Error::InvalidArgument);
    }
    if path::resolve(image, abs_path).is_ok() {
        return Err(Error::AlreadyExists);
    }

    let (parent_path, name) = path::split_parent(abs_path);
    let parent_no = path::resolve(image, &parent_path)?;
    let parent_inode = image.inode(parent_no.to_index());
    if !parent_inode.is_dir() {
        return Err(Error::NotADirectory);
    }
    let blocks = walker::data_blocks(image, parent_inode);

    for &block_no in &blocks {
        let entries = dirent::entries_in_block(image.block(block_no));
        for live in entries.iter().filter(|e| e.is_live()) {
            let true_len = min_rec_len(live.name_len as usize) as usize;
            let slack_start = live.offset + true_len;
            let slack_end = live.offset + live.rec_len as usize;
            if slack_end < slack_start + DIR_ENTRY_HEADER_SIZE {
                continue;
            }

            let candidate = dirent::read_entry_at(image.block(block_no), slack_start);
            let Some(candidate_inode) = candidate.inode else {
                continue;
            };
            if candidate.name != name {
                continue;
            }
            if alloc::is_inode_allocated(image, candidate_inode) {
                continue;
            }

            if candidate.file_type == FT_DIR {
                return Err(Error::IsADirectory);
            }
            let inode = image.inode(candidate_inode.to_index());
            let data_blocks = walker::data_blocks(image, inode);
            if data_blocks.iter().any(|&b| alloc::is_block_allocated(image, b)) {
                continue;
            }

            dirent::revive_entry(image, block_no, live, slack_start);
            alloc::restore_inode(image, candidate_inode);
            for &b in &data_blocks {
                alloc::restore_block(image, b);
            }
            let revived = image.inode_mut(candidate_inode.to_index());
            revived.dtime = 0;
            revived.links_count += 1;
            return Ok(());
        }
    }

    Err(Error::NotFound)
}
