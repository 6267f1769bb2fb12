//! Directory entry codec and block layout (spec.md §4.4, L4).
//!
//! A directory's data is a sequence of one or more 1024-byte blocks, each
//! entirely tiled by variable-length entries whose `rec_len` sums to
//! exactly 1024 within the block. Insertion and removal both work by
//! reusing the "slack" between an entry's true size and its `rec_len`,
//! the same trick the original plays in `new_dir_entry`/`rm_dir_entry`.

use crate::alloc;
use crate::error::{Error, Result};
use crate::ids::{BlockNo, InodeNo};
use crate::image::Image;
use crate::layout::{min_rec_len, DirEntryHeader, BLOCK_SIZE, DIR_ENTRY_HEADER_SIZE};

/// A decoded view of one entry: its header plus name and the byte offset
/// of the header within the block, so callers can write back in place.
#[derive(Debug, Clone)]
pub struct Entry {
    pub offset: usize,
    pub inode: Option<InodeNo>,
    pub rec_len: u16,
    pub name_len: u8,
    pub file_type: u8,
    pub name: String,
}

impl Entry {
    pub fn is_live(&self) -> bool {
        self.inode.is_some()
    }
}

fn read_entry(block: &[u8], offset: usize) -> Entry {
    let header = unsafe { &*(block.as_ptr().add(offset) as *const DirEntryHeader) };
    let name_len = header.name_len as usize;
    let name_bytes = &block[offset + DIR_ENTRY_HEADER_SIZE..offset + DIR_ENTRY_HEADER_SIZE + name_len];
    Entry {
        offset,
        inode: InodeNo::from_raw(header.inode),
        rec_len: header.rec_len,
        name_len: header.name_len,
        file_type: header.file_type,
        name: String::from_utf8_lossy(name_bytes).into_owned(),
    }
}

fn write_header(block: &mut [u8], offset: usize, inode: u32, rec_len: u16, name_len: u8, file_type: u8) {
    let header = unsafe { &mut *(block.as_mut_ptr().add(offset) as *mut DirEntryHeader) };
    header.inode = inode;
    header.rec_len = rec_len;
    header.name_len = name_len;
    header.file_type = file_type;
}

/// Reads one entry's header+name at an arbitrary byte offset, without
/// assuming it is reachable by following `rec_len` from the block start.
/// Used by `restore` to look inside a live entry's slack for a tombstone
/// left behind by `remove_entry`.
pub fn read_entry_at(block: &[u8], offset: usize) -> Entry {
    read_entry(block, offset)
}

/// Every entry (live or tombstoned) in one directory block, in on-disk order.
pub fn entries_in_block(block: &[u8]) -> Vec<Entry> {
    let mut out = Vec::new();
    let mut offset = 0usize;
    while offset < BLOCK_SIZE {
        let entry = read_entry(block, offset);
        let rec_len = entry.rec_len as usize;
        if rec_len == 0 {
            break;
        }
        offset += rec_len;
        out.push(entry);
    }
    out
}

/// Every live (non-tombstoned) entry across all of a directory's direct
/// data blocks. Mirrors the original's direct-only search limitation
/// (spec.md §9): indirect directory blocks are never consulted.
pub fn live_entries(image: &Image, data_blocks: &[BlockNo]) -> Vec<(BlockNo, Entry)> {
    data_blocks
        .iter()
        .flat_map(|&b| {
            entries_in_block(image.block(b))
                .into_iter()
                .filter(Entry::is_live)
                .map(move |e| (b, e))
        })
        .collect()
}

/// Finds a live entry by name among a directory's data blocks.
pub fn find_by_name(image: &Image, data_blocks: &[BlockNo], name: &str) -> Option<(BlockNo, Entry)> {
    live_entries(image, data_blocks)
        .into_iter()
        .find(|(_, e)| e.name == name)
}

/// Appends a new entry named `name` pointing at `child` to the directory
/// occupying `data_blocks` (the inode's direct `i_block` entries, already
/// resolved). If the last block has enough slack after its final entry,
/// the entry is shrunk to its true size and the new entry takes the
/// reclaimed space; otherwise a fresh block is allocated, appended to
/// `i_block`, and initialized as a single entry spanning the whole block.
///
/// Only ever touches direct blocks, matching the original's `// TODO:
/// handle indirection at i = 11` limitation.
pub fn append_entry(
    image: &mut Image,
    dir_inode: InodeNo,
    data_blocks: &[BlockNo],
    child: InodeNo,
    name: &str,
    file_type: u8,
) -> Result<()> {
    let needed = min_rec_len(name.len());

    if let Some(&last_block) = data_blocks.last() {
        let entries = entries_in_block(image.block(last_block));
        if let Some(last) = entries.last() {
            let true_len = min_rec_len(last.name_len as usize);
            let slack = last.rec_len - true_len;
            if slack >= needed {
                let block = image.block_mut(last_block);
                write_header(
                    block,
                    last.offset,
                    last.inode.map(InodeNo::raw).unwrap_or(0),
                    true_len,
                    last.name_len,
                    last.file_type,
                );
                let new_offset = last.offset + true_len as usize;
                write_header(block, new_offset, child.raw(), slack, name.len() as u8, file_type);
                block[new_offset + DIR_ENTRY_HEADER_SIZE..new_offset + DIR_ENTRY_HEADER_SIZE + name.len()]
                    .copy_from_slice(name.as_bytes());
                bump_links(image, child);
                return Ok(());
            }
        }
    }

    // No slack (or no blocks yet): allocate a fresh direct block.
    let idx = data_blocks.len();
    if idx >= 12 {
        // Direct blocks exhausted; this engine never extends directories
        // into indirect blocks (spec.md §9).
        return Err(Error::NoSpace);
    }
    let new_block = alloc::allocate_block(image)?;
    {
        let block = image.block_mut(new_block);
        block.fill(0);
        write_header(block, 0, child.raw(), BLOCK_SIZE as u16, name.len() as u8, file_type);
        block[DIR_ENTRY_HEADER_SIZE..DIR_ENTRY_HEADER_SIZE + name.len()].copy_from_slice(name.as_bytes());
    }
    let dir_inode_mut = image.inode_mut(dir_inode.to_index());
    dir_inode_mut.i_block[idx] = new_block.raw();
    dir_inode_mut.blocks += BLOCK_SIZE as u32 / 512;
    dir_inode_mut.size += BLOCK_SIZE as u32;
    bump_links(image, child);
    Ok(())
}

/// Writes `.` and `..` as the sole two entries of an already-allocated,
/// freshly zeroed directory block. Used only by the fixture builder,
/// which wires the block into `i_block[0]` itself before calling this
/// (so `append_entry`'s own block-allocation path would double-book it).
pub fn write_bootstrap_entries(
    image: &mut Image,
    block_no: BlockNo,
    dot_target: InodeNo,
    dot_rec_len: u16,
    dotdot_target: InodeNo,
    file_type: u8,
) {
    let dotdot_rec_len = BLOCK_SIZE as u16 - dot_rec_len;
    {
        let block = image.block_mut(block_no);
        write_header(block, 0, dot_target.raw(), dot_rec_len, 1, file_type);
        block[DIR_ENTRY_HEADER_SIZE] = b'.';
        write_header(block, dot_rec_len as usize, dotdot_target.raw(), dotdot_rec_len, 2, file_type);
        let off = dot_rec_len as usize + DIR_ENTRY_HEADER_SIZE;
        block[off] = b'.';
        block[off + 1] = b'.';
    }
    image.inode_mut(dot_target.to_index()).links_count += 1;
    image.inode_mut(dotdot_target.to_index()).links_count += 1;
}

fn bump_links(image: &mut Image, child: InodeNo) {
    image.inode_mut(child.to_index()).links_count += 1;
}

/// Reclaims a tombstoned entry sitting in `live.offset`'s slack, at byte
/// offset `candidate_offset`, giving it the rest of `live`'s `rec_len`
/// and shrinking `live` down to its true size. Only valid when
/// `candidate_offset` is exactly where `live`'s slack begins (this
/// engine only restores the immediately-following tombstone, not ones
/// further back in a slack region that has absorbed more than one
/// removal — see SPEC_FULL.md's restore note).
pub fn revive_entry(image: &mut Image, block_no: BlockNo, live: &Entry, candidate_offset: usize) {
    let true_len = min_rec_len(live.name_len as usize);
    let reclaimed = live.rec_len - true_len;
    let block = image.block_mut(block_no);
    write_header(
        block,
        live.offset,
        live.inode.map(InodeNo::raw).unwrap_or(0),
        true_len,
        live.name_len,
        live.file_type,
    );
    // The candidate's inode/name_len/file_type/name bytes are already in
    // place from before its removal; only rec_len needs updating.
    let candidate = read_entry(block, candidate_offset);
    write_header(
        block,
        candidate_offset,
        candidate.inode.map(InodeNo::raw).unwrap_or(0),
        reclaimed,
        candidate.name_len,
        candidate.file_type,
    );
}

/// Removes the entry named `name` from one of `data_blocks`. If it is the
/// first entry in its block, its `inode` field is zeroed in place
/// (tombstoned, preserved for `restore`); otherwise the preceding entry's
/// `rec_len` is extended to swallow it. The target's link count is
/// decremented; if it reaches zero, its data blocks are freed and the
/// inode itself is released. `dtime` is deliberately left untouched,
/// matching the original's removal path.
pub fn remove_entry(image: &mut Image, data_blocks: &[BlockNo], name: &str) -> Result<()> {
    for &b in data_blocks {
        let entries = entries_in_block(image.block(b));
        let Some(pos) = entries.iter().position(|e| e.is_live() && e.name == name) else {
            continue;
        };
        let target = &entries[pos];
        let target_inode = target.inode.expect("checked is_live");

        if pos == 0 {
            let block = image.block_mut(b);
            write_header(block, target.offset, 0, target.rec_len, target.name_len, target.file_type);
        } else {
            let prev = &entries[pos - 1];
            let block = image.block_mut(b);
            let new_rec_len = prev.rec_len + target.rec_len;
            write_header(block, prev.offset, prev.inode.map(InodeNo::raw).unwrap_or(0), new_rec_len, prev.name_len, prev.file_type);
        }

        let inode = image.inode_mut(target_inode.to_index());
        inode.links_count -= 1;
        if inode.links_count == 0 {
            let inode_copy = *image.inode(target_inode.to_index());
            for block_no in crate::walker::all_occupied_blocks(image, &inode_copy) {
                alloc::free_block(image, block_no);
            }
            alloc::free_inode(image, target_inode);
        }
        return Ok(());
    }
    Err(Error::NotFound)
}
