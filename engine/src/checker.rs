//! Consistency checker (spec.md §4.8, L8), grounded on `ext2_checker.c`.
//!
//! Five independent reconciliation passes, each idempotent: running the
//! checker twice in a row produces zero fixes on the second pass. The
//! directory walk skips `.`, `..`, and reserved inodes, matching the
//! original's recursive `check_dir_entry`.

use crate::alloc;
use crate::dirent;
use crate::ids::InodeNo;
use crate::image::Image;
use crate::layout::{FT_DIR, FT_REG_FILE, FT_SYMLINK, ROOT_INODE_NO, S_IFDIR, S_IFLNK, S_IFREG};
use crate::walker;

#[derive(Debug, Default, Clone)]
pub struct Report {
    pub type_mismatches_fixed: u32,
    pub unmarked_inodes_fixed: u32,
    pub stale_dtimes_fixed: u32,
    pub unmarked_blocks_fixed: u32,
    pub inode_count_fixed: bool,
    pub block_count_fixed: bool,
    pub group_inode_count_fixed: bool,
    pub group_block_count_fixed: bool,
}

impl Report {
    pub fn total_fixes(&self) -> u32 {
        self.type_mismatches_fixed
            + self.unmarked_inodes_fixed
            + self.stale_dtimes_fixed
            + self.unmarked_blocks_fixed
            + self.inode_count_fixed as u32
            + self.block_count_fixed as u32
            + self.group_inode_count_fixed as u32
            + self.group_block_count_fixed as u32
    }
}

fn is_reserved_or_dotted(name: &str, idx: crate::ids::InodeIndex) -> bool {
    name == "." || name == ".." || {
        let no = idx.to_no().raw();
        no != ROOT_INODE_NO && no < crate::layout::FIRST_NON_RESERVED_INODE
    }
}

fn expected_file_type(mode_type: u16) -> Option<u8> {
    match mode_type {
        t if t == S_IFDIR => Some(FT_DIR),
        t if t == S_IFREG => Some(FT_REG_FILE),
        t if t == S_IFLNK => Some(FT_SYMLINK),
        _ => None,
    }
}

pub fn check(image: &mut Image) -> Report {
    let mut report = Report::default();

    let root_no = InodeNo::from_raw(ROOT_INODE_NO).expect("root inode number nonzero");
    check_dir(image, root_no, &mut report);

    reconcile_counts(image, &mut report);
    report
}

fn check_dir(image: &mut Image, dir_no: InodeNo, report: &mut Report) {
    let dir_inode = *image.inode(dir_no.to_index());
    if !dir_inode.is_dir() {
        return;
    }
    let blocks = walker::data_blocks(image, &dir_inode);

    let mut subdirs = Vec::new();
    for (block_no, entry) in dirent::live_entries(image, &blocks) {
        let entry_inode_no = entry.inode.expect("live entry has an inode");
        let idx = entry_inode_no.to_index();

        if is_reserved_or_dotted(&entry.name, idx) {
            continue;
        }

        fix_inode_bit(image, entry_inode_no, report);

        let inode = *image.inode(idx);
        if let Some(expected) = expected_file_type(inode.file_type()) {
            if expected != entry.file_type {
                set_entry_file_type(image, block_no, entry.offset, expected);
                report.type_mismatches_fixed += 1;
            }
        }

        if inode.dtime != 0 {
            image.inode_mut(idx).dtime = 0;
            report.stale_dtimes_fixed += 1;
        }

        let occupied = walker::all_occupied_blocks(image, &inode);
        let mut fixed_here = 0u32;
        for b in occupied {
            if !alloc::is_block_allocated(image, b) {
                alloc::mark_block_allocated(image, b);
                fixed_here += 1;
            }
        }
        report.unmarked_blocks_fixed += fixed_here;

        if inode.is_dir() {
            subdirs.push(entry_inode_no);
        }
    }

    for sub in subdirs {
        check_dir(image, sub, report);
    }
}

fn fix_inode_bit(image: &mut Image, no: InodeNo, report: &mut Report) {
    if !alloc::is_inode_allocated(image, no) {
        alloc::mark_inode_allocated(image, no);
        report.unmarked_inodes_fixed += 1;
    }
}

fn set_entry_file_type(image: &mut Image, block_no: crate::ids::BlockNo, offset: usize, file_type: u8) {
    let block = image.block_mut(block_no);
    block[offset + 7] = file_type;
}

fn reconcile_counts(image: &mut Image, report: &mut Report) {
    let inodes_count = image.superblock().inodes_count;
    let blocks_count = image.superblock().blocks_count;

    let free_inodes = (0..inodes_count)
        .filter(|&i| !crate::bitmap::is_set(image.inode_bitmap(), i))
        .count() as u32;
    let free_blocks = (0..blocks_count)
        .filter(|&i| !crate::bitmap::is_set(image.block_bitmap(), i))
        .count() as u32;

    if image.superblock().free_inodes_count != free_inodes {
        image.superblock_mut().free_inodes_count = free_inodes;
        report.inode_count_fixed = true;
    }
    if image.superblock().free_blocks_count != free_blocks {
        image.superblock_mut().free_blocks_count = free_blocks;
        report.block_count_fixed = true;
    }
    if image.group_desc().free_inodes_count != free_inodes as u16 {
        image.group_desc_mut().free_inodes_count = free_inodes as u16;
        report.group_inode_count_fixed = true;
    }
    if image.group_desc().free_blocks_count != free_blocks as u16 {
        image.group_desc_mut().free_blocks_count = free_blocks as u16;
        report.group_block_count_fixed = true;
    }
}
