//! Test-only fixture image builder, adapted from the real mkfs flow in
//! `mkfs/src/ext2.rs`'s `Ext2Factory::create` for the simplified
//! single-block-group layout this engine assumes: one boot block, one
//! superblock, one group descriptor, one block bitmap, one inode bitmap,
//! a 4-block inode table (32 inodes * 128 bytes), and the rest data
//! blocks.

use crate::ids::{InodeIndex, InodeNo};
use crate::image::Image;
use crate::layout::{EXT2_SIGNATURE, FIRST_NON_RESERVED_INODE, FT_DIR, IMAGE_SIZE, ROOT_INODE_NO, S_IFDIR};

pub const INODES_COUNT: u32 = 32;
pub const BLOCKS_COUNT: u32 = (IMAGE_SIZE / 1024) as u32;

const BLOCK_BITMAP_IDX: u32 = 3;
const INODE_BITMAP_IDX: u32 = 4;
const INODE_TABLE_IDX: u32 = 5;
const INODE_TABLE_BLOCKS: u32 = 4;
const FIRST_DATA_BLOCK_IDX: u32 = INODE_TABLE_IDX + INODE_TABLE_BLOCKS;

/// Owns the image buffer so a test can borrow an [`Image`] from it for as
/// long as it needs.
pub struct Fixture {
    bytes: Vec<u8>,
}

impl Fixture {
    pub fn new() -> Self {
        let mut bytes = vec![0u8; IMAGE_SIZE];
        {
            let mut image = Image::new(&mut bytes);
            init(&mut image);
        }
        Self { bytes }
    }

    pub fn image(&mut self) -> Image<'_> {
        Image::new(&mut self.bytes)
    }

    pub fn root_no(&self) -> InodeNo {
        InodeNo::from_raw(ROOT_INODE_NO).expect("root inode number is nonzero")
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

fn init(image: &mut Image) {
    let reserved_blocks = FIRST_DATA_BLOCK_IDX + 1; // + root's own data block
    {
        let sb = image.superblock_mut();
        *sb = unsafe { std::mem::zeroed() };
        sb.inodes_count = INODES_COUNT;
        sb.blocks_count = BLOCKS_COUNT;
        sb.free_blocks_count = BLOCKS_COUNT - reserved_blocks;
        sb.free_inodes_count = INODES_COUNT - 10;
        sb.blocks_per_group = BLOCKS_COUNT;
        sb.inodes_per_group = INODES_COUNT;
        sb.signature = EXT2_SIGNATURE;
        sb.major_version = 1;
        sb.inode_size = 128;
        sb.first_ino = FIRST_NON_RESERVED_INODE;
    }
    {
        let gd = image.group_desc_mut();
        *gd = unsafe { std::mem::zeroed() };
        gd.block_bitmap = BLOCK_BITMAP_IDX;
        gd.inode_bitmap = INODE_BITMAP_IDX;
        gd.inode_table = INODE_TABLE_IDX;
        gd.free_blocks_count = (BLOCKS_COUNT - reserved_blocks) as u16;
        gd.free_inodes_count = (INODES_COUNT - 10) as u16;
        gd.used_dirs_count = 1;
    }

    for i in 0..FIRST_DATA_BLOCK_IDX {
        crate::bitmap::set(image.block_bitmap_mut(), i);
    }
    crate::bitmap::set(image.block_bitmap_mut(), FIRST_DATA_BLOCK_IDX);

    for i in 0..INODES_COUNT {
        let no = InodeIndex(i).to_no().raw();
        if no != ROOT_INODE_NO && no < FIRST_NON_RESERVED_INODE {
            crate::bitmap::set(image.inode_bitmap_mut(), i);
        }
    }

    let root_no = InodeNo::from_raw(ROOT_INODE_NO).unwrap();
    crate::bitmap::set(image.inode_bitmap_mut(), root_no.to_index().0);

    {
        let root = image.inode_mut(root_no.to_index());
        *root = unsafe { std::mem::zeroed() };
        root.mode = S_IFDIR | 0o755;
    }

    let root_block = crate::ids::BlockIndex(FIRST_DATA_BLOCK_IDX).to_no();
    image.inode_mut(root_no.to_index()).i_block[0] = root_block.raw();
    image.inode_mut(root_no.to_index()).blocks = 1024 / 512;
    image.inode_mut(root_no.to_index()).size = 1024;
    {
        let block = image.block_mut(root_block);
        block.fill(0);
    }

    // `.` and `..` both point at root; written directly (rather than via
    // `dirent::append_entry`) since `append_entry` would double-count the
    // block already wired into `i_block[0]` above.
    let dot_len = crate::layout::min_rec_len(1);
    crate::dirent::write_bootstrap_entries(image, root_block, root_no, dot_len, root_no, FT_DIR);
}
