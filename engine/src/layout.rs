//! On-disk structures for a single-block-group, revision-0 ext2 image.
//!
//! Field layouts mirror the real ext2 on-disk format exactly (so the
//! engine stays byte-for-byte compatible with reference tools such as
//! `debugfs`/`dumpe2fs`), adapted from the packed-struct-over-a-buffer
//! technique in `mkfs/src/ext2.rs`'s `Superblock`/`BlockGroupDescriptor`/
//! `INode`, but overlaid directly on a resident mmap instead of read
//! through `Read`/`Seek`.

use std::mem::size_of;

/// Block size this engine assumes throughout (spec.md §3).
pub const BLOCK_SIZE: usize = 1024;
/// Total image size this engine assumes throughout (spec.md §3).
pub const IMAGE_SIZE: usize = 128 * 1024;

/// Byte offset of the superblock (block 1).
pub const SUPERBLOCK_OFFSET: usize = BLOCK_SIZE;
/// Byte offset of the (sole) block group descriptor (block 2).
pub const GROUP_DESC_OFFSET: usize = BLOCK_SIZE * 2;

pub const EXT2_SIGNATURE: u16 = 0xef53;

/// Inode number of the root directory (1-based).
pub const ROOT_INODE_NO: u32 = 2;
/// First inode number not reserved for filesystem bookkeeping (1-based).
pub const FIRST_NON_RESERVED_INODE: u32 = 11;

pub const NAME_MAX_LEN: usize = 255;

pub const S_IFMT: u16 = 0xF000;
pub const S_IFDIR: u16 = 0x4000;
pub const S_IFREG: u16 = 0x8000;
pub const S_IFLNK: u16 = 0xA000;

pub const FT_UNKNOWN: u8 = 0;
pub const FT_REG_FILE: u8 = 1;
pub const FT_DIR: u8 = 2;
pub const FT_SYMLINK: u8 = 7;

/// The ext2 superblock. Occupies the whole of block 1.
#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct Superblock {
    pub inodes_count: u32,
    pub blocks_count: u32,
    pub superuser_blocks: u32,
    pub free_blocks_count: u32,
    pub free_inodes_count: u32,
    pub superblock_block_number: u32,
    pub block_size_log: u32,
    pub fragment_size_log: u32,
    pub blocks_per_group: u32,
    pub fragments_per_group: u32,
    pub inodes_per_group: u32,
    pub last_mount_timestamp: u32,
    pub last_write_timestamp: u32,
    pub mount_count_since_fsck: u16,
    pub mount_count_before_fsck: u16,
    pub signature: u16,
    pub fs_state: u16,
    pub error_action: u16,
    pub minor_version: u16,
    pub last_fsck_timestamp: u32,
    pub fsck_interval: u32,
    pub os_id: u32,
    pub major_version: u32,
    pub uid_reserved: u16,
    pub gid_reserved: u16,

    // Extended superblock fields.
    pub first_ino: u32,
    pub inode_size: u16,
    pub superblock_group: u16,
    pub optional_features: u32,
    pub required_features: u32,
    pub write_required_features: u32,
    pub filesystem_id: [u8; 16],
    pub volume_name: [u8; 16],
    pub last_mount_path: [u8; 64],
    pub compression_algorithms: u32,
    pub files_preallocate_count: u8,
    pub directories_preallocate_count: u8,
    _unused: u16,
    pub journal_id: [u8; 16],
    pub journal_inode: u32,
    pub journal_device: u32,
    pub orphan_inode_head: u32,

    _padding: [u8; 788],
}

const _: () = assert!(size_of::<Superblock>() == BLOCK_SIZE);

impl Superblock {
    pub fn inode_size(&self) -> usize {
        if self.major_version >= 1 {
            self.inode_size as usize
        } else {
            128
        }
    }
}

/// The (sole) block group descriptor. 32 bytes, matching real ext2.
#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct GroupDesc {
    pub block_bitmap: u32,
    pub inode_bitmap: u32,
    pub inode_table: u32,
    pub free_blocks_count: u16,
    pub free_inodes_count: u16,
    pub used_dirs_count: u16,
    _padding: [u8; 14],
}

const _: () = assert!(size_of::<GroupDesc>() == 32);

/// A 128-byte on-disk inode. `i_block` holds 12 direct pointers followed by
/// the single/double/triple indirect pointers, all 1-based (0 = absent).
#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct Inode {
    pub mode: u16,
    pub uid: u16,
    pub size: u32,
    pub ctime: u32,
    pub mtime: u32,
    pub atime: u32,
    pub dtime: u32,
    pub gid: u16,
    pub links_count: u16,
    pub blocks: u32,
    pub flags: u32,
    pub os_specific_0: u32,
    pub i_block: [u32; 15],
    pub generation: u32,
    pub extended_attributes_block: u32,
    pub size_high: u32,
    pub fragment_addr: u32,
    pub os_specific_1: [u8; 12],
}

const _: () = assert!(size_of::<Inode>() == 128);

impl Inode {
    pub fn file_type(&self) -> u16 {
        self.mode & S_IFMT
    }

    pub fn is_dir(&self) -> bool {
        self.file_type() == S_IFDIR
    }

    pub fn is_symlink(&self) -> bool {
        self.file_type() == S_IFLNK
    }

    pub fn is_regular(&self) -> bool {
        self.file_type() == S_IFREG
    }
}

/// Header of a directory entry. The `name_len` bytes of the name follow
/// immediately after this header in the directory block; there is no
/// flexible array member in Rust, so callers reach past the header with
/// raw pointer arithmetic (see `engine::dirent`).
#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct DirEntryHeader {
    pub inode: u32,
    pub rec_len: u16,
    pub name_len: u8,
    pub file_type: u8,
}

pub const DIR_ENTRY_HEADER_SIZE: usize = size_of::<DirEntryHeader>();

const _: () = assert!(DIR_ENTRY_HEADER_SIZE == 8);

/// Rounds an entry's header+name size up to the 4-byte boundary `rec_len`
/// must respect (spec.md §4.4).
pub fn min_rec_len(name_len: usize) -> u16 {
    let raw = DIR_ENTRY_HEADER_SIZE + name_len;
    (raw.div_ceil(4) * 4) as u16
}
