//! On-disk indices are a minefield of off-by-one: inode and block numbers
//! are 1-based (0 meaning "absent"), while bitmap bit positions and the
//! inode table array are 0-based. Distinct types for each prevent the
//! class of bug the C original had to police by hand (spec.md §9).

use std::num::NonZeroU32;

/// A 0-based position into the inode bitmap / inode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InodeIndex(pub u32);

/// A 1-based inode number, as stored on disk in directory entries. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InodeNo(pub NonZeroU32);

/// A 0-based position into the block bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockIndex(pub u32);

/// A 1-based block number, as stored in `i_block[]`. Never zero; an absent
/// pointer is represented by `Option<BlockNo>` / a raw `0` on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockNo(pub NonZeroU32);

impl InodeIndex {
    pub fn to_no(self) -> InodeNo {
        InodeNo(NonZeroU32::new(self.0 + 1).expect("index + 1 cannot be zero"))
    }
}

impl InodeNo {
    pub fn to_index(self) -> InodeIndex {
        InodeIndex(self.0.get() - 1)
    }

    /// Reads a raw on-disk inode field (`0` means "no inode"). Used for
    /// directory entries, whose `inode` field is logically deleted by
    /// zeroing it.
    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    pub fn raw(self) -> u32 {
        self.0.get()
    }
}

impl BlockIndex {
    pub fn to_no(self) -> BlockNo {
        BlockNo(NonZeroU32::new(self.0 + 1).expect("index + 1 cannot be zero"))
    }
}

impl BlockNo {
    pub fn to_index(self) -> BlockIndex {
        BlockIndex(self.0.get() - 1)
    }

    /// Reads a raw `i_block[]` slot (`0` means "absent", sparse files are
    /// not supported so this also means "end of list").
    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    pub fn raw(self) -> u32 {
        self.0.get()
    }
}
