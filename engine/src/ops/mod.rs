//! High-level operations (spec.md §4.7, L7).
//!
//! Each function here composes L0-L6 primitives into one of the engine's
//! six user-visible operations, in the same order of checks and side
//! effects as the corresponding original C source file.

pub mod copy;
pub mod link;
pub mod mkdir;
pub mod remove;
pub mod restore;

use crate::ids::InodeNo;
use crate::image::Image;
use crate::layout::{S_IFDIR, S_IFLNK, S_IFREG};

fn now() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}

/// Allocates a fresh inode and zeroes it out, matching `new_inode`: no
/// data blocks, no links yet, `dtime` clear.
fn new_blank_inode(image: &mut Image, mode: u16) -> crate::error::Result<InodeNo> {
    let no = crate::alloc::allocate_inode(image)?;
    let inode = image.inode_mut(no.to_index());
    *inode = unsafe { std::mem::zeroed() };
    inode.mode = mode;
    inode.links_count = 0;
    inode.size = 0;
    inode.blocks = 0;
    inode.dtime = 0;
    let t = now();
    inode.ctime = t;
    inode.mtime = t;
    inode.atime = t;
    Ok(no)
}

pub(crate) fn new_inode_dir(image: &mut Image) -> crate::error::Result<InodeNo> {
    new_blank_inode(image, S_IFDIR | 0o755)
}

pub(crate) fn new_inode_file(image: &mut Image) -> crate::error::Result<InodeNo> {
    new_blank_inode(image, S_IFREG | 0o644)
}

pub(crate) fn new_inode_symlink(image: &mut Image) -> crate::error::Result<InodeNo> {
    new_blank_inode(image, S_IFLNK | 0o777)
}
