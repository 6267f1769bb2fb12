//! `rm`: remove a non-directory entry (spec.md §4.7, grounded on
//! `ext2_rm.c`).

use crate::dirent;
use crate::error::{Error, Result};
use crate::image::Image;
use crate::path;
use crate::walker;

pub fn remove(image: &mut Image, abs_path: &str) -> Result<()> {
    if !abs_path.starts_with('/') {
        return Err(Error::InvalidArgument);
    }

    let target_no = path::resolve(image, abs_path)?;
    if image.inode(target_no.to_index()).is_dir() {
        return Err(Error::IsADirectory);
    }

    let (parent_path, name) = path::split_parent(abs_path);
    let parent_no = path::resolve(image, &parent_path)?;
    let parent_inode = image.inode(parent_no.to_index());
    let parent_blocks = walker::data_blocks(image, parent_inode);

    dirent::remove_entry(image, &parent_blocks, name)
}
