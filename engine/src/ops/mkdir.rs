//! `mkdir`: create a directory (spec.md §4.7, grounded on `ext2_mkdir.c`).

use crate::dirent;
use crate::error::{Error, Result};
use crate::image::Image;
use crate::layout::FT_DIR;
use crate::path;
use crate::walker;

pub fn mkdir(image: &mut Image, abs_path: &str) -> Result<()> {
    if !abs_path.starts_with('/') {
        return Err(Error::InvalidArgument);
    }
    let (parent_path, name) = path::split_parent(abs_path);
    if name.is_empty() {
        return Err(Error::InvalidArgument);
    }

    let parent_no = path::resolve(image, &parent_path)?;
    let parent_inode = image.inode(parent_no.to_index());
    if !parent_inode.is_dir() {
        return Err(Error::NotADirectory);
    }
    let parent_blocks = walker::data_blocks(image, parent_inode);
    if dirent::find_by_name(image, &parent_blocks, name).is_some() {
        return Err(Error::AlreadyExists);
    }

    let child_no = super::new_inode_dir(image)?;
    image.group_desc_mut().used_dirs_count += 1;

    dirent::append_entry(image, parent_no, &parent_blocks, child_no, name, FT_DIR)?;

    // The new directory's own data block(s) start empty; `.` is the first
    // entry appended, so it always lands in a freshly allocated block.
    let child_blocks: Vec<crate::ids::BlockNo> = Vec::new();
    dirent::append_entry(image, child_no, &child_blocks, child_no, ".", FT_DIR)?;
    let child_blocks = walker::data_blocks(image, image.inode(child_no.to_index()));
    dirent::append_entry(image, child_no, &child_blocks, parent_no, "..", FT_DIR)?;

    Ok(())
}
