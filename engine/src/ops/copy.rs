//! `cp`: copy a host file in as a new regular file (spec.md §4.7, grounded
//! on `ext2_cp.c`). Reading the host file is the caller's job (spec.md §1
//! scopes host I/O as an external collaborator); this takes the bytes
//! already read and `source_name` (the host path's basename).

use crate::dirent;
use crate::error::{Error, Result};
use crate::ids::InodeNo;
use crate::image::Image;
use crate::layout::{FT_REG_FILE, NAME_MAX_LEN};
use crate::path;
use crate::walker;
use crate::writer;

pub fn copy_in(image: &mut Image, source_name: &str, dest_path: &str, content: &[u8]) -> Result<()> {
    if !dest_path.starts_with('/') {
        return Err(Error::InvalidArgument);
    }

    let (dir_no, name) = target_location(image, source_name, dest_path)?;

    if name.len() > NAME_MAX_LEN {
        return Err(Error::NameTooLong);
    }

    let dir_inode = image.inode(dir_no.to_index());
    if !dir_inode.is_dir() {
        return Err(Error::NotADirectory);
    }
    let dir_blocks = walker::data_blocks(image, dir_inode);
    if dirent::find_by_name(image, &dir_blocks, &name).is_some() {
        return Err(Error::AlreadyExists);
    }

    let file_no = super::new_inode_file(image)?;
    dirent::append_entry(image, dir_no, &dir_blocks, file_no, &name, FT_REG_FILE)?;
    writer::write_content(image, file_no, content)?;
    Ok(())
}

/// Works out which directory the new entry lands in and under what name.
/// If `dest_path` already names a directory, the copy lands inside it
/// under `source_name` (matching the original's redirect-into-directory
/// behavior); otherwise `dest_path`'s own parent/basename are used.
fn target_location(image: &Image, source_name: &str, dest_path: &str) -> Result<(InodeNo, String)> {
    match path::resolve(image, dest_path) {
        Ok(existing) => {
            if image.inode(existing.to_index()).is_dir() {
                Ok((existing, source_name.to_string()))
            } else {
                Err(Error::AlreadyExists)
            }
        }
        Err(Error::NotFound) => {
            let (parent_path, name) = path::split_parent(dest_path);
            let parent_no = path::resolve(image, &parent_path)?;
            Ok((parent_no, name.to_string()))
        }
        Err(e) => Err(e),
    }
}
