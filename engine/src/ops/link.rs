//! `ln`: hard and symbolic links (spec.md §4.7, grounded on `ext2_ln.c`).

use crate::dirent;
use crate::error::{Error, Result};
use crate::image::Image;
use crate::layout::{FT_REG_FILE, FT_SYMLINK, NAME_MAX_LEN};
use crate::path;
use crate::walker;
use crate::writer;

pub enum Kind {
    Hard,
    Symbolic,
}

/// `source_path` must exist and name a non-directory for both kinds of
/// link, matching the original, which resolves the source and rejects a
/// directory before switching on link type. A symbolic link's own data
/// block still stores `source_path`'s text verbatim, unresolved — only
/// the existence/type check consults the resolved inode.
pub fn link(image: &mut Image, kind: Kind, source_path: &str, dest_path: &str) -> Result<()> {
    if !source_path.starts_with('/') || !dest_path.starts_with('/') {
        return Err(Error::InvalidArgument);
    }

    let (dest_parent_path, dest_name) = path::split_parent(dest_path);
    if dest_name.len() > NAME_MAX_LEN {
        return Err(Error::NameTooLong);
    }

    let source_no = path::resolve(image, source_path)?;
    let dest_parent_no = path::resolve(image, &dest_parent_path)?;
    let dest_parent_inode = image.inode(dest_parent_no.to_index());
    if !dest_parent_inode.is_dir() {
        return Err(Error::NotADirectory);
    }
    let dest_blocks = walker::data_blocks(image, dest_parent_inode);
    if dirent::find_by_name(image, &dest_blocks, dest_name).is_some() {
        return Err(Error::AlreadyExists);
    }

    let source_inode = image.inode(source_no.to_index());
    if source_inode.is_dir() {
        return Err(Error::IsADirectory);
    }

    match kind {
        // The original always writes EXT2_FT_REG_FILE here even when the
        // source is a symlink; preserved as-is (spec.md §9 open question).
        Kind::Hard => {
            dirent::append_entry(image, dest_parent_no, &dest_blocks, source_no, dest_name, FT_REG_FILE)?;
        }
        Kind::Symbolic => {
            let link_no = super::new_inode_symlink(image)?;
            dirent::append_entry(image, dest_parent_no, &dest_blocks, link_no, dest_name, FT_SYMLINK)?;
            writer::write_content(image, link_no, source_path.as_bytes())?;
        }
    }
    Ok(())
}
