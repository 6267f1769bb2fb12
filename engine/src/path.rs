//! Path resolution (spec.md §4.5, L5).
//!
//! Resolves an absolute path by walking directory entries from the root,
//! requiring every non-final component to be a directory. Like the
//! original's `inode_by_filepath`, only a directory's direct blocks are
//! ever searched (spec.md §9) — a deliberate limitation carried forward,
//! not a bug to fix.

use crate::error::{Error, Result};
use crate::ids::InodeNo;
use crate::image::Image;
use crate::layout::ROOT_INODE_NO;
use crate::walker;

/// Splits a trimmed absolute path into its component names. `/` resolves
/// to no components (the root itself).
pub fn components(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Splits `/a/b/c` into (`/a/b`, `c`). The parent of a top-level entry is
/// `/`.
pub fn split_parent(path: &str) -> (String, &str) {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => ("/".to_string(), &trimmed[1..]),
        Some(i) => (trimmed[..i].to_string(), &trimmed[i + 1..]),
        None => ("/".to_string(), trimmed),
    }
}

fn root() -> InodeNo {
    InodeNo::from_raw(ROOT_INODE_NO).expect("root inode number is nonzero")
}

/// Resolves an absolute path to the inode it names.
pub fn resolve(image: &Image, path: &str) -> Result<InodeNo> {
    let mut current = root();
    for (i, name) in components(path).into_iter().enumerate() {
        let _ = i;
        let inode = image.inode(current.to_index());
        if !inode.is_dir() {
            return Err(Error::NotADirectory);
        }
        let blocks = walker::data_blocks(image, inode);
        let (_, entry) = crate::dirent::find_by_name(image, &blocks, name).ok_or(Error::NotFound)?;
        current = entry.inode.expect("find_by_name only returns live entries");
    }
    Ok(current)
}

/// Resolves the parent directory of an absolute path (the path itself
/// need not exist).
pub fn resolve_parent(image: &Image, path: &str) -> Result<InodeNo> {
    let (parent, _) = split_parent(path);
    resolve(image, &parent)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn split_parent_top_level() {
        assert_eq!(split_parent("/foo"), ("/".to_string(), "foo"));
    }

    #[test]
    fn split_parent_nested() {
        assert_eq!(split_parent("/foo/bar"), ("/foo".to_string(), "bar"));
    }

    #[test]
    fn split_parent_trailing_slash() {
        assert_eq!(split_parent("/foo/bar/"), ("/foo".to_string(), "bar"));
    }
}
