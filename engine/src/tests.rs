//! End-to-end scenarios exercising the public operations together,
//! built on the fixture from [`crate::testutil`].

use crate::ops::link::Kind;
use crate::ops::{copy, link, mkdir, remove, restore};
use crate::testutil::Fixture;
use crate::{checker, path};

#[test]
fn mkdir_creates_a_resolvable_directory() {
    let mut fx = Fixture::new();
    let mut image = fx.image();

    mkdir::mkdir(&mut image, "/foo").unwrap();

    let no = path::resolve(&image, "/foo").unwrap();
    assert!(image.inode(no.to_index()).is_dir());

    let dot = path::resolve(&image, "/foo/.").unwrap();
    assert_eq!(dot, no);
    let dotdot = path::resolve(&image, "/foo/..").unwrap();
    assert_eq!(dotdot, fx.root_no());
}

#[test]
fn mkdir_rejects_duplicate_name() {
    let mut fx = Fixture::new();
    let mut image = fx.image();
    mkdir::mkdir(&mut image, "/foo").unwrap();
    let err = mkdir::mkdir(&mut image, "/foo").unwrap_err();
    assert!(matches!(err, crate::Error::AlreadyExists));
}

#[test]
fn mkdir_rejects_missing_parent() {
    let mut fx = Fixture::new();
    let mut image = fx.image();
    let err = mkdir::mkdir(&mut image, "/a/b").unwrap_err();
    assert!(matches!(err, crate::Error::NotFound));
}

#[test]
fn mkdir_bumps_parent_link_count_via_dotdot() {
    let mut fx = Fixture::new();
    let mut image = fx.image();
    let root_links_before = image.inode(fx.root_no().to_index()).links_count;
    mkdir::mkdir(&mut image, "/foo").unwrap();
    let root_links_after = image.inode(fx.root_no().to_index()).links_count;
    assert_eq!(root_links_after, root_links_before + 1);
}

#[test]
fn cp_copies_content_and_rejects_second_copy() {
    let mut fx = Fixture::new();
    let mut image = fx.image();

    copy::copy_in(&mut image, "hello.txt", "/hello.txt", b"hello world").unwrap();
    let no = path::resolve(&image, "/hello.txt").unwrap();
    let inode = image.inode(no.to_index());
    assert!(inode.is_regular());
    assert_eq!({ inode.size }, 11);

    let err = copy::copy_in(&mut image, "hello.txt", "/hello.txt", b"again").unwrap_err();
    assert!(matches!(err, crate::Error::AlreadyExists));
}

#[test]
fn cp_into_existing_directory_uses_source_basename() {
    let mut fx = Fixture::new();
    let mut image = fx.image();
    mkdir::mkdir(&mut image, "/dir").unwrap();

    copy::copy_in(&mut image, "note.txt", "/dir", b"contents").unwrap();

    path::resolve(&image, "/dir/note.txt").unwrap();
}

#[test]
fn cp_spanning_indirect_blocks_round_trips() {
    let mut fx = Fixture::new();
    let mut image = fx.image();
    // Bigger than the 12 direct blocks (12 KiB) but well within this
    // fixture's available data blocks and the single-indirect ceiling.
    let content = vec![0x5au8; 12 * 1024 + 2048];
    copy::copy_in(&mut image, "big.bin", "/big.bin", &content).unwrap();

    let no = path::resolve(&image, "/big.bin").unwrap();
    let inode = *image.inode(no.to_index());
    assert_eq!({ inode.size } as usize, content.len());
    assert!(inode.i_block[12] != 0, "expected a single-indirect block");
}

#[test]
fn hard_link_shares_inode_and_bumps_links() {
    let mut fx = Fixture::new();
    let mut image = fx.image();
    copy::copy_in(&mut image, "a.txt", "/a.txt", b"payload").unwrap();
    let original = path::resolve(&image, "/a.txt").unwrap();

    link::link(&mut image, Kind::Hard, "/a.txt", "/b.txt").unwrap();

    let linked = path::resolve(&image, "/b.txt").unwrap();
    assert_eq!(original, linked);
    assert_eq!(image.inode(original.to_index()).links_count, 2);
}

#[test]
fn symlink_stores_source_path_as_content() {
    let mut fx = Fixture::new();
    let mut image = fx.image();
    copy::copy_in(&mut image, "a.txt", "/a.txt", b"payload").unwrap();

    link::link(&mut image, Kind::Symbolic, "/a.txt", "/link").unwrap();

    let link_no = path::resolve(&image, "/link").unwrap();
    let inode = image.inode(link_no.to_index());
    assert!(inode.is_symlink());
    let blocks = crate::walker::data_blocks(&image, inode);
    assert_eq!(&image.block(blocks[0])[.."/a.txt".len()], b"/a.txt");
}

#[test]
fn ln_rejects_directory_source() {
    let mut fx = Fixture::new();
    let mut image = fx.image();
    mkdir::mkdir(&mut image, "/dir").unwrap();
    let err = link::link(&mut image, Kind::Hard, "/dir", "/dir2").unwrap_err();
    assert!(matches!(err, crate::Error::IsADirectory));
}

#[test]
fn rm_removes_file_and_rejects_directories() {
    let mut fx = Fixture::new();
    let mut image = fx.image();
    copy::copy_in(&mut image, "a.txt", "/a.txt", b"payload").unwrap();

    remove::remove(&mut image, "/a.txt").unwrap();
    let err = path::resolve(&image, "/a.txt").unwrap_err();
    assert!(matches!(err, crate::Error::NotFound));

    mkdir::mkdir(&mut image, "/dir").unwrap();
    let err = remove::remove(&mut image, "/dir").unwrap_err();
    assert!(matches!(err, crate::Error::IsADirectory));
}

#[test]
fn restore_recovers_a_removed_file_with_its_content_intact() {
    let mut fx = Fixture::new();
    let mut image = fx.image();
    copy::copy_in(&mut image, "a.txt", "/a.txt", b"payload").unwrap();
    // Give it a sibling so it isn't the first entry in its block (the
    // first entry's tombstone cannot carry an inode number, see
    // `dirent::remove_entry`).
    copy::copy_in(&mut image, "z.txt", "/z.txt", b"other").unwrap();

    remove::remove(&mut image, "/z.txt").unwrap();
    path::resolve(&image, "/z.txt").unwrap_err();

    restore::restore(&mut image, "/z.txt").unwrap();
    let no = path::resolve(&image, "/z.txt").unwrap();
    let inode = image.inode(no.to_index());
    assert_eq!(inode.links_count, 1);
    assert_eq!({ inode.dtime }, 0);
    let blocks = crate::walker::data_blocks(&image, inode);
    assert_eq!(&image.block(blocks[0])[..5], b"other");
}

#[test]
fn restore_rejects_when_target_already_exists() {
    let mut fx = Fixture::new();
    let mut image = fx.image();
    copy::copy_in(&mut image, "a.txt", "/a.txt", b"payload").unwrap();
    let err = restore::restore(&mut image, "/a.txt").unwrap_err();
    assert!(matches!(err, crate::Error::AlreadyExists));
}

#[test]
fn checker_fixes_unmarked_inode_and_is_idempotent() {
    let mut fx = Fixture::new();
    let mut image = fx.image();
    copy::copy_in(&mut image, "a.txt", "/a.txt", b"payload").unwrap();
    let no = path::resolve(&image, "/a.txt").unwrap();

    // Corrupt: clear the inode's allocation bit without touching the
    // directory entry, as if a previous crash lost that write.
    crate::bitmap::clear(image.inode_bitmap_mut(), no.to_index().0);

    let report = checker::check(&mut image);
    assert_eq!(report.unmarked_inodes_fixed, 1);

    let second = checker::check(&mut image);
    assert_eq!(second.total_fixes(), 0);
}

#[test]
fn checker_fixes_file_type_mismatch() {
    let mut fx = Fixture::new();
    let mut image = fx.image();
    mkdir::mkdir(&mut image, "/dir").unwrap();
    let no = path::resolve(&image, "/dir").unwrap();
    let root_no = fx.root_no();
    let root_inode = *image.inode(root_no.to_index());
    let blocks = crate::walker::data_blocks(&image, &root_inode);
    let (block_no, entry) = crate::dirent::find_by_name(&image, &blocks, "dir").unwrap();
    assert_eq!(entry.inode.unwrap(), no);
    // Corrupt the entry's recorded type to regular-file.
    image.block_mut(block_no)[entry.offset + 7] = crate::layout::FT_REG_FILE;

    let report = checker::check(&mut image);
    assert_eq!(report.type_mismatches_fixed, 1);
    let second = checker::check(&mut image);
    assert_eq!(second.total_fixes(), 0);
}
