//! `dump <img>`: read-only diagnostic pretty-printer for an ext2 image,
//! grounded on `ext2_dump.c`'s `main`/`print_inode`/`print_directory`.
//!
//! Explicitly out of the engine's scope (spec.md §1): this binary only
//! reads, using the same accessors any caller would, never the mutating
//! paths under `engine::alloc`/`engine::ops`.

use std::env;
use std::path::PathBuf;
use std::process::exit;

use cli_support::MappedImage;
use engine::dirent;
use engine::ids::{InodeIndex, InodeNo};
use engine::layout::{FT_DIR, FT_REG_FILE, FT_SYMLINK, ROOT_INODE_NO};
use engine::walker;
use engine::Image;

fn usage(prog: &str) -> ! {
    eprintln!("usage: {prog} <image file name>");
    exit(1);
}

fn main() {
    let mut args = env::args();
    let prog = args.next().unwrap_or_else(|| "dump".to_owned());
    let Some(image_path) = args.next() else {
        usage(&prog);
    };
    if args.next().is_some() {
        usage(&prog);
    }
    let image_path = PathBuf::from(image_path);

    let mut mapped = MappedImage::open(&image_path).unwrap_or_else(|e| {
        eprintln!("{prog}: {}: {e}", image_path.display());
        exit(1);
    });
    let image = mapped.image();
    if let Err(e) = engine::image::sanity_check(&image) {
        eprintln!("{prog}: {}: {e}", image_path.display());
        exit(1);
    }

    let sb = image.superblock();
    println!("Inodes: {}", { sb.inodes_count });
    println!("Blocks: {}", { sb.blocks_count });

    let gd = image.group_desc();
    println!("Block group:");
    println!("    block bitmap: {}", { gd.block_bitmap });
    println!("    inode bitmap: {}", { gd.inode_bitmap });
    println!("    inode table: {}", { gd.inode_table });
    println!("    free blocks: {}", { gd.free_blocks_count });
    println!("    free inodes: {}", { gd.free_inodes_count });
    println!("    used_dirs: {}", { gd.used_dirs_count });

    println!(
        "Block bitmap: {}",
        bitmap_to_string(image.block_bitmap(), sb.blocks_count)
    );
    println!(
        "Inode bitmap: {}",
        bitmap_to_string(image.inode_bitmap(), sb.inodes_count)
    );
    println!();

    println!("Inodes:");
    for_each_live_inode(&image, |idx| print_inode(&image, idx));
    println!();

    println!("Directory Blocks:");
    for_each_live_inode(&image, |idx| print_directory(&image, idx));
}

/// Mirrors `inode_should_skip`: reserved inodes 1, 3..=10 are never
/// walked, root (inode 2) always is.
fn should_skip(no: InodeNo) -> bool {
    let raw = no.raw();
    raw != ROOT_INODE_NO && raw < engine::layout::FIRST_NON_RESERVED_INODE
}

fn for_each_live_inode(image: &Image, mut f: impl FnMut(InodeIndex)) {
    let inodes_count = image.superblock().inodes_count;
    for i in 0..inodes_count {
        let idx = InodeIndex(i);
        let no = idx.to_no();
        if should_skip(no) {
            continue;
        }
        if engine::alloc::is_inode_allocated(image, no) {
            f(idx);
        }
    }
}

fn print_inode(image: &Image, idx: InodeIndex) {
    let no = idx.to_no();
    let inode = image.inode(idx);
    let kind = if inode.is_regular() {
        'f'
    } else if inode.is_dir() {
        'd'
    } else if inode.is_symlink() {
        'l'
    } else {
        'u'
    };
    println!(
        "[{}] type: {kind} size: {} links: {} blocks: {}",
        no.raw(),
        { inode.size },
        { inode.links_count },
        { inode.blocks },
    );
    print!("[{}] Blocks:  ", no.raw());
    for block in walker::data_blocks(image, inode) {
        print!("{} ", block.raw());
    }
    println!();
}

fn print_directory(image: &Image, idx: InodeIndex) {
    let no = idx.to_no();
    let inode = image.inode(idx);
    if !inode.is_dir() {
        return;
    }
    for block_no in walker::data_blocks(image, inode) {
        println!("   DIR BLOCK NUM: {} (for inode {})", block_no.raw(), no.raw());
        for entry in dirent::entries_in_block(image.block(block_no)) {
            let file_type = match entry.file_type {
                FT_REG_FILE => 'f',
                FT_DIR => 'd',
                FT_SYMLINK => 'l',
                _ => 'u',
            };
            println!(
                "Inode: {} rec_len: {} name_len: {} type= {file_type} name={}",
                entry.inode.map(InodeNo::raw).unwrap_or(0),
                entry.rec_len,
                entry.name_len,
                entry.name,
            );
        }
    }
}

/// Mirrors `bitmap_to_string`: one character per bit, a space after every
/// 8.
fn bitmap_to_string(bitmap: &[u8], n_items: u32) -> String {
    let mut out = String::new();
    for i in 0..n_items / 8 {
        for j in 0..8u32 {
            let bit = (bitmap[i as usize] >> j) & 1;
            out.push((b'0' + bit) as char);
        }
        out.push(' ');
    }
    out
}
