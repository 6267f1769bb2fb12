//! `checker <img>`: scan and repair the five inconsistency classes of
//! spec.md §4.8. Always exits 0; prints one line per fix plus a summary,
//! matching `ext2_checker.c`'s `printf("Fixed: ...")` diagnostics.

use std::env;
use std::path::PathBuf;
use std::process::exit;

use cli_support::open_checked;
use engine::checker;

fn usage(prog: &str) -> ! {
    eprintln!("Usage: {prog} <img>");
    exit(1);
}

fn main() {
    let mut args = env::args();
    let prog = args.next().unwrap_or_else(|| "checker".to_owned());
    let Some(image_path) = args.next() else {
        usage(&prog);
    };
    if args.next().is_some() {
        usage(&prog);
    }
    let image_path = PathBuf::from(image_path);

    let mut mapped = open_checked(&prog, &image_path);
    let mut image = mapped.image();
    let report = checker::check(&mut image);

    for _ in 0..report.type_mismatches_fixed {
        println!("Fixed: entry type vs inode mismatch");
    }
    for _ in 0..report.unmarked_inodes_fixed {
        println!("Fixed: inode not marked as in-use");
    }
    for _ in 0..report.stale_dtimes_fixed {
        println!("Fixed: valid inode marked for deletion");
    }
    for _ in 0..report.unmarked_blocks_fixed {
        println!("Fixed: in-use data block not marked in data bitmap");
    }
    if report.inode_count_fixed {
        println!("Fixed: superblock's free inodes counter was off compared to the bitmap");
    }
    if report.block_count_fixed {
        println!("Fixed: superblock's free blocks counter was off compared to the bitmap");
    }
    if report.group_inode_count_fixed {
        println!("Fixed: block group's free inodes counter was off compared to the bitmap");
    }
    if report.group_block_count_fixed {
        println!("Fixed: block group's free blocks counter was off compared to the bitmap");
    }

    if report.total_fixes() > 0 {
        println!("{} file system inconsistencies repaired!", report.total_fixes());
    } else {
        println!("No file system inconsistencies detected!");
    }
    exit(0);
}
