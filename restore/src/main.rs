//! `restore <img> <abs_path>`: undelete a removed entry (spec.md §6).

use std::env;
use std::path::{Path, PathBuf};
use std::process::exit;

use cli_support::{fail, open_checked, succeed};

fn usage(prog: &str) -> ! {
    eprintln!("Usage: {prog} <img> <abs_path>");
    exit(1);
}

fn main() {
    let mut args = env::args();
    let prog = args.next().unwrap_or_else(|| "restore".to_owned());
    let (Some(image_path), Some(abs_path)) = (args.next(), args.next()) else {
        usage(&prog);
    };
    if args.next().is_some() {
        usage(&prog);
    }
    let image_path = PathBuf::from(image_path);

    let mut mapped = open_checked(&prog, &image_path);
    let mut image = mapped.image();
    if let Err(e) = engine::ops::restore::restore(&mut image, &abs_path) {
        fail(&prog, Path::new(&abs_path), &e);
    }
    succeed();
}
