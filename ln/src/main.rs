//! `ln [-s] <img> <image_src> <image_dest>`: hard or symbolic links
//! (spec.md §6).

use std::env;
use std::path::{Path, PathBuf};
use std::process::exit;

use cli_support::{fail, open_checked, succeed};
use engine::ops::link::Kind;

fn usage(prog: &str) -> ! {
    eprintln!("Usage: {prog} [-s] <img> <image_src> <image_dest>");
    exit(1);
}

fn main() {
    let mut args = env::args();
    let prog = args.next().unwrap_or_else(|| "ln".to_owned());

    let mut rest: Vec<String> = args.collect();
    let kind = if rest.first().map(String::as_str) == Some("-s") {
        rest.remove(0);
        Kind::Symbolic
    } else {
        Kind::Hard
    };

    let mut rest = rest.into_iter();
    let (Some(image_path), Some(image_src), Some(image_dest)) =
        (rest.next(), rest.next(), rest.next())
    else {
        usage(&prog);
    };
    if rest.next().is_some() {
        usage(&prog);
    }
    let image_path = PathBuf::from(image_path);

    let mut mapped = open_checked(&prog, &image_path);
    let mut image = mapped.image();
    if let Err(e) = engine::ops::link::link(&mut image, kind, &image_src, &image_dest) {
        fail(&prog, Path::new(&image_dest), &e);
    }
    succeed();
}
