//! `cp <img> <host_src> <image_dest>`: import a host file (spec.md §6).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;

use cli_support::{fail, open_checked, succeed};
use engine::Error;

fn usage(prog: &str) -> ! {
    eprintln!("Usage: {prog} <img> <host_src> <image_dest>");
    exit(1);
}

fn main() {
    let mut args = env::args();
    let prog = args.next().unwrap_or_else(|| "cp".to_owned());
    let (Some(image_path), Some(host_src), Some(image_dest)) =
        (args.next(), args.next(), args.next())
    else {
        usage(&prog);
    };
    if args.next().is_some() {
        usage(&prog);
    }
    let image_path = PathBuf::from(image_path);
    let host_src = PathBuf::from(host_src);

    if !image_dest.starts_with('/') {
        fail(&prog, Path::new(&image_dest), &Error::InvalidArgument);
    }

    let source_name = host_src
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_else(|| {
            fail(&prog, &host_src, &Error::InvalidArgument);
        });
    let content = fs::read(&host_src).unwrap_or_else(|e| {
        fail(&prog, &host_src, &Error::HostIo(e));
    });

    let mut mapped = open_checked(&prog, &image_path);
    let mut image = mapped.image();
    if let Err(e) = engine::ops::copy::copy_in(&mut image, source_name, &image_dest, &content) {
        fail(&prog, Path::new(&image_dest), &e);
    }
    succeed();
}
