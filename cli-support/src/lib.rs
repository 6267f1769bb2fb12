//! Shared plumbing for the toolbox's binary crates: opening and
//! memory-mapping the image file, and formatting the `progname: path:
//! reason` diagnostic line every front-end prints on failure.
//!
//! This crate is deliberately thin (spec.md §1 scopes file-descriptor
//! acquisition and memory-mapping as an external collaborator, not part
//! of the engine). It exists only so the seven binaries don't each
//! reimplement the same `mmap` dance, following `memmap2`'s use in
//! `inttest/src/filesystem.rs` for mapping test files.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::process::exit;

use engine::Image;
use memmap2::MmapMut;

/// An ext2 image file, opened and mapped read-write. Holds the mapping
/// (and the file it backs) alive for as long as a borrowed [`Image`]
/// needs it; dropping this unmaps the file, which is where the host's
/// memory-mapping transfers writes back (spec.md §4.1, §5).
pub struct MappedImage {
    _file: std::fs::File,
    mmap: MmapMut,
}

impl MappedImage {
    /// Opens `path` read-write and maps it entirely. Does not check the
    /// image's size or signature; callers that need that should follow up
    /// with [`engine::image::sanity_check`] on the borrowed [`Image`].
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let mmap = unsafe { MmapMut::map_mut(&file)? };
        Ok(Self { _file: file, mmap })
    }

    /// Borrows the mapped bytes as an [`Image`]. Every engine call takes
    /// this fresh rather than holding it across calls that might want to
    /// reborrow, matching spec.md §9's "no aliased structured views
    /// across a write" guidance.
    pub fn image(&mut self) -> Image<'_> {
        Image::new(&mut self.mmap[..])
    }
}

/// Opens and sanity-checks the image named by CLI arg 1, or prints a
/// diagnostic and exits non-zero. This is the common first step of every
/// binary in the toolbox.
pub fn open_checked(prog: &str, image_path: &Path) -> MappedImage {
    let mut mapped = MappedImage::open(image_path).unwrap_or_else(|e| {
        fail(prog, image_path, &engine::Error::HostIo(e));
    });
    if let Err(e) = engine::image::sanity_check(&mapped.image()) {
        fail(prog, image_path, &e);
    }
    mapped
}

/// Trims trailing `/` characters from a path, as spec.md §6 requires of
/// `mkdir`'s argument (and is harmless to apply anywhere else an absolute
/// path is accepted as a whole argument, rather than split from a
/// longer one).
pub fn trim_trailing_slashes(path: &str) -> &str {
    if path == "/" {
        return path;
    }
    path.trim_end_matches('/')
}

/// Prints the `progname: path: reason` diagnostic line and exits with the
/// the exit code matching the reason's CLI expectations (spec.md §7: zero
/// only on success, so every error here is 1).
pub fn fail(prog: &str, path: &Path, err: &engine::Error) -> ! {
    eprintln!("{prog}: {}: {err}", path.display());
    exit(1);
}

/// Exits 0. A named function so every binary's success path reads the
/// same way rather than falling off the end of `main` with an implicit
/// status.
pub fn succeed() -> ! {
    exit(0);
}
