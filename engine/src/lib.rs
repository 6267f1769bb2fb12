//! On-disk manipulation engine for single-block-group ext2 images.
//!
//! Layered L0-L8 per spec.md §2: [`image`] and [`bitmap`] give raw buffer
//! access, [`alloc`] and [`walker`] build on those, [`dirent`]/[`path`]/
//! [`writer`] implement directory and file semantics, and [`ops`]/
//! [`checker`] compose everything into the engine's six user-visible
//! operations plus the filesystem checker. CLI parsing, diagnostic
//! dumping, and acquiring the backing buffer (mmap or otherwise) are
//! left to callers (spec.md §1).

pub mod alloc;
pub mod bitmap;
pub mod checker;
pub mod dirent;
pub mod error;
pub mod ids;
pub mod image;
pub mod layout;
pub mod ops;
pub mod path;
pub mod walker;
pub mod writer;

pub use error::{Error, Result};
pub use image::Image;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

#[cfg(test)]
mod tests;
