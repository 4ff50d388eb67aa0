//! # Rskpack Library
//!
//! Lossless file compression built from the classic block transform chain:
//! Burrows-Wheeler transform, move-to-front coding, and Huffman coding over
//! a frequency table carried in the container header.
//! * `rsk` holds the container format and the compression pipeline
//! * the transform stages live in private modules under `tools`
//!
//! The whole input is transformed in memory; the container is all the
//! decoder needs to reproduce the original bytes and extension exactly.
//!
//! ## File Example
//!
//! ```rs
//! use std::path::Path;
//! let (in_size,out_size) = rskpack::rsk::compress_file(Path::new("some_input_path"))
//!     .expect("compression failed");
//! eprintln!("compressed {} into {}",in_size,out_size);
//! ```
//!
//! ## Buffer Example
//!
//! ```rs
//! let test_data = "the rain in spain stays mainly in the plain".as_bytes();
//! let container = rskpack::rsk::compress(test_data,".txt").expect("compression failed");
//! let (ext,restored) = rskpack::rsk::expand(&container).expect("expansion failed");
//! ```

mod tools;
pub mod rsk;

type DYNERR = Box<dyn std::error::Error>;

/// Codec Errors
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("input is empty")]
    EmptyInput,
    #[error("file too large")]
    FileTooLarge,
    #[error("extension too long")]
    ExtensionTooLong,
    #[error("corrupt header")]
    CorruptHeader,
    #[error("corrupt payload")]
    CorruptPayload,
    #[error("invariant was violated")]
    InvariantViolation
}
