//! Transform stages composed by the `rsk` module.

pub mod bwt;
pub mod mtf;
pub mod huffman;
pub mod bit_stream;
