//! BWT/MTF/Huffman compression with the `.rsk` container format.
//!
//! The pipeline runs the input through the Burrows-Wheeler transform to
//! cluster similar contexts, move-to-front coding to skew the symbol
//! distribution, and a static Huffman code over that distribution.  The
//! frequency table travels in the container header, so the decoder can
//! rebuild the identical tree and needs nothing but the container.
//!
//! Layout of the container, all integers little endian:
//!
//! | field | width |
//! |-------|-------|
//! | extension length | u32 |
//! | extension bytes | variable |
//! | table size | u32 |
//! | symbol, count (repeated) | u8 + u64 |
//! | original size | u32 |
//! | primary index | u64 |
//! | payload | variable |
//! | padding bits | u8 |
//!
//! Table entries are written in ascending symbol order.  The `u32`/`u64`
//! width split between original size and primary index is part of the
//! on-disk format and is kept as is.  When the MTF stream collapses to a
//! single distinct symbol the payload is left empty; the decoder
//! reproduces the run from the table alone.

use std::path::Path;
use crate::tools::bwt;
use crate::tools::mtf;
use crate::tools::huffman;
use crate::tools::bit_stream;
use crate::{Error,DYNERR};

/// Longest extension the header will carry, leading dot included.
const MAX_EXT_LEN: usize = 64;

fn read_u32(ibuf: &[u8],ptr: &mut usize) -> Result<u32,Error> {
    match ibuf.get(*ptr..*ptr + 4) {
        Some(raw) => {
            *ptr += 4;
            Ok(u32::from_le_bytes([raw[0],raw[1],raw[2],raw[3]]))
        },
        None => Err(Error::CorruptHeader)
    }
}

fn read_u64(ibuf: &[u8],ptr: &mut usize) -> Result<u64,Error> {
    match ibuf.get(*ptr..*ptr + 8) {
        Some(raw) => {
            *ptr += 8;
            let mut le = [0u8;8];
            le.copy_from_slice(raw);
            Ok(u64::from_le_bytes(le))
        },
        None => Err(Error::CorruptHeader)
    }
}

fn read_bytes<'a>(ibuf: &'a [u8],ptr: &mut usize,count: usize) -> Result<&'a [u8],Error> {
    match ibuf.get(*ptr..*ptr + count) {
        Some(raw) => {
            *ptr += count;
            Ok(raw)
        },
        None => Err(Error::CorruptHeader)
    }
}

/// Compress a buffer into a self contained `.rsk` container.
/// `original_ext` is the extension the decoder should restore, with its
/// leading dot, or empty when the source filename had none.
pub fn compress(ibuf: &[u8],original_ext: &str) -> Result<Vec<u8>,Error> {
    if ibuf.is_empty() {
        return Err(Error::EmptyInput);
    }
    if ibuf.len() > u32::MAX as usize {
        return Err(Error::FileTooLarge);
    }
    if original_ext.len() > MAX_EXT_LEN {
        return Err(Error::ExtensionTooLong);
    }
    log::debug!("BWT over {} bytes",ibuf.len());
    let (last_col,primary) = bwt::forward(ibuf);
    log::debug!("primary index {}",primary);
    let mtf_encoded = mtf::forward(&last_col);
    let mut freqs = [0u64;256];
    for &c in &mtf_encoded {
        freqs[c as usize] += 1;
    }
    let table_size = freqs.iter().filter(|&&f| f > 0).count();
    log::debug!("{} distinct symbols after MTF",table_size);

    let mut ans = Vec::new();
    ans.extend_from_slice(&(original_ext.len() as u32).to_le_bytes());
    ans.extend_from_slice(original_ext.as_bytes());
    ans.extend_from_slice(&(table_size as u32).to_le_bytes());
    for (sym,&f) in freqs.iter().enumerate() {
        if f > 0 {
            ans.push(sym as u8);
            ans.extend_from_slice(&f.to_le_bytes());
        }
    }
    ans.extend_from_slice(&(mtf_encoded.len() as u32).to_le_bytes());
    ans.extend_from_slice(&(primary as u64).to_le_bytes());
    if table_size == 1 {
        // one repeated symbol, the table already says everything
        ans.push(0);
        return Ok(ans);
    }
    let tree = huffman::Tree::build(&freqs)?;
    let codes = tree.codes();
    let bits = huffman::encode(&mtf_encoded,&codes)?;
    log::debug!("{} payload bits",bits.len());
    ans.extend_from_slice(&bit_stream::pack(&bits));
    Ok(ans)
}

/// Expand a `.rsk` container back into the original extension and bytes.
pub fn expand(ibuf: &[u8]) -> Result<(String,Vec<u8>),Error> {
    let mut ptr: usize = 0;
    let ext_len = read_u32(ibuf,&mut ptr)? as usize;
    if ext_len > MAX_EXT_LEN {
        log::error!("extension length {} exceeds {}",ext_len,MAX_EXT_LEN);
        return Err(Error::CorruptHeader);
    }
    let ext = match String::from_utf8(read_bytes(ibuf,&mut ptr,ext_len)?.to_vec()) {
        Ok(s) => s,
        Err(_) => return Err(Error::CorruptHeader)
    };
    let table_size = read_u32(ibuf,&mut ptr)? as usize;
    if table_size < 1 || table_size > 256 {
        log::error!("frequency table size {} is out of range",table_size);
        return Err(Error::CorruptHeader);
    }
    let mut freqs = [0u64;256];
    for _i in 0..table_size {
        let sym = read_bytes(ibuf,&mut ptr,1)?[0] as usize;
        let f = read_u64(ibuf,&mut ptr)?;
        if f == 0 || freqs[sym] != 0 {
            return Err(Error::CorruptHeader);
        }
        freqs[sym] = f;
    }
    let original_size = read_u32(ibuf,&mut ptr)? as usize;
    let primary = read_u64(ibuf,&mut ptr)?;
    if original_size == 0 {
        return Err(Error::CorruptHeader);
    }
    let total: u64 = freqs.iter().sum();
    if total != original_size as u64 {
        log::error!("frequency sum {} does not match original size {}",total,original_size);
        return Err(Error::CorruptHeader);
    }
    if primary >= original_size as u64 {
        log::error!("primary index {} is out of bounds",primary);
        return Err(Error::CorruptHeader);
    }
    let bits = bit_stream::unpack(&ibuf[ptr..])?;
    let mtf_encoded = match table_size {
        1 => {
            // the whole file is one repeated symbol, skip Huffman decoding
            let sym = match freqs.iter().position(|&f| f > 0) {
                Some(sym) => sym as u8,
                None => return Err(Error::InvariantViolation)
            };
            vec![sym;original_size]
        },
        _ => {
            let tree = huffman::Tree::build(&freqs)?;
            tree.decode(&bits,original_size)?
        }
    };
    let last_col = mtf::inverse(&mtf_encoded);
    let ans = bwt::inverse(&last_col,primary as usize);
    Ok((ext,ans))
}

/// Compress the file at `path` into `<base>.rsk` beside it, recording the
/// extension so expansion can restore it.  Returns (input size,output size).
pub fn compress_file(path: &Path) -> Result<(u64,u64),DYNERR> {
    let dat = std::fs::read(path)?;
    let original_ext = match path.extension() {
        Some(ext) => format!(".{}",ext.to_string_lossy()),
        None => String::new()
    };
    let compressed = compress(&dat,&original_ext)?;
    let out_path = path.with_extension("rsk");
    std::fs::write(&out_path,&compressed)?;
    Ok((dat.len() as u64,compressed.len() as u64))
}

/// Expand the container at `path` into `decompressed_<base><ext>` beside
/// it.  Returns (input size,output size).
pub fn expand_file(path: &Path) -> Result<(u64,u64),DYNERR> {
    let dat = std::fs::read(path)?;
    let (original_ext,expanded) = expand(&dat)?;
    let base = match path.file_stem() {
        Some(stem) => stem.to_string_lossy().to_string(),
        None => String::new()
    };
    let out_name = format!("decompressed_{}{}",base,original_ext);
    let out_path = match path.parent() {
        Some(parent) => parent.join(&out_name),
        None => Path::new(&out_name).to_path_buf()
    };
    std::fs::write(&out_path,&expanded)?;
    Ok((dat.len() as u64,expanded.len() as u64))
}

// *************** TESTS *****************

#[cfg(test)]
fn round_trip(dat: &[u8],ext: &str) {
    let compressed = compress(dat,ext).expect("compression failed");
    let (ext_out,expanded) = expand(&compressed).expect("expansion failed");
    assert_eq!(ext_out,ext);
    assert_eq!(expanded,dat);
}

#[test]
fn compression_works() {
    // "A" gives a hand checkable container: header, one table entry,
    // empty payload, zero padding
    let compressed = compress("A".as_bytes(),".bin").expect("compression failed");
    let fixture = "040000002e62696e0100000041010000000000000001000000000000000000000000";
    assert_eq!(compressed,hex::decode(fixture).unwrap());

    // "banana": BWT gives (nnbaaa,3), MTF gives [110,0,99,99,0,0], codes
    // come out 0->0, 110->10, 99->11, so the payload bits are 100111100
    let compressed = compress("banana".as_bytes(),".txt").expect("compression failed");
    let fixture = [
        "040000002e74787403000000",
        "000300000000000000",
        "630200000000000000",
        "6e0100000000000000",
        "06000000",
        "0300000000000000",
        "9e0007"
    ].concat();
    assert_eq!(compressed,hex::decode(fixture).unwrap());
}

#[test]
fn invertibility() {
    round_trip("banana".as_bytes(),".txt");
    round_trip("A".as_bytes(),".bin");
    round_trip("ab".as_bytes(),"");
    round_trip("AAAAA".as_bytes(),"");
    round_trip("abracadabra".as_bytes(),".txt");
}

#[test]
fn single_symbol_payload_is_empty() {
    // a uniform MTF stream takes an all zero input (or a single byte),
    // a run of any other value still yields a two entry table
    let dat = vec![0u8;5];
    let compressed = compress(&dat,"").expect("compression failed");
    // fixed header fields plus one 9 byte table entry, then the bare trailer
    assert_eq!(compressed.len(),30);
    assert_eq!(compressed[compressed.len() - 1],0);
    let (ext,expanded) = expand(&compressed).expect("expansion failed");
    assert_eq!(ext,"");
    assert_eq!(expanded,dat);
}

#[test]
fn full_alphabet() {
    let dat: Vec<u8> = (0..=255).collect();
    round_trip(&dat,".dat");
}

#[test]
fn bit_packing_boundaries() {
    for len in [7,8,9,15,16,17] {
        let dat: Vec<u8> = "abcab".as_bytes().iter().cycle().take(len).copied().collect();
        round_trip(&dat,".txt");
    }
}

#[test]
fn random_bytes() {
    // xorshift with a fixed seed stands in for a random file
    let mut state: u32 = 0xdeadbeef;
    let mut dat = Vec::with_capacity(65536);
    for _i in 0..65536 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        dat.push(state as u8);
    }
    round_trip(&dat,".rnd");
}

#[test]
fn degenerate_inputs_are_rejected() {
    assert!(matches!(compress(&[],".txt"),Err(Error::EmptyInput)));
    let long_ext = ".".repeat(65);
    assert!(matches!(compress("abc".as_bytes(),&long_ext),Err(Error::ExtensionTooLong)));
}

#[test]
fn corrupt_containers_are_rejected() {
    // offsets in the "A" container: frequency count at 13, original size
    // at 21, primary index at 25
    let compressed = compress("A".as_bytes(),".bin").expect("compression failed");

    let mut mangled = compressed.clone();
    mangled[25] = 5;
    assert!(matches!(expand(&mangled),Err(Error::CorruptHeader)));

    let mut mangled = compressed.clone();
    mangled[13] = 2;
    assert!(matches!(expand(&mangled),Err(Error::CorruptHeader)));

    // headerless fragment
    assert!(matches!(expand(&compressed[0..10]),Err(Error::CorruptHeader)));

    // losing the last byte starves or misaligns the payload
    let compressed = compress("abracadabra".as_bytes(),".txt").expect("compression failed");
    let mut truncated = compressed.clone();
    truncated.pop();
    assert!(expand(&truncated).is_err());

    // a padding claim beyond 7 is never valid
    let mut mangled = compressed.clone();
    let last = mangled.len() - 1;
    mangled[last] = 8;
    assert!(matches!(expand(&mangled),Err(Error::CorruptPayload)));
}

#[test]
fn header_reports_what_was_written() {
    let dat = "abracadabra".as_bytes();
    let compressed = compress(dat,".txt").expect("compression failed");
    let mut ptr: usize = 0;
    let ext_len = read_u32(&compressed,&mut ptr).unwrap() as usize;
    assert_eq!(ext_len,4);
    assert_eq!(read_bytes(&compressed,&mut ptr,ext_len).unwrap(),".txt".as_bytes());
    let table_size = read_u32(&compressed,&mut ptr).unwrap() as usize;
    let mut total = 0;
    let mut last_sym: i32 = -1;
    for _i in 0..table_size {
        let sym = read_bytes(&compressed,&mut ptr,1).unwrap()[0] as i32;
        assert!(sym > last_sym); // ascending symbol order
        last_sym = sym;
        total += read_u64(&compressed,&mut ptr).unwrap();
    }
    let original_size = read_u32(&compressed,&mut ptr).unwrap();
    let primary = read_u64(&compressed,&mut ptr).unwrap();
    assert_eq!(original_size as usize,dat.len());
    assert_eq!(total,dat.len() as u64);
    assert!(primary < original_size as u64);
}
