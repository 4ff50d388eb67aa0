//! MSB-first bit packing with an explicit padding trailer.
//!
//! The payload is the packed bits followed by a single byte giving the
//! number of unused low-order bits in the final payload byte.  The trailer
//! byte is always appended, even when there are no payload bits at all, so
//! the unpacker can find the split by reading to the end of the container.

use bit_vec::BitVec;
use crate::Error;

/// Pack bits MSB-first into bytes and append the padding count.
pub fn pack(bits: &BitVec) -> Vec<u8> {
    let mut ans = bits.to_bytes();
    let padding = ((8 - bits.len() % 8) % 8) as u8;
    ans.push(padding);
    ans
}

/// Split off the trailer and recover the bit stream.  The padding count
/// must be in 0..=7 and cannot exceed the number of packed bits.
pub fn unpack(payload: &[u8]) -> Result<BitVec,Error> {
    let (padding,body) = match payload.split_last() {
        Some((&padding,body)) => (padding as usize,body),
        None => return Err(Error::CorruptPayload)
    };
    if padding > 7 {
        log::error!("padding count {} is out of range",padding);
        return Err(Error::CorruptPayload);
    }
    let mut bits = BitVec::from_bytes(body);
    if padding > bits.len() {
        return Err(Error::CorruptPayload);
    }
    let keep = bits.len() - padding;
    bits.truncate(keep);
    Ok(bits)
}

#[test]
fn padding_is_always_recoverable() {
    for len in [1,7,8,9,15,16,17] {
        let mut bits = BitVec::from_elem(len,false);
        bits.set(0,true);
        bits.set(len-1,true);
        let packed = pack(&bits);
        let padding = packed[packed.len()-1];
        assert!(padding <= 7);
        assert_eq!(packed.len(),(len + 7)/8 + 1);
        assert_eq!((packed.len() - 1)*8 - padding as usize,len);
        assert_eq!(unpack(&packed).expect("unpack failed"),bits);
    }
}

#[test]
fn empty_stream_is_just_the_trailer() {
    let packed = pack(&BitVec::new());
    assert_eq!(packed,vec![0]);
    assert_eq!(unpack(&packed).expect("unpack failed"),BitVec::new());
}

#[test]
fn bad_trailer_is_rejected() {
    assert!(matches!(unpack(&[]),Err(Error::CorruptPayload)));
    assert!(matches!(unpack(&[0xff,8]),Err(Error::CorruptPayload)));
    // padding cannot claim more bits than were packed
    assert!(matches!(unpack(&[3]),Err(Error::CorruptPayload)));
}
