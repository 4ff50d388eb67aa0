//! Move-to-front transform stage.
//!
//! The symbol list starts as the identity permutation of all 256 byte
//! values; position 0 always holds the most recently used symbol, so runs
//! of similar bytes become runs of small indices.

/// Replace each byte by its position in the evolving symbol list.
pub fn forward(ibuf: &[u8]) -> Vec<u8> {
    let mut symbols: Vec<u8> = (0..=255).collect();
    let mut ans = Vec::with_capacity(ibuf.len());
    for &c in ibuf {
        let idx = symbols.iter().position(|&s| s==c).unwrap(); // list holds all 256 values
        ans.push(idx as u8);
        symbols.remove(idx);
        symbols.insert(0,c);
    }
    ans
}

/// Replace each index by the byte found there in the evolving list.
pub fn inverse(ibuf: &[u8]) -> Vec<u8> {
    let mut symbols: Vec<u8> = (0..=255).collect();
    let mut ans = Vec::with_capacity(ibuf.len());
    for &idx in ibuf {
        let c = symbols.remove(idx as usize);
        ans.push(c);
        symbols.insert(0,c);
    }
    ans
}

#[test]
fn known_indices() {
    assert_eq!(forward("banana".as_bytes()),vec![98,98,110,1,1,1]);
    assert_eq!(inverse(&[98,98,110,1,1,1]),"banana".as_bytes());
}

#[test]
fn repeats_collapse_to_zero() {
    assert_eq!(forward(&[7,7,7,7]),vec![7,0,0,0]);
}

#[test]
fn invertibility() {
    let dat: Vec<u8> = (0..=255).rev().collect();
    assert_eq!(inverse(&forward(&dat)),dat);
    let dat = "the rain in spain".as_bytes();
    assert_eq!(inverse(&forward(dat)),dat);
}
