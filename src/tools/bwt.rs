//! Burrows-Wheeler transform stage.
//!
//! The forward transform sorts the starting offsets of the cyclic rotations
//! rather than materializing the rotations themselves.  The inverse rebuilds
//! the original text from the last column and the primary index using the
//! usual LF mapping.

use std::cmp::Ordering;

/// Compare the cyclic rotations of `dat` starting at `a` and `b`.
/// Bytes are compared unsigned, exiting at the first mismatch.
fn cmp_rotations(dat: &[u8],a: usize,b: usize) -> Ordering {
    let n = dat.len();
    for k in 0..n {
        let ca = dat[(a + k) % n];
        let cb = dat[(b + k) % n];
        if ca != cb {
            return ca.cmp(&cb);
        }
    }
    // rotations only compare equal when the input is periodic
    Ordering::Equal
}

/// Forward transform.  Returns the last column of the sorted rotation matrix
/// and the primary index, i.e. the sorted position of the rotation starting
/// at offset 0.  Caller must reject empty input first.
pub fn forward(ibuf: &[u8]) -> (Vec<u8>,usize) {
    let n = ibuf.len();
    let mut idx: Vec<usize> = (0..n).collect();
    idx.sort_unstable_by(|&a,&b| cmp_rotations(ibuf,a,b));
    let mut last_col = Vec::with_capacity(n);
    let mut primary = 0;
    for (i,&start) in idx.iter().enumerate() {
        last_col.push(ibuf[(start + n - 1) % n]);
        if start == 0 {
            primary = i;
        }
    }
    (last_col,primary)
}

/// Inverse transform.  `primary` must already be validated against the
/// length of `last_col`, a corrupt index is caught by the container parser.
pub fn inverse(last_col: &[u8],primary: usize) -> Vec<u8> {
    let n = last_col.len();
    // rank[i] counts occurrences of last_col[i] before position i
    let mut count = [0usize;256];
    let mut rank = vec![0usize;n];
    for i in 0..n {
        rank[i] = count[last_col[i] as usize];
        count[last_col[i] as usize] += 1;
    }
    // first_pos[c] is where symbol c starts in the sorted first column
    let mut first_pos = [0usize;256];
    let mut sum = 0;
    for c in 0..256 {
        first_pos[c] = sum;
        sum += count[c];
    }
    let mut ans = vec![0u8;n];
    let mut i = primary;
    for k in (0..n).rev() {
        ans[k] = last_col[i];
        i = first_pos[last_col[i] as usize] + rank[i];
    }
    ans
}

#[test]
fn banana_last_column() {
    let (last_col,primary) = forward("banana".as_bytes());
    assert_eq!(last_col,"nnbaaa".as_bytes());
    assert_eq!(primary,3);
}

#[test]
fn single_byte() {
    let (last_col,primary) = forward("A".as_bytes());
    assert_eq!(last_col,"A".as_bytes());
    assert_eq!(primary,0);
    assert_eq!(inverse(&last_col,primary),"A".as_bytes());
}

#[test]
fn invertibility() {
    for dat in ["a","ab","banana","abracadabra","mississippi river"] {
        let (last_col,primary) = forward(dat.as_bytes());
        assert_eq!(inverse(&last_col,primary),dat.as_bytes());
    }
}

#[test]
fn periodic_input() {
    // identical rotations tie in the sort, the transmitted primary index
    // keeps the inverse exact no matter how the tie lands
    let dat = "abababab".as_bytes();
    let (last_col,primary) = forward(dat);
    assert_eq!(inverse(&last_col,primary),dat);
}

#[test]
fn full_alphabet() {
    let dat: Vec<u8> = (0..=255).collect();
    let (last_col,primary) = forward(&dat);
    assert_eq!(last_col.len(),dat.len());
    assert_eq!(inverse(&last_col,primary),dat);
}
