//! Static Huffman coding stage.
//!
//! The container carries only the frequency table, so the decoder rebuilds
//! the tree itself.  Both sides seed the heap in ascending symbol order and
//! break equal frequencies by insertion order, which makes the two trees
//! identical bit for bit.  Nodes live in an arena addressed by `u32`; a leaf
//! is tagged by its variant, never by a sentinel symbol.

use bit_vec::BitVec;
use std::collections::BinaryHeap;
use std::cmp::Reverse;
use crate::Error;

enum Node {
    Leaf(u8),
    Branch(u32,u32)
}

/// Huffman tree in arena form.  The tree lives only while codes are being
/// derived or a payload is being decoded.
pub struct Tree {
    nodes: Vec<Node>,
    root: u32
}

impl Tree {
    /// Build the tree from a 256 slot frequency array, zero meaning the
    /// symbol is absent.  The two minimum nodes are joined first-out on the
    /// left until one node remains.  A table with a single entry yields a
    /// lone leaf.  An empty table cannot come from any input, valid or
    /// corrupt, so it is reported as a broken invariant.
    pub fn build(freqs: &[u64;256]) -> Result<Self,Error> {
        let mut nodes = Vec::new();
        let mut heap: BinaryHeap<Reverse<(u64,u32)>> = BinaryHeap::new();
        for (sym,&f) in freqs.iter().enumerate() {
            if f == 0 {
                continue;
            }
            heap.push(Reverse((f,nodes.len() as u32)));
            nodes.push(Node::Leaf(sym as u8));
        }
        loop {
            let Reverse((f1,n1)) = match heap.pop() {
                Some(min) => min,
                None => return Err(Error::InvariantViolation)
            };
            let Reverse((f2,n2)) = match heap.pop() {
                Some(min) => min,
                None => return Ok(Self { nodes, root: n1 })
            };
            heap.push(Reverse((f1 + f2,nodes.len() as u32)));
            nodes.push(Node::Branch(n1,n2));
        }
    }
    /// Derive the code table by depth first traversal, appending 0 on the
    /// left descent and 1 on the right.  A lone leaf gets the one bit
    /// code `0`.
    pub fn codes(&self) -> Vec<Option<BitVec>> {
        let mut ans: Vec<Option<BitVec>> = vec![None;256];
        let mut stack = vec![(self.root,BitVec::new())];
        while let Some((n,prefix)) = stack.pop() {
            match self.nodes[n as usize] {
                Node::Leaf(sym) => {
                    ans[sym as usize] = match prefix.len() {
                        0 => Some(BitVec::from_elem(1,false)),
                        _ => Some(prefix)
                    };
                },
                Node::Branch(left,right) => {
                    let mut zero = prefix.clone();
                    zero.push(false);
                    let mut one = prefix;
                    one.push(true);
                    stack.push((right,one));
                    stack.push((left,zero));
                }
            }
        }
        ans
    }
    /// Walk the tree emitting a symbol at each leaf until `count` symbols
    /// are out.  Bits left over at that point are alignment padding and are
    /// ignored.  Running out of bits early means the payload is corrupt.
    pub fn decode(&self,bits: &BitVec,count: usize) -> Result<Vec<u8>,Error> {
        let mut ans = Vec::with_capacity(count);
        let mut n = self.root;
        for bit in bits.iter() {
            if ans.len() >= count {
                break;
            }
            n = match self.nodes[n as usize] {
                Node::Branch(left,right) => match bit {
                    false => left,
                    true => right
                },
                // a lone leaf root carries no edges to follow
                Node::Leaf(_) => return Err(Error::CorruptPayload)
            };
            if let Node::Leaf(sym) = self.nodes[n as usize] {
                ans.push(sym);
                n = self.root;
            }
        }
        if ans.len() < count {
            log::error!("payload exhausted after {} of {} symbols",ans.len(),count);
            return Err(Error::CorruptPayload);
        }
        Ok(ans)
    }
}

/// Concatenate the code of every symbol in `ibuf`.
pub fn encode(ibuf: &[u8],codes: &[Option<BitVec>]) -> Result<BitVec,Error> {
    let mut ans = BitVec::new();
    for &c in ibuf {
        match &codes[c as usize] {
            Some(code) => {
                for bit in code.iter() {
                    ans.push(bit);
                }
            },
            None => return Err(Error::InvariantViolation)
        }
    }
    Ok(ans)
}

// *************** TESTS *****************

#[cfg(test)]
fn tally(dat: &[u8]) -> [u64;256] {
    let mut freqs = [0u64;256];
    for &c in dat {
        freqs[c as usize] += 1;
    }
    freqs
}

#[test]
fn abracadabra_codes() {
    // frequencies a:5 b:2 c:1 d:1 r:2
    let freqs = tally("abracadabra".as_bytes());
    let tree = Tree::build(&freqs).expect("tree build failed");
    let codes = tree.codes();
    let get = |c: u8| codes[c as usize].as_ref().expect("missing code");
    assert_eq!(get(b'a'),&[false].iter().copied().collect::<BitVec>());
    assert_eq!(get(b'c'),&[true,false,false].iter().copied().collect::<BitVec>());
    assert_eq!(get(b'd'),&[true,false,true].iter().copied().collect::<BitVec>());
    assert_eq!(get(b'b'),&[true,true,false].iter().copied().collect::<BitVec>());
    assert_eq!(get(b'r'),&[true,true,true].iter().copied().collect::<BitVec>());
}

#[test]
fn codes_are_prefix_free() {
    let freqs = tally("the quick brown fox jumps over the lazy dog".as_bytes());
    let tree = Tree::build(&freqs).expect("tree build failed");
    let codes: Vec<BitVec> = tree.codes().into_iter().flatten().collect();
    for i in 0..codes.len() {
        for j in 0..codes.len() {
            if i == j {
                continue;
            }
            let (a,b) = (&codes[i],&codes[j]);
            let is_prefix = a.len() <= b.len() && a.iter().zip(b.iter()).all(|(x,y)| x==y);
            assert!(!is_prefix);
        }
    }
}

#[test]
fn invertibility() {
    let dat = "abracadabra".as_bytes();
    let freqs = tally(dat);
    let tree = Tree::build(&freqs).expect("tree build failed");
    let bits = encode(dat,&tree.codes()).expect("encoding failed");
    assert_eq!(bits.len(),23); // 5*1 + 6*3
    assert_eq!(tree.decode(&bits,dat.len()).expect("decoding failed"),dat);
}

#[test]
fn lone_leaf_code() {
    let freqs = tally("AAAAA".as_bytes());
    let tree = Tree::build(&freqs).expect("tree build failed");
    let codes = tree.codes();
    assert_eq!(codes[b'A' as usize].as_ref().expect("missing code").len(),1);
    let bits = encode("AAAAA".as_bytes(),&codes).expect("encoding failed");
    assert_eq!(bits,BitVec::from_elem(5,false));
}

#[test]
fn starved_payload_is_detected() {
    let dat = "abracadabra".as_bytes();
    let freqs = tally(dat);
    let tree = Tree::build(&freqs).expect("tree build failed");
    let mut bits = encode(dat,&tree.codes()).expect("encoding failed");
    bits.truncate(10);
    assert!(matches!(tree.decode(&bits,dat.len()),Err(Error::CorruptPayload)));
}

#[test]
fn empty_table_is_an_invariant_break() {
    assert!(matches!(Tree::build(&[0u64;256]),Err(Error::InvariantViolation)));
}
