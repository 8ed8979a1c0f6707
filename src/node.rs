// Stack-entry data model (spec section 3): tagged stack values carrying a
// digest that may be borrowed from an input buffer or owned inline, plus the
// positional metadata the VM needs to validate each merge.

use core::cmp::min;

/// Inline storage for owned digests — merge outputs are always exactly 32
/// bytes, so this never needs to grow.
pub const MAX_DIGEST_BYTES: usize = 32;

/// A digest, either borrowed from a source buffer (proof/leaf nodes, for
/// zero-copy reads) or owned inline (merge outputs). Length is always
/// `<= MAX_DIGEST_BYTES`.
#[derive(Clone, Copy, Debug)]
pub enum Digest<'a> {
    Borrowed(&'a [u8]),
    Owned([u8; MAX_DIGEST_BYTES], u8),
}

impl<'a> Digest<'a> {
    pub fn owned(bytes: &[u8]) -> Self {
        let mut buf = [0u8; MAX_DIGEST_BYTES];
        let len = min(bytes.len(), MAX_DIGEST_BYTES);
        buf[..len].copy_from_slice(&bytes[..len]);
        Digest::Owned(buf, len as u8)
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Digest::Borrowed(bytes) => bytes,
            Digest::Owned(buf, len) => &buf[..*len as usize],
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartialEq for Digest<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Digest<'_> {}

/// The role a stack entry currently plays. Entries evolve monotonically:
/// `Proof`/fresh `Node` -> `Node` (via opcode 3) -> `Peak` (via opcode 5) ->
/// consumed by opcode 4. See spec section 4.4's state machine diagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Node,
    Proof,
    Peak,
}

/// A single stack slot. `position`/`height` are meaningful only for `Node`
/// entries; `Proof` and `Peak` entries carry a digest but no positional
/// commitment (a `Proof` entry's position is inferred only at the point a
/// merge or peak-mark opcode consumes it).
#[derive(Clone, Copy, Debug)]
pub struct StackEntry<'a> {
    pub kind: Kind,
    pub node: Digest<'a>,
    pub position: u64,
    pub height: u32,
}

impl<'a> StackEntry<'a> {
    pub fn node(node: Digest<'a>, position: u64, height: u32) -> Self {
        StackEntry { kind: Kind::Node, node, position, height }
    }

    pub fn proof(node: Digest<'a>) -> Self {
        StackEntry { kind: Kind::Proof, node, position: 0, height: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_digest_round_trips_bytes() {
        let bytes = [7u8; 32];
        let d = Digest::owned(&bytes);
        assert_eq!(d.as_bytes(), &bytes[..]);
        assert_eq!(d.len(), 32);
    }

    #[test]
    fn borrowed_and_owned_compare_by_bytes() {
        let bytes = [9u8; 32];
        let borrowed = Digest::Borrowed(&bytes);
        let owned = Digest::owned(&bytes);
        assert_eq!(borrowed, owned);
    }

    #[test]
    fn owned_digest_truncates_oversized_input() {
        let bytes = [1u8; 40];
        let d = Digest::owned(&bytes);
        assert_eq!(d.len(), MAX_DIGEST_BYTES);
    }
}
