// MMR positional arithmetic: pure functions over 64-bit post-order node
// positions. No allocation, no I/O. See ckb_mmr.h's `_mmr_*` family for the
// reference this is ported from.

/// Distance from a left child at height `h` to its parent.
pub const fn parent_offset(height: u32) -> u64 {
    2u64 << height
}

/// Distance between siblings at height `h`.
pub const fn sibling_offset(height: u32) -> u64 {
    (2u64 << height) - 1
}

/// Position of the left-most peak when the tree is a perfect binary tree of
/// height `h`.
pub const fn peak_pos_by_height(height: u32) -> u64 {
    (1u64 << (height + 1)) - 2
}

/// True iff `n > 0` and every bit up to its highest set bit is 1, i.e.
/// `n == 2^k - 1` for some `k`.
fn all_ones(num: u64) -> bool {
    num != 0 && num.count_zeros() == num.leading_zeros()
}

/// Subtract `2^(bitlen(p) - 1) - 1` from `p`, walking toward the left-most
/// descendant of the same height.
fn jump_left(pos: u64) -> u64 {
    let bit_length = 64 - pos.leading_zeros() as u64;
    let most_significant_bit = 1u64 << (bit_length - 1);
    pos - (most_significant_bit - 1)
}

/// The tree height of the node at `pos` (0 for leaves).
pub fn height_of_position(pos: u64) -> u32 {
    let mut q = pos + 1;
    while !all_ones(q) {
        q = jump_left(q);
    }
    63 - q.leading_zeros()
}

/// A cursor over the MMR's peaks during left-to-right (or right-extending)
/// traversal, used by opcode 5 to validate peak declarations in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peak {
    pub pos: u64,
    pub height: u32,
    pub present: bool,
}

/// The left-most peak of an MMR with `mmr_size` nodes. Only absent when
/// `mmr_size == 0`; callers must reject that case before calling this (the
/// VM does so via the `mmr_size > 0` precondition).
pub fn left_peak(mmr_size: u64) -> Peak {
    let mut height = 1u32;
    let mut prev_pos = 0u64;
    let mut pos = peak_pos_by_height(height);
    while pos < mmr_size {
        height += 1;
        prev_pos = pos;
        pos = peak_pos_by_height(height);
    }
    Peak {
        pos: prev_pos,
        height: height - 1,
        present: true,
    }
}

/// Advance `peak` to the next peak to the right within an MMR of
/// `mmr_size` nodes, walking back down in height whenever the candidate
/// position runs past the end of the MMR. Sets `present = false` once no
/// further peak exists.
pub fn right_peak(peak: Peak, mmr_size: u64) -> Peak {
    let mut height = peak.height;
    let mut pos = peak.pos + sibling_offset(height);
    while pos > mmr_size - 1 {
        if height == 0 {
            return Peak {
                pos: peak.pos,
                height: peak.height,
                present: false,
            };
        }
        pos -= parent_offset(height - 1);
        height -= 1;
    }
    Peak {
        pos,
        height,
        present: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_heights_are_zero() {
        for pos in [0u64, 1, 3, 4, 7, 8, 10, 11] {
            assert_eq!(height_of_position(pos), 0, "pos {pos}");
        }
    }

    #[test]
    fn internal_node_heights() {
        // positions: 0,1 leaves, 2 = parent(0,1) height 1
        assert_eq!(height_of_position(2), 1);
        // 3,4 leaves, 5 = parent(3,4) height 1, 6 = parent(2,5) height 2
        assert_eq!(height_of_position(5), 1);
        assert_eq!(height_of_position(6), 2);
    }

    #[test]
    fn peak_pos_matches_perfect_tree_sizes() {
        // height 0 -> single leaf tree has 1 node, peak at pos 0
        assert_eq!(peak_pos_by_height(0), 0);
        // height 1 -> 3 nodes total (0,1,2), peak at pos 2
        assert_eq!(peak_pos_by_height(1), 2);
        // height 2 -> 7 nodes total, peak at pos 6
        assert_eq!(peak_pos_by_height(2), 6);
    }

    #[test]
    fn left_peak_single_tree() {
        // mmr_size = 3: one perfect tree of height 1, peak at pos 2
        let peak = left_peak(3);
        assert_eq!(peak, Peak { pos: 2, height: 1, present: true });
    }

    #[test]
    fn left_peak_and_right_peak_walk_three_leaves() {
        // positions 0,1 leaves; 2 = parent; 3 = third leaf; mmr_size = 4
        let first = left_peak(4);
        assert_eq!(first, Peak { pos: 2, height: 1, present: true });
        let second = right_peak(first, 4);
        assert_eq!(second, Peak { pos: 3, height: 0, present: true });
        let third = right_peak(second, 4);
        assert!(!third.present);
    }

    #[test]
    fn all_ones_matches_mersenne_numbers() {
        assert!(all_ones(1));
        assert!(all_ones(3));
        assert!(all_ones(7));
        assert!(!all_ones(0));
        assert!(!all_ones(2));
        assert!(!all_ones(6));
    }
}
