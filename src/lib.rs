// ============ CKB Merkle Mountain Range Inclusion-Proof Verifier ============
// A bounded stack machine that checks a streaming proof program against a
// committed MMR root. Ported from the on-chain reference verifier
// (nervosnetwork/merkle-mountain-range's ckb_mmr.h) into safe, generic Rust.
//
// Scope: verification only. Proof generation, MMR construction/persistence,
// and any higher-level wrapping (CLI, on-chain script entry, test harness)
// are out of scope — see SPEC_FULL.md section 1.

#![cfg_attr(not(feature = "std"), no_std)]

mod error;
mod merge;
mod node;
mod position;
mod reader;
mod vm;

pub use error::VerifyError;
pub use merge::{Merge, CKB_HASH_PERSONALIZATION};
pub use node::{Digest, Kind, StackEntry, MAX_DIGEST_BYTES};
pub use position::{height_of_position, left_peak, right_peak, Peak};
pub use reader::{CommandReader, LeafReader, NodeReader, SliceLeafReader, SliceProofReader};
pub use vm::{verify_with, Vm, MMR_STACK_SIZE};

#[cfg(feature = "std")]
pub use merge::Blake2bMerge;

/// Verifies that `leaves` (implied by the proof program's opcode-`1`
/// pushes, consumed from `leaf_bytes`) are consistent with `root` under
/// `proof_bytes`, for an MMR of `mmr_size` nodes.
///
/// This is the convenience entry point described in spec section 6: it
/// wires up the default slice-backed readers and the default blake2b-32
/// merge (personalized with `"ckb-default-hash"`, matching CKB's canonical
/// hash). Callers needing a custom reader or merge (e.g. a `no_std` build
/// backed by `blake2b-rs` instead of `blake2b_simd`) should use
/// [`verify_with`] directly.
#[cfg(feature = "std")]
pub fn verify(
    root: &[u8],
    mmr_size: u64,
    proof_bytes: &[u8],
    leaf_bytes: &[u8],
) -> Result<(), VerifyError> {
    let mut proof = SliceProofReader::new(proof_bytes);
    let mut leaves = SliceLeafReader::new(leaf_bytes);
    verify_with(root, mmr_size, &mut proof, &mut leaves, Blake2bMerge)
}
