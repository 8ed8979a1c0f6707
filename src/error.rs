// Error kinds (spec section 7). Plain, allocation-free enum, matching the
// teacher's style elsewhere in the workspace (CommitTypeError, MathError,
// etc. are all `#[derive(Debug, Clone, PartialEq, Eq)]` with no anyhow or
// thiserror dependency).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    /// Stack overflow or underflow for the current opcode.
    InvalidStack,
    /// Opcode byte outside `{1..5}`.
    InvalidCommand,
    /// Any structural or semantic mismatch: zero mmr_size, out-of-order or
    /// out-of-range leaves, sibling-position mismatch, bad bagging operand,
    /// peak-position mismatch, excess leaves, wrong final stack size, or
    /// root mismatch.
    InvalidProof,
    /// Proof cursor exhausted mid-record. Reserved for ABI parity with the
    /// C reference; this crate's readers never distinguish it from
    /// `NodeEof` (see SPEC_FULL.md section 9.1).
    ProofEof,
    /// Length-prefixed node record truncated.
    NodeEof,
    /// Leaf position field truncated.
    LeafEof,
    /// Clean end-of-stream signal from the leaf cursor.
    NoMoreLeaves,
    /// Clean end-of-stream signal from the proof cursor; the only failure
    /// variant that terminates the main loop successfully.
    NoMoreCommands,
}

impl VerifyError {
    /// Numeric value matching the original C header's `enum MMRErrorCode`
    /// (`ERROR_INVALID_STACK = 80`, counting up). Provided purely as a
    /// documented bridge for callers that need to match the C ABI; no
    /// behavior in this crate depends on it.
    pub const fn code(self) -> u8 {
        match self {
            VerifyError::InvalidStack => 80,
            VerifyError::InvalidCommand => 81,
            VerifyError::InvalidProof => 82,
            VerifyError::ProofEof => 83,
            VerifyError::LeafEof => 84,
            VerifyError::NoMoreLeaves => 85,
            VerifyError::NoMoreCommands => 86,
            VerifyError::NodeEof => 87,
        }
    }
}

impl core::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let message = match self {
            VerifyError::InvalidStack => "stack overflow or underflow",
            VerifyError::InvalidCommand => "opcode outside {1..5}",
            VerifyError::InvalidProof => "proof does not match the committed root",
            VerifyError::ProofEof => "proof stream exhausted mid-record",
            VerifyError::NodeEof => "node record truncated",
            VerifyError::LeafEof => "leaf position field truncated",
            VerifyError::NoMoreLeaves => "no more leaves",
            VerifyError::NoMoreCommands => "no more commands",
        };
        f.write_str(message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VerifyError {}
