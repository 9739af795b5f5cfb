pub mod block;
pub mod model;
pub mod pow;
pub mod validator;

pub use block::Block;
pub use model::Ledger;
pub use pow::ProofOfWork;
pub use validator::ChainValidator;

/// Proof-of-Work difficulty (number of leading hex zeros).
pub const DEFAULT_DIFFICULTY: usize = 4;

/// Genesis block constants.
pub const GENESIS_PROOF: i64 = 1;
pub const GENESIS_PREVIOUS_HASH: &str = "0";
