use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashType {
    Md5,
    Sha256,
    Sha3,
    Blake2b,
    Blake2s,
    Blake3,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonMode {
    // Compare size and modify time
    Quick,
    // Size first, then modify time, then content
    #[default]
    Standard,
    // Size, then checksum
    Thorough(HashType),
}
