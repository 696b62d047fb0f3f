use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum CodecError {
    #[error("invalid codec id")]
    InvalidCodecID,

    #[error("invalid message type")]
    InvalidMessageType,

    #[error("invalid message length: got {got}, expected {expected}")]
    InvalidMessageLength { got: usize, expected: usize },

    #[error("invalid BLS public key")]
    InvalidBLSPublicKey,
}
