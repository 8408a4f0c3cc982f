//! # Transaction Records
//!
//! A UMI transaction is a fixed 150-byte buffer with this layout:
//!
//! ```text
//! ┌───────────┬────────┬──────────────────────────────────────────┐
//! │ field     │ offset │ notes                                    │
//! ├───────────┼────────┼──────────────────────────────────────────┤
//! │ version   │ 0      │ u8, see [`Version`]                      │
//! │ sender    │ 1..35  │ 34-byte address                          │
//! │ recipient │ 35..69 │ 34-byte address (see aliasing below)     │
//! │ value     │ 69..77 │ u64 big-endian                           │
//! │ nonce     │ 77..85 │ u64 big-endian                           │
//! │ signature │ 85..149│ Ed25519 over bytes 0..85                 │
//! │ reserved  │ 149    │ one trailing byte, always present        │
//! └───────────┴────────┴──────────────────────────────────────────┘
//! ```
//!
//! ## Field aliasing — read this before "cleaning it up"
//!
//! Smart-contract transactions reinterpret the front of the *recipient*
//! address: bytes 35–36 (the recipient's version) double as the contract
//! `prefix`, bytes 37–38 as `profit_percent` and bytes 39–40 as
//! `fee_percent`. This is intentional field overlap in the wire format, not
//! an accident — the percent setters really do scribble over the
//! recipient's public key region. Splitting these into separate storage
//! would silently break compatibility with every deployed implementation.
//!
//! ## Signing vs. hashing
//!
//! The signature covers exactly bytes 0..85. The hash covers all 150 bytes,
//! signature included, so hashing before and after signing yields different
//! digests *by design* — an unsigned transaction and its signed twin are
//! different objects on the wire.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Address;
use crate::config::{
    MAX_BASIC_VALUE, MAX_FEE_PERCENT, MAX_PROFIT_PERCENT, MIN_PROFIT_PERCENT, SIGNATURE_LENGTH,
    TRANSACTION_LENGTH, VERSION_UMI,
};
use crate::crypto::{sha256, SecretKey};

const SENDER_RANGE: Range<usize> = 1..35;
const RECIPIENT_RANGE: Range<usize> = 35..69;
const PREFIX_RANGE: Range<usize> = 35..37;
const PROFIT_RANGE: Range<usize> = 37..39;
const FEE_RANGE: Range<usize> = 39..41;
const VALUE_RANGE: Range<usize> = 69..77;
const NONCE_RANGE: Range<usize> = 77..85;
const BODY_RANGE: Range<usize> = 0..85;
const SIGNATURE_RANGE: Range<usize> = 85..149;

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// Discriminant for the operation a transaction represents.
///
/// The version byte selects which validation rules apply in
/// [`Transaction::verify`]. Version bytes outside this enum are not
/// rejected at the buffer level — they simply match none of the
/// version-specific rule sets and get the signature check only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Version {
    /// Reserved for the genesis block; never valid in a live transaction.
    Genesis = 0,
    /// Plain value transfer.
    Basic = 1,
    /// Deploy a smart contract.
    CreateSmartContract = 2,
    /// Update a deployed smart contract.
    UpdateSmartContract = 3,
    /// Change a contract's profit address.
    UpdateProfitAddress = 4,
    /// Change a contract's fee address.
    UpdateFeeAddress = 5,
    /// Register a transit address.
    CreateTransitAddress = 6,
    /// Deregister a transit address.
    DeleteTransitAddress = 7,
}

impl Version {
    /// Parse a raw version byte. Returns `None` for bytes this enum does
    /// not name; those still travel fine on the wire.
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Genesis),
            1 => Some(Self::Basic),
            2 => Some(Self::CreateSmartContract),
            3 => Some(Self::UpdateSmartContract),
            4 => Some(Self::UpdateProfitAddress),
            5 => Some(Self::UpdateFeeAddress),
            6 => Some(Self::CreateTransitAddress),
            7 => Some(Self::DeleteTransitAddress),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Buffer-contract failures: the bytes aren't even a transaction record.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransactionError {
    /// A raw buffer of the wrong size.
    #[error("invalid transaction length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },
}

/// Rule failures from [`Transaction::verify`].
///
/// The checks run in a fixed order and the first failing rule wins, so a
/// transaction that is wrong in three ways reports the earliest offense.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Genesis-version transactions are never valid.
    #[error("invalid version")]
    InvalidVersion,

    /// A basic transaction's value exceeds the consensus bound.
    #[error("invalid value")]
    InvalidValue,

    /// Sender and recipient are the same address.
    #[error("invalid recipient")]
    InvalidRecipient,

    /// A smart-contract transaction targets the plain `"umi"` prefix.
    #[error("invalid prefix")]
    InvalidPrefix,

    /// Profit percent outside the allowed 100–500 range.
    #[error("invalid profit percent")]
    InvalidProfitPercent,

    /// Fee percent above 2000.
    #[error("invalid fee percent")]
    InvalidFeePercent,

    /// The Ed25519 signature does not verify against the sender's key.
    #[error("invalid signature")]
    InvalidSignature,
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A 150-byte transaction record.
///
/// The buffer *is* the wire format; every accessor reads or writes its
/// exact byte range and nothing else. Extracting an embedded address gives
/// a value copy — mutating it never touches this buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Transaction {
    bytes: [u8; TRANSACTION_LENGTH],
}

impl Transaction {
    /// The fixed byte length of every transaction record.
    pub const LENGTH: usize = TRANSACTION_LENGTH;

    /// Create a zeroed transaction with version [`Version::Basic`].
    pub fn new() -> Self {
        let mut tx = Self {
            bytes: [0; TRANSACTION_LENGTH],
        };
        tx.set_version(Version::Basic);
        tx
    }

    /// Copy a transaction from a raw byte slice of exactly 150 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let bytes: [u8; TRANSACTION_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| TransactionError::InvalidLength {
                    expected: TRANSACTION_LENGTH,
                    got: bytes.len(),
                })?;
        Ok(Self { bytes })
    }

    /// The raw version byte at offset 0.
    pub fn version(&self) -> u8 {
        self.bytes[0]
    }

    /// Set the version byte.
    pub fn set_version(&mut self, version: Version) -> &mut Self {
        self.bytes[0] = version as u8;
        self
    }

    /// The sender address at bytes 1..35, as a value copy.
    pub fn sender(&self) -> Address {
        Address::from_bytes(&self.bytes[SENDER_RANGE]).expect("sender range is 34 bytes")
    }

    /// Overwrite the sender address.
    pub fn set_sender(&mut self, sender: &Address) -> &mut Self {
        self.bytes[SENDER_RANGE].copy_from_slice(sender.as_bytes());
        self
    }

    /// The recipient address at bytes 35..69, as a value copy.
    pub fn recipient(&self) -> Address {
        Address::from_bytes(&self.bytes[RECIPIENT_RANGE]).expect("recipient range is 34 bytes")
    }

    /// Overwrite the recipient address.
    pub fn set_recipient(&mut self, recipient: &Address) -> &mut Self {
        self.bytes[RECIPIENT_RANGE].copy_from_slice(recipient.as_bytes());
        self
    }

    /// The contract prefix version — an alias of the recipient's version
    /// field (bytes 35..37).
    pub fn prefix_version(&self) -> u16 {
        self.read_u16(PREFIX_RANGE)
    }

    /// Set the contract prefix version. Overwrites the recipient's version
    /// field; that is the wire format, not a bug.
    pub fn set_prefix_version(&mut self, version: u16) -> &mut Self {
        self.write_u16(PREFIX_RANGE, version)
    }

    /// The contract profit percent — aliases bytes 37..39 of the recipient's
    /// key region. Hundredths of a percent: 250 means 2.50%.
    pub fn profit_percent(&self) -> u16 {
        self.read_u16(PROFIT_RANGE)
    }

    /// Set the profit percent.
    pub fn set_profit_percent(&mut self, percent: u16) -> &mut Self {
        self.write_u16(PROFIT_RANGE, percent)
    }

    /// The contract fee percent — aliases bytes 39..41 of the recipient's
    /// key region.
    pub fn fee_percent(&self) -> u16 {
        self.read_u16(FEE_RANGE)
    }

    /// Set the fee percent.
    pub fn set_fee_percent(&mut self, percent: u16) -> &mut Self {
        self.write_u16(FEE_RANGE, percent)
    }

    /// The transferred value at bytes 69..77.
    pub fn value(&self) -> u64 {
        self.read_u64(VALUE_RANGE)
    }

    /// Set the transferred value.
    pub fn set_value(&mut self, value: u64) -> &mut Self {
        self.write_u64(VALUE_RANGE, value)
    }

    /// The sender nonce at bytes 77..85.
    pub fn nonce(&self) -> u64 {
        self.read_u64(NONCE_RANGE)
    }

    /// Set the sender nonce.
    pub fn set_nonce(&mut self, nonce: u64) -> &mut Self {
        self.write_u64(NONCE_RANGE, nonce)
    }

    /// The signature at bytes 85..149, as a value copy.
    pub fn signature(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut sig = [0u8; SIGNATURE_LENGTH];
        sig.copy_from_slice(&self.bytes[SIGNATURE_RANGE]);
        sig
    }

    /// Overwrite the signature bytes directly.
    pub fn set_signature(&mut self, signature: &[u8; SIGNATURE_LENGTH]) -> &mut Self {
        self.bytes[SIGNATURE_RANGE].copy_from_slice(signature);
        self
    }

    /// Sign the transaction body (bytes 0..85), writing the signature into
    /// bytes 85..149. Mutating any body field afterwards invalidates it.
    pub fn sign(&mut self, key: &SecretKey) -> &mut Self {
        let signature = key.sign(&self.bytes[BODY_RANGE]);
        self.bytes[SIGNATURE_RANGE].copy_from_slice(&signature);
        self
    }

    /// SHA-256 over the full 150 bytes, signature included. Computed fresh
    /// on every call so it always reflects the current buffer state.
    pub fn hash(&self) -> [u8; 32] {
        sha256(&self.bytes)
    }

    /// Run the consensus validation rules, in order; the first failing rule
    /// wins.
    ///
    /// 1. Genesis transactions are always invalid.
    /// 2. Basic: value bounded by [`MAX_BASIC_VALUE`]; sender ≠ recipient.
    /// 3. Create/UpdateSmartContract: recipient prefix must not be `"umi"`;
    ///    profit percent in 100..=500; fee percent at most 2000.
    /// 4. Every version: the signature must verify against the sender's key.
    pub fn verify(&self) -> Result<(), ValidationError> {
        match Version::from_u8(self.version()) {
            Some(Version::Genesis) => return Err(ValidationError::InvalidVersion),
            Some(Version::Basic) => {
                if self.value() > MAX_BASIC_VALUE {
                    return Err(ValidationError::InvalidValue);
                }
                if self.bytes[SENDER_RANGE] == self.bytes[RECIPIENT_RANGE] {
                    return Err(ValidationError::InvalidRecipient);
                }
            }
            Some(Version::CreateSmartContract | Version::UpdateSmartContract) => {
                // Comparing the version field is exactly the prefix
                // comparison: the packing is bijective.
                if self.prefix_version() == VERSION_UMI {
                    return Err(ValidationError::InvalidPrefix);
                }
                let profit = self.profit_percent();
                if !(MIN_PROFIT_PERCENT..=MAX_PROFIT_PERCENT).contains(&profit) {
                    return Err(ValidationError::InvalidProfitPercent);
                }
                if self.fee_percent() > MAX_FEE_PERCENT {
                    return Err(ValidationError::InvalidFeePercent);
                }
            }
            _ => {}
        }

        let signature = self.signature();
        if !self
            .sender()
            .public_key()
            .verify(&self.bytes[BODY_RANGE], &signature)
        {
            return Err(ValidationError::InvalidSignature);
        }

        Ok(())
    }

    /// Copy the raw 150 bytes out.
    pub fn to_bytes(&self) -> [u8; TRANSACTION_LENGTH] {
        self.bytes
    }

    /// Borrow the raw 150 bytes.
    pub fn as_bytes(&self) -> &[u8; TRANSACTION_LENGTH] {
        &self.bytes
    }

    fn read_u16(&self, range: Range<usize>) -> u16 {
        u16::from_be_bytes(self.bytes[range].try_into().expect("range is 2 bytes"))
    }

    fn write_u16(&mut self, range: Range<usize>, value: u16) -> &mut Self {
        self.bytes[range].copy_from_slice(&value.to_be_bytes());
        self
    }

    fn read_u64(&self, range: Range<usize>) -> u64 {
        u64::from_be_bytes(self.bytes[range].try_into().expect("range is 8 bytes"))
    }

    fn write_u64(&mut self, range: Range<usize>, value: u64) -> &mut Self {
        self.bytes[range].copy_from_slice(&value.to_be_bytes());
        self
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("version", &self.version())
            .field("value", &self.value())
            .field("nonce", &self.nonce())
            .field("hash", &hex::encode(self.hash()))
            .finish()
    }
}
