//! Protocol constants shared by both chain families.

/// Number of fractional digits carried by a [`crate::Fixed8`].
pub const FIXED8_DECIMALS: u32 = 8;

/// Raw units in one whole [`crate::Fixed8`] unit.
pub const FIXED8_SCALE: i64 = 100_000_000;

/// Base58check version byte of UTXO-model chain addresses.
pub const NEO_ADDRESS_VERSION: u8 = 0x17;

/// Base58check version byte of wallet import format strings.
pub const WIF_VERSION: u8 = 0x80;

/// Trailing marker on a WIF payload for a compressed public key.
pub const WIF_COMPRESSED_SUFFIX: u8 = 0x01;

/// Width of one ABI word in bytes.
pub const ABI_WORD_BYTES: usize = 32;

/// Largest integer width (in bytes) accepted for account-model quantities.
pub const MAX_QUANTITY_BYTES: usize = 32;

/// Length of a secp256k1 / P-256 private scalar.
pub const PRIVATE_KEY_LEN: usize = 32;
