use std::ops::RangeInclusive;

/// ======================= Seed input =======================
/// Bitcoin-style base58 alphabet used by Solana addresses and signatures.
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// A 64-byte ed25519 signature encodes to 87 or 88 base58 characters.
pub const TRANSACTION_SIGNATURE_LENGTH: RangeInclusive<usize> = 87..=88;

/// A 32-byte public key encodes to at most 44 base58 characters.
pub const ACCOUNT_ADDRESS_LENGTH: RangeInclusive<usize> = 32..=44;

/// ======================= Native tokens =======================
/// Asset id given to transfers that carry no mint (native SOL movements).
pub const NATIVE_ASSET_ID: &str = "So11111111111111111111111111111111111111112";

/// ======================= Explorer =======================
/// Number of flows requested per account page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Name of the environment variable overriding `data_service.base_url`.
pub const DATA_SERVICE_URL_ENV: &str = "SHABAKA_DATA_SERVICE_URL";

pub const DEFAULT_CONFIG_PATH: &str = "Config.toml";
