//! Protocol constants for the Dunes token protocol.

/// First block at which dunestones are interpreted
pub const GENESIS_BLOCK: u32 = 840_000;

/// Interval, in blocks, at which the minimum etchable name length drops by one
pub const UNLOCK_INTERVAL: u32 = 17_500;

/// Minimum name length required at the genesis block
pub const INITIAL_AVAILABLE: u32 = 13;

/// Confirmations a taproot name commitment must have before the etching is valid
pub const COMMIT_CONFIRMATIONS: u32 = 6;

/// scriptPubKey type an etching commitment input must spend from
pub const TAPROOT_SCRIPT_PUBKEY_TYPE: &str = "witness_v1_taproot";

/// Accepted values of the dunestone `p` protocol field
pub const PROTOCOL_TAGS: [&str; 2] = ["dunes", "https://dunes.sh"];

/// Protocol id assigned to the synthetic genesis dune
pub const GENESIS_DUNE_PROTOCOL_ID: &str = "1:0";

/// Name of the synthetic genesis dune
pub const GENESIS_DUNE_NAME: &str = "UNCOMMONGOODS";

/// Currency symbol of the synthetic genesis dune
pub const GENESIS_DUNE_SYMBOL: char = '\u{29C9}';

/// Last block of the genesis dune's mint window
pub const GENESIS_MINT_END: u32 = 1_050_000;

/// Reserved address row: coinbase / genesis sentinel
pub const COINBASE_ADDRESS_ID: i64 = 1;

/// Reserved address row: OP_RETURN burn sink
pub const OP_RETURN_ADDRESS_ID: i64 = 2;

/// Reserved address row: inputs whose address cannot be resolved
pub const UNKNOWN_ADDRESS_ID: i64 = 3;

/// Address strings stored for the three reserved rows
pub const RESERVED_ADDRESS_STRINGS: [(i64, &str); 3] = [
    (COINBASE_ADDRESS_ID, "COINBASE"),
    (OP_RETURN_ADDRESS_ID, "OP_RETURN"),
    (UNKNOWN_ADDRESS_ID, "UNKNOWN"),
];
