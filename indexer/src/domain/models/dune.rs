/// An etched token. `mints` and `burnt_amount` grow monotonically; every
/// other attribute is fixed at etch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dune {
    pub id: i64,
    /// `block:tx` of the etching; `1:0` for the genesis dune
    pub dune_protocol_id: String,
    pub name: String,
    pub symbol: Option<String>,
    pub decimals: u8,
    pub premine: u128,
    /// Completed mint count (not minted units)
    pub mints: u128,
    pub mint_cap: Option<u128>,
    pub mint_amount: Option<u128>,
    pub mint_start: Option<u32>,
    pub mint_end: Option<u32>,
    pub mint_offset_start: Option<u32>,
    pub mint_offset_end: Option<u32>,
    pub price_amount: Option<u64>,
    pub price_pay_to: Option<String>,
    pub turbo: bool,
    pub unmintable: bool,
    pub burnt_amount: u128,
    pub etch_transaction_id: i64,
    pub deployer_address_id: i64,
}

impl Dune {
    /// Block component of the protocol id
    pub fn creation_block(&self) -> u32 {
        self.dune_protocol_id
            .split(':')
            .next()
            .and_then(|b| b.parse().ok())
            .unwrap_or(0)
    }

    /// Transaction-index component of the protocol id
    pub fn creation_tx_index(&self) -> u32 {
        self.dune_protocol_id
            .split(':')
            .nth(1)
            .and_then(|t| t.parse().ok())
            .unwrap_or(0)
    }

    /// Flex mode: minted quantity is paid-sats / unit-price at mint time
    pub fn is_flex(&self) -> bool {
        self.mint_amount == Some(0) && self.price_amount.is_some() && self.price_pay_to.is_some()
    }
}
