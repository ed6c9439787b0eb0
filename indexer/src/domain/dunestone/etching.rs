/// Token-creation payload of a dunestone
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Etching {
    /// Decimal places, 0..=18
    pub divisibility: u8,
    /// Units credited to the etcher before any mint
    pub premine: u128,
    /// Supplied name; `None` requests a generated reserved name
    pub dune: Option<String>,
    /// Currency symbol, a single codepoint
    pub symbol: Option<char>,
    pub terms: Option<Terms>,
    pub turbo: bool,
}

/// Mint terms attached to an etching
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Terms {
    /// Units per mint; `Some(0)` with price terms selects flex mode
    pub amount: Option<u128>,
    /// Maximum number of mints
    pub cap: Option<u128>,
    /// Absolute mint window `[start, end]`
    pub height: (Option<u32>, Option<u32>),
    /// Mint window relative to the etching block
    pub offset: (Option<u32>, Option<u32>),
    pub price: Option<PriceTerms>,
}

/// Pay-to-mint pricing
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PriceTerms {
    /// Satoshis per minted unit
    pub amount: u64,
    /// Address the payment must reach
    pub pay_to: String,
}

impl Etching {
    pub const MAX_DIVISIBILITY: u8 = 18;
    pub const MAX_NAME_LENGTH: usize = 31;

    /// Flex mode: per-mint amount is zero and the minted quantity is derived
    /// from satoshis paid at mint time
    pub fn is_flex(&self) -> bool {
        match &self.terms {
            Some(terms) => terms.amount == Some(0) && terms.price.is_some(),
            None => false,
        }
    }
}
