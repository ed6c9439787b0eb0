use std::fmt;
use std::str::FromStr;

/// Protocol identifier of a dune: the block height and transaction index of
/// its etching, written `block:tx`
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct DuneId {
    pub block: u32,
    pub tx: u32,
}

impl DuneId {
    pub fn new(block: u32, tx: u32) -> Self {
        Self { block, tx }
    }

    /// The self-referential form `0:0`, rewritten by the engine to the dune
    /// etched in the carrying transaction
    pub fn is_self_reference(&self) -> bool {
        self.block == 0 && self.tx == 0
    }
}

impl fmt::Display for DuneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block, self.tx)
    }
}

impl FromStr for DuneId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (block, tx) = s.split_once(':').ok_or(())?;
        Ok(DuneId {
            block: block.parse().map_err(|_| ())?,
            tx: tx.parse().map_err(|_| ())?,
        })
    }
}
