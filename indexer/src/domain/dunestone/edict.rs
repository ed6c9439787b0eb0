use crate::domain::dunestone::DuneId;

/// A declarative balance movement inside a dunestone.
///
/// `output == vout_count` is the spread form: the amount is distributed
/// across all non-OP_RETURN outputs. The wire schema fixes the width at
/// u8; larger values fail schema validation before reaching the engine.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Edict {
    pub id: DuneId,
    pub amount: u128,
    pub output: u8,
}
