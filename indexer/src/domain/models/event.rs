/// Kind of an audit-log event, persisted as its discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventType {
    Etch = 0,
    Mint = 1,
    Transfer = 2,
    Burn = 3,
}

impl EventType {
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    pub fn from_i16(value: i16) -> Option<EventType> {
        match value {
            0 => Some(EventType::Etch),
            1 => Some(EventType::Mint),
            2 => Some(EventType::Transfer),
            3 => Some(EventType::Burn),
            _ => None,
        }
    }
}

/// Append-only audit log row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    pub event_type: EventType,
    pub block: u32,
    pub transaction_id: i64,
    pub dune_id: i64,
    pub amount: u128,
    pub from_address_id: i64,
    pub to_address_id: i64,
}
