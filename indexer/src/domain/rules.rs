//! Pure protocol rules: name-length schedule, the mint-open predicate, and
//! price-terms evaluation. No side effects, no store access.

use crate::domain::constants::{GENESIS_BLOCK, INITIAL_AVAILABLE, UNLOCK_INTERVAL};
use crate::domain::models::Dune;

/// Minimal view of a transaction output needed by the pricing rules
#[derive(Debug, Clone)]
pub struct OutputSats<'a> {
    pub address: Option<&'a str>,
    pub value_sats: u64,
}

/// Minimum etchable name length at `block`: starts at 13 and drops by one
/// every unlock interval
pub fn minimum_name_length(block: u32) -> u32 {
    let elapsed = block.saturating_sub(GENESIS_BLOCK);
    INITIAL_AVAILABLE.saturating_sub(elapsed / UNLOCK_INTERVAL)
}

/// Whether `dune` can be minted by the transaction at `(block, tx_index)`.
///
/// With `offset` the mint being evaluated is counted against the cap, so a
/// dune whose cap is already met closes exactly at the capth mint.
pub fn is_mint_open(block: u32, tx_index: u32, dune: &Dune, offset: bool) -> bool {
    if dune.unmintable {
        return false;
    }

    // No self-mint in the etching transaction
    if dune.creation_block() == block && dune.creation_tx_index() == tx_index {
        return false;
    }

    let total_mints = dune.mints.saturating_add(u128::from(offset));
    if let Some(cap) = dune.mint_cap {
        if !dune.is_flex() && total_mints > cap {
            return false;
        }
    }

    let creation_block = dune.creation_block();

    let relative_start = dune
        .mint_offset_start
        .map(|offset| creation_block.saturating_add(offset));
    let start = match (dune.mint_start, relative_start) {
        (Some(absolute), Some(relative)) => Some(absolute.max(relative)),
        (absolute, relative) => absolute.or(relative),
    }
    .unwrap_or(creation_block);

    let relative_end = dune
        .mint_offset_end
        .map(|offset| creation_block.saturating_add(offset));
    let end = match (dune.mint_end, relative_end) {
        (Some(absolute), Some(relative)) => Some(absolute.min(relative)),
        (absolute, relative) => absolute.or(relative),
    };

    start <= block && end.map_or(true, |end| block <= end)
}

/// Total satoshis the transaction pays to `pay_to`
pub fn sats_paid_to(outputs: &[OutputSats<'_>], pay_to: &str) -> u64 {
    outputs
        .iter()
        .filter(|out| out.address == Some(pay_to))
        .map(|out| out.value_sats)
        .sum()
}

/// Price-terms check: with price terms set, the transaction must pay the
/// designated address and the minted amount must equal paid / unit-price
pub fn is_price_terms_met(dune: &Dune, outputs: &[OutputSats<'_>]) -> bool {
    let (Some(price_amount), Some(pay_to)) = (dune.price_amount, dune.price_pay_to.as_deref())
    else {
        return true;
    };

    let paid = sats_paid_to(outputs, pay_to);
    if paid == 0 {
        return false;
    }

    let implied = u128::from(paid) / u128::from(price_amount);
    match dune.mint_amount {
        // Flex mode: the minted amount is the implied amount by definition
        Some(0) | None => implied > 0,
        Some(fixed) => implied == fixed,
    }
}

/// Units credited by a mint of `dune` in a transaction with `outputs`.
/// Fixed mode yields the per-mint amount; flex mode divides the satoshis
/// paid to the price address by the unit price.
pub fn mint_amount(dune: &Dune, outputs: &[OutputSats<'_>]) -> u128 {
    if dune.is_flex() {
        let pay_to = dune.price_pay_to.as_deref().unwrap_or_default();
        let price = dune.price_amount.unwrap_or(0);
        if price == 0 {
            return 0;
        }
        u128::from(sats_paid_to(outputs, pay_to)) / u128::from(price)
    } else {
        dune.mint_amount.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dune() -> Dune {
        Dune {
            id: 1,
            dune_protocol_id: "840100:2".to_string(),
            name: "HELLO".to_string(),
            symbol: None,
            decimals: 0,
            premine: 0,
            mints: 0,
            mint_cap: Some(100),
            mint_amount: Some(10),
            mint_start: None,
            mint_end: None,
            mint_offset_start: None,
            mint_offset_end: None,
            price_amount: None,
            price_pay_to: None,
            turbo: true,
            unmintable: false,
            burnt_amount: 0,
            etch_transaction_id: 1,
            deployer_address_id: 4,
        }
    }

    #[test]
    fn name_length_schedule() {
        assert_eq!(minimum_name_length(840_000), 13);
        assert_eq!(minimum_name_length(840_000 + 17_499), 13);
        assert_eq!(minimum_name_length(840_000 + 17_500), 12);
        assert_eq!(minimum_name_length(840_000 + 12 * 17_500), 1);
        assert_eq!(minimum_name_length(840_000 + 13 * 17_500), 0);
        // Before genesis nothing has unlocked
        assert_eq!(minimum_name_length(0), 13);
    }

    #[test]
    fn mint_open_by_default_after_creation() {
        let dune = test_dune();
        assert!(is_mint_open(840_101, 0, &dune, true));
        assert!(is_mint_open(840_100, 3, &dune, true));
    }

    #[test]
    fn mint_closed_for_unmintable() {
        let dune = Dune {
            unmintable: true,
            ..test_dune()
        };
        assert!(!is_mint_open(840_101, 0, &dune, true));
    }

    #[test]
    fn mint_closed_at_creation_point() {
        let dune = test_dune();
        assert!(!is_mint_open(840_100, 2, &dune, true));
        // A different tx index in the same block is fine
        assert!(is_mint_open(840_100, 5, &dune, true));
    }

    #[test]
    fn mint_closed_once_cap_is_reached() {
        let dune = Dune {
            mints: 100,
            ..test_dune()
        };
        assert!(!is_mint_open(840_101, 0, &dune, true));
        // Without counting the pending mint the window still reads open
        assert!(is_mint_open(840_101, 0, &dune, false));

        let almost = Dune {
            mints: 99,
            ..test_dune()
        };
        assert!(is_mint_open(840_101, 0, &almost, true));
    }

    #[test]
    fn mint_window_takes_max_of_absolute_and_relative_start() {
        let dune = Dune {
            mint_start: Some(840_200),
            mint_offset_start: Some(500),
            ..test_dune()
        };
        // creation 840100 + offset 500 = 840600 > absolute 840200
        assert!(!is_mint_open(840_300, 0, &dune, true));
        assert!(is_mint_open(840_600, 0, &dune, true));
    }

    #[test]
    fn mint_window_takes_min_of_absolute_and_relative_end() {
        let dune = Dune {
            mint_end: Some(841_000),
            mint_offset_end: Some(100),
            ..test_dune()
        };
        // creation 840100 + offset 100 = 840200 < absolute 841000
        assert!(is_mint_open(840_200, 0, &dune, true));
        assert!(!is_mint_open(840_201, 0, &dune, true));
    }

    #[test]
    fn mint_window_defaults_to_creation_block() {
        let dune = test_dune();
        assert!(!is_mint_open(840_099, 0, &dune, true));
        assert!(is_mint_open(840_100, 0, &dune, true));
    }

    #[test]
    fn price_terms_absent_always_pass() {
        let dune = test_dune();
        assert!(is_price_terms_met(&dune, &[]));
    }

    #[test]
    fn flex_price_terms() {
        let dune = Dune {
            mint_amount: Some(0),
            price_amount: Some(1000),
            price_pay_to: Some("bc1qseller".to_string()),
            ..test_dune()
        };
        let outputs = [
            OutputSats {
                address: Some("bc1qseller"),
                value_sats: 4500,
            },
            OutputSats {
                address: Some("bc1qchange"),
                value_sats: 99_999,
            },
        ];
        assert!(is_price_terms_met(&dune, &outputs));
        assert_eq!(mint_amount(&dune, &outputs), 4);

        // No payment to the designated address
        let unpaid = [OutputSats {
            address: Some("bc1qchange"),
            value_sats: 4500,
        }];
        assert!(!is_price_terms_met(&dune, &unpaid));
    }

    #[test]
    fn fixed_mode_with_price_requires_exact_amount() {
        let dune = Dune {
            mint_amount: Some(10),
            price_amount: Some(100),
            price_pay_to: Some("bc1qseller".to_string()),
            ..test_dune()
        };
        let exact = [OutputSats {
            address: Some("bc1qseller"),
            value_sats: 1_050,
        }];
        // floor(1050 / 100) = 10 units, matches the fixed amount
        assert!(is_price_terms_met(&dune, &exact));

        let short = [OutputSats {
            address: Some("bc1qseller"),
            value_sats: 900,
        }];
        assert!(!is_price_terms_met(&dune, &short));
    }

    #[test]
    fn payment_sums_across_outputs() {
        let outputs = [
            OutputSats {
                address: Some("bc1qseller"),
                value_sats: 300,
            },
            OutputSats {
                address: Some("bc1qseller"),
                value_sats: 700,
            },
            OutputSats {
                address: None,
                value_sats: 50,
            },
        ];
        assert_eq!(sats_paid_to(&outputs, "bc1qseller"), 1000);
    }
}
