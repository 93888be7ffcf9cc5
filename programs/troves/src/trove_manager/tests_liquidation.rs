#[cfg(test)]
mod tests {
    use anchor_lang::prelude::Pubkey;

    use crate::{
        assert_fuzzy_eq,
        trove_manager::{
            liquidation::{batch_liquidate_troves, liquidate, liquidate_troves_by_id},
            liquidation_calcs::{self, SystemMode},
            tests_utils::utils::{
                assert_sorted, entire_coll, entire_debt, new_ledger, new_trove, price, NOW,
            },
        },
        utils::coretypes::{DEBT, ETH},
        Ledger, TroveError, TroveStatus,
    };

    /// bob is safe, t1 < t2 < t3 are increasingly healthy and all within
    /// reach of a price drop to 180.
    fn ledger_with_risky_tail() -> (Ledger, Pubkey, Vec<Pubkey>) {
        let mut ledger = new_ledger();
        let (bob, _) = new_trove(&mut ledger, ETH::from(100.0), DEBT::from(2000.0), price(200.0), NOW);
        let risky = [12.5, 13.0, 14.0]
            .iter()
            .map(|coll| {
                new_trove(&mut ledger, ETH::from(*coll), DEBT::from(2000.0), price(200.0), NOW).0
            })
            .collect();
        (ledger, bob, risky)
    }

    #[test]
    fn test_liquidate_healthy_trove_fails() {
        let (mut ledger, bob, risky) = ledger_with_risky_tail();
        assert_eq!(
            liquidate(&mut ledger, bob, price(200.0)),
            Err(TroveError::NothingToLiquidate)
        );
        assert_eq!(
            liquidate(&mut ledger, risky[0], price(200.0)),
            Err(TroveError::NothingToLiquidate)
        );
    }

    #[test]
    fn test_liquidate_unknown_trove_fails() {
        let (mut ledger, _, _) = ledger_with_risky_tail();
        assert_eq!(
            liquidate(&mut ledger, Pubkey::new_unique(), price(100.0)),
            Err(TroveError::TroveNotActive)
        );
    }

    #[test]
    fn test_liquidate_last_trove_fails() {
        let mut ledger = new_ledger();
        let (bob, _) = new_trove(&mut ledger, ETH::from(20.0), DEBT::from(2000.0), price(200.0), NOW);
        assert_eq!(
            liquidate(&mut ledger, bob, price(100.0)),
            Err(TroveError::OnlyOneTroveInSystem)
        );
    }

    #[test]
    fn test_liquidate_normal_mode() {
        let (mut ledger, bob, risky) = ledger_with_risky_tail();
        let t1 = risky[0];
        let debt = entire_debt(&ledger, &t1);

        let effects = liquidate(&mut ledger, t1, price(180.0)).unwrap();

        assert_eq!(effects.owner, t1);
        assert_eq!(effects.totals.coll_gas_compensation, ETH::from(12.5) / 200);
        assert_eq!(
            effects.totals.coll_redistributed,
            ETH::from(12.5) - ETH::from(12.5) / 200
        );
        assert_eq!(effects.totals.debt_redistributed, debt);
        assert_eq!(effects.totals.debt_gas_compensation, DEBT::from(200.0));
        assert_eq!(effects.totals.coll_surplus, 0);

        assert_eq!(ledger.troves.status_of(&t1), TroveStatus::ClosedByLiquidation);
        assert!(!ledger.sorted_troves.contains(&t1));
        assert_eq!(ledger.troves.count(), 3);
        assert_eq!(ledger.market.default_pool.coll, effects.totals.coll_redistributed);
        assert_eq!(ledger.market.default_pool.debt, debt);

        let t1_trove = ledger.troves.get(&t1).unwrap();
        assert_eq!((t1_trove.coll, t1_trove.debt, t1_trove.stake), (0, 0, 0));

        // bob's share follows his stake, 100 out of 127
        assert_fuzzy_eq!(
            entire_coll(&ledger, &bob),
            ETH::from(100.0) + effects.totals.coll_redistributed * 100 / 127,
            1000
        );
        assert_sorted(&ledger);
    }

    #[test]
    fn test_liquidate_recovery_mode_caps_collateral() {
        let mut ledger = new_ledger();
        let (bob, _) = new_trove(&mut ledger, ETH::from(30.0), DEBT::from(2000.0), price(200.0), NOW);
        let (alice, _) = new_trove(&mut ledger, ETH::from(20.0), DEBT::from(2000.0), price(200.0), NOW);

        // TCR 147%, alice at 117.6%
        let (mode, _) = liquidation_calcs::calc_system_mode(&ledger.market, price(130.0)).unwrap();
        assert_eq!(mode, SystemMode::Recovery);

        let effects = liquidate(&mut ledger, alice, price(130.0)).unwrap();

        // 2210 * 1.1 / 130 = 18.7
        let capped: u128 = 18_700_000_000_000_000_000;
        assert_eq!(effects.totals.coll_gas_compensation, capped / 200);
        assert_eq!(effects.totals.coll_redistributed, capped - capped / 200);
        assert_eq!(effects.totals.coll_surplus, ETH::from(20.0) - capped);
        assert_eq!(ledger.market.surplus_coll, ETH::from(20.0) - capped);

        assert_fuzzy_eq!(
            entire_coll(&ledger, &bob),
            ETH::from(30.0) + capped - capped / 200,
            1000
        );
        assert_eq!(ledger.troves.status_of(&alice), TroveStatus::ClosedByLiquidation);
    }

    #[test]
    fn test_recovery_mode_leaves_troves_above_ccr() {
        let mut ledger = new_ledger();
        let (bob, _) = new_trove(&mut ledger, ETH::from(40.0), DEBT::from(2000.0), price(200.0), NOW);
        new_trove(&mut ledger, ETH::from(15.0), DEBT::from(2000.0), price(200.0), NOW);

        // TCR 136%, bob at 199%
        assert_eq!(
            liquidate(&mut ledger, bob, price(110.0)),
            Err(TroveError::NothingToLiquidate)
        );
    }

    #[test]
    fn test_batch_liquidates_from_tail_until_healthy() {
        let (mut ledger, bob, risky) = ledger_with_risky_tail();

        let effects = batch_liquidate_troves(&mut ledger, price(180.0), 10).unwrap();

        let liquidated: Vec<Pubkey> = effects.liquidated.iter().map(|e| e.owner).collect();
        assert_eq!(liquidated, vec![risky[0], risky[1]]);
        assert!(ledger.troves.is_active(&risky[2]));
        assert!(ledger.troves.is_active(&bob));
        assert_eq!(
            effects.totals.debt_gas_compensation,
            DEBT::from(400.0)
        );
        assert_eq!(
            effects.totals.coll_gas_compensation,
            effects.liquidated[0].totals.coll_gas_compensation
                + effects.liquidated[1].totals.coll_gas_compensation
        );
        assert_sorted(&ledger);
    }

    #[test]
    fn test_batch_respects_iteration_budget() {
        let (mut ledger, _, risky) = ledger_with_risky_tail();

        let effects = batch_liquidate_troves(&mut ledger, price(180.0), 1).unwrap();
        assert_eq!(effects.liquidated.len(), 1);
        assert_eq!(effects.liquidated[0].owner, risky[0]);
        assert!(ledger.troves.is_active(&risky[1]));
    }

    #[test]
    fn test_batch_with_nothing_to_liquidate_fails() {
        let (mut ledger, _, _) = ledger_with_risky_tail();
        assert_eq!(
            batch_liquidate_troves(&mut ledger, price(200.0), 10),
            Err(TroveError::NothingToLiquidate)
        );
        assert_eq!(
            batch_liquidate_troves(&mut ledger, price(100.0), 0),
            Err(TroveError::NothingToLiquidate)
        );
    }

    #[test]
    fn test_batch_stops_at_last_trove() {
        let mut ledger = new_ledger();
        new_trove(&mut ledger, ETH::from(100.0), DEBT::from(2000.0), price(200.0), NOW);
        new_trove(&mut ledger, ETH::from(13.0), DEBT::from(2000.0), price(200.0), NOW);

        // everything is under water at 10
        let effects = batch_liquidate_troves(&mut ledger, price(10.0), 10).unwrap();
        assert_eq!(effects.liquidated.len(), 1);
        assert_eq!(ledger.troves.count(), 1);
    }

    #[test]
    fn test_liquidate_by_id_skips_ineligible() {
        let (mut ledger, bob, risky) = ledger_with_risky_tail();
        let unknown = Pubkey::new_unique();

        let effects = liquidate_troves_by_id(
            &mut ledger,
            &[bob, risky[2], risky[0], unknown],
            price(180.0),
        )
        .unwrap();

        assert_eq!(effects.liquidated.len(), 1);
        assert_eq!(effects.liquidated[0].owner, risky[0]);
        assert!(ledger.troves.is_active(&risky[2]));
        assert_sorted(&ledger);
    }

    #[test]
    fn test_liquidate_by_id_with_no_eligible_fails() {
        let (mut ledger, bob, _) = ledger_with_risky_tail();
        assert_eq!(
            liquidate_troves_by_id(&mut ledger, &[bob], price(180.0)),
            Err(TroveError::NothingToLiquidate)
        );
    }

    #[test]
    fn test_liquidation_keeps_system_debt() {
        let (mut ledger, _, risky) = ledger_with_risky_tail();
        let debt_before = ledger.market.system_balances().unwrap().debt;
        let coll_before = ledger.market.system_balances().unwrap().coll;

        let effects = liquidate(&mut ledger, risky[0], price(180.0)).unwrap();

        let after = ledger.market.system_balances().unwrap();
        // the debt moves to the other troves, the gas compensation leaves
        assert_eq!(after.debt, debt_before);
        assert_eq!(after.coll, coll_before - effects.totals.coll_gas_compensation);
    }
}
