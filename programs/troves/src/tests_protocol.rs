#[cfg(test)]
mod tests {
    use anchor_lang::prelude::Pubkey;
    use decimal_wad::decimal::Decimal;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use rand::thread_rng;

    use crate::{
        token_operations::{
            DebtToken, FixedPriceFeed, InMemoryDebtToken, InMemoryPool, InMemorySurplusPool,
            SurplusPool,
        },
        trove_manager::{
            tests_utils::utils::{
                assert_collateral_conserved, assert_pools_match_ledger, new_protocol, open_args,
                price, TestProtocol, NOW,
            },
            types::{AdjustTroveParams, RedeemCollateralArgs},
        },
        utils::{
            consts::{BORROWING_FEE_FLOOR, DECIMAL_PRECISION, REDEMPTION_FEE_FLOOR},
            coretypes::{DEBT, ETH},
            math,
        },
        GlobalConfig, GlobalConfigOption, ProtocolAccounts, TroveError, TroveStatus,
    };

    fn open(protocol: &mut TestProtocol, coll: f64, debt: f64) -> Pubkey {
        let owner = Pubkey::new_unique();
        protocol
            .open_trove(owner, &open_args(ETH::from(coll), DEBT::from(debt)), NOW)
            .unwrap();
        owner
    }

    fn snapshot(protocol: &TestProtocol) -> String {
        format!(
            "{:?} {:?} {:?} {:?} {:?}",
            protocol.ledger,
            protocol.active_pool,
            protocol.default_pool,
            protocol.surplus_pool,
            protocol.debt_token
        )
    }

    #[test]
    fn test_open_trove_moves_tokens() {
        let mut protocol = new_protocol(GlobalConfig::default(), price(200.0));
        let owner = open(&mut protocol, 20.0, 2000.0);

        assert_eq!(protocol.debt_token.balance_of(&owner), DEBT::from(2000.0));
        assert_eq!(
            protocol.debt_token.balance_of(&protocol.fee_recipient),
            DEBT::from(10.0)
        );
        assert_eq!(
            protocol.debt_token.balance_of(&protocol.gas_pool),
            DEBT::from(200.0)
        );
        assert_eq!(protocol.debt_token.total_supply(), DEBT::from(2210.0));
        assert_eq!(protocol.get_trove_status(&owner), TroveStatus::Active);
        assert_pools_match_ledger(&protocol);
    }

    #[test]
    fn test_lifecycle_keeps_pools_in_sync() {
        let mut protocol = new_protocol(GlobalConfig::default(), price(200.0));
        let liquidator = Pubkey::new_unique();
        let bob = open(&mut protocol, 100.0, 2000.0);
        let alice = open(&mut protocol, 20.0, 2000.0);
        let carol = open(&mut protocol, 15.0, 2000.0);
        let mut deposited = ETH::from(135.0);
        assert_collateral_conserved(&protocol, deposited);

        protocol
            .adjust_trove(
                bob,
                &AdjustTroveParams {
                    coll_deposit: ETH::from(5.0),
                    debt_change: DEBT::from(1000.0),
                    is_debt_increase: true,
                    max_fee_percentage: DECIMAL_PRECISION,
                    ..AdjustTroveParams::default()
                },
                NOW,
            )
            .unwrap();
        deposited += ETH::from(5.0);
        assert_eq!(protocol.debt_token.balance_of(&bob), DEBT::from(3000.0));
        assert_collateral_conserved(&protocol, deposited);

        // carol drops to ~101.8%
        protocol.price_feed.set_price(price(150.0));
        let effects = protocol.liquidate(liquidator, carol).unwrap();
        assert_eq!(protocol.get_trove_status(&carol), TroveStatus::ClosedByLiquidation);
        assert_eq!(
            protocol.debt_token.balance_of(&liquidator),
            DEBT::from(200.0)
        );
        assert_eq!(
            protocol.active_pool.sent_to(&liquidator),
            effects.totals.coll_gas_compensation
        );
        assert_collateral_conserved(&protocol, deposited);

        // alice picked up part of carol's debt, her own balance no longer
        // covers a close
        let needed = protocol.get_entire_debt_and_coll(&alice).unwrap().debt - DEBT::from(200.0);
        let before = snapshot(&protocol);
        assert_eq!(
            protocol.close_trove(alice),
            Err(TroveError::InsufficientDebtBalance)
        );
        assert_eq!(snapshot(&protocol), before);
        assert_collateral_conserved(&protocol, deposited);

        let shortfall = needed - protocol.debt_token.balance_of(&alice);
        protocol
            .debt_token
            .transfer(&bob, &alice, shortfall)
            .unwrap();
        let entire_coll = protocol.get_entire_debt_and_coll(&alice).unwrap().coll;
        protocol.close_trove(alice).unwrap();

        assert_eq!(protocol.get_trove_status(&alice), TroveStatus::ClosedByOwner);
        assert_eq!(protocol.debt_token.balance_of(&alice), 0);
        assert_eq!(protocol.active_pool.sent_to(&alice), entire_coll);
        assert_collateral_conserved(&protocol, deposited);
    }

    #[test]
    fn test_failed_open_leaves_nothing_behind() {
        let mut protocol = new_protocol(GlobalConfig::default(), price(200.0));
        open(&mut protocol, 20.0, 2000.0);
        let before = snapshot(&protocol);

        protocol.price_feed.set_price(0);
        assert_eq!(
            protocol.open_trove(
                Pubkey::new_unique(),
                &open_args(ETH::from(20.0), DEBT::from(2000.0)),
                NOW
            ),
            Err(TroveError::PriceNotValid)
        );
        protocol.price_feed.set_price(price(200.0));
        assert_eq!(
            protocol.open_trove(
                Pubkey::new_unique(),
                &open_args(ETH::from(12.0), DEBT::from(2000.0)),
                NOW
            ),
            Err(TroveError::IcrBelowMcr)
        );
        assert_eq!(snapshot(&protocol), before);
    }

    #[test]
    fn test_adjust_repay_needs_balance() {
        let mut protocol = new_protocol(GlobalConfig::default(), price(200.0));
        let bob = open(&mut protocol, 100.0, 2000.0);
        open(&mut protocol, 20.0, 2000.0);
        protocol
            .debt_token
            .transfer(&bob, &Pubkey::new_unique(), DEBT::from(1900.0))
            .unwrap();

        let before = snapshot(&protocol);
        let res = protocol.adjust_trove(
            bob,
            &AdjustTroveParams {
                debt_change: DEBT::from(200.0),
                ..AdjustTroveParams::default()
            },
            NOW,
        );
        assert_eq!(res, Err(TroveError::InsufficientDebtBalance));
        assert_eq!(snapshot(&protocol), before);
    }

    #[test]
    fn test_batch_liquidation_pays_gas_once() {
        let mut protocol = new_protocol(GlobalConfig::default(), price(200.0));
        let liquidator = Pubkey::new_unique();
        open(&mut protocol, 100.0, 2000.0);
        let t1 = open(&mut protocol, 12.5, 2000.0);
        let t2 = open(&mut protocol, 13.0, 2000.0);

        protocol.price_feed.set_price(price(180.0));
        let effects = protocol.batch_liquidate_troves(liquidator, 10).unwrap();

        assert_eq!(effects.liquidated.len(), 2);
        assert_eq!(protocol.get_trove_status(&t1), TroveStatus::ClosedByLiquidation);
        assert_eq!(protocol.get_trove_status(&t2), TroveStatus::ClosedByLiquidation);
        assert_eq!(
            protocol.debt_token.balance_of(&liquidator),
            DEBT::from(400.0)
        );
        assert_eq!(
            protocol.active_pool.sent_to(&liquidator),
            effects.totals.coll_gas_compensation
        );
        assert_pools_match_ledger(&protocol);
    }

    #[test]
    fn test_liquidate_by_id_and_recovery_surplus() {
        let mut protocol = new_protocol(GlobalConfig::default(), price(200.0));
        open(&mut protocol, 30.0, 2000.0);
        let alice = open(&mut protocol, 20.0, 2000.0);

        protocol.price_feed.set_price(price(130.0));
        assert!(protocol.check_recovery_mode(price(130.0)).unwrap());
        let effects = protocol
            .liquidate_troves_by_id(Pubkey::new_unique(), &[alice])
            .unwrap();

        let surplus = effects.totals.coll_surplus;
        assert!(surplus > 0);
        assert_eq!(protocol.surplus_pool.surplus_of(&alice), surplus);
        assert_pools_match_ledger(&protocol);

        assert_eq!(protocol.claim_collateral(alice).unwrap(), surplus);
        assert_eq!(protocol.surplus_pool.surplus_of(&alice), 0);
        assert_eq!(protocol.ledger.market.surplus_coll, 0);
        assert_eq!(
            protocol.claim_collateral(alice),
            Err(TroveError::NoCollateralToClaim)
        );
        assert_pools_match_ledger(&protocol);
    }

    #[test]
    fn test_redemption_moves_tokens() {
        let mut protocol = new_protocol(GlobalConfig::default(), price(200.0));
        let whale = open(&mut protocol, 100.0, 5000.0);
        let low = open(&mut protocol, 20.0, 2000.0);
        let now = protocol.ledger.market.redemption_bootstrap_end;
        let supply_before = protocol.debt_token.total_supply();

        let hints = protocol
            .get_redemption_hints(DEBT::from(2010.0), price(200.0), 0)
            .unwrap();
        let effects = protocol
            .redeem_collateral(
                whale,
                &RedeemCollateralArgs {
                    amount: DEBT::from(2010.0),
                    first_redemption_hint: hints.first_redemption_hint,
                    partial_redemption_hint_nicr: hints.partial_redemption_hint_nicr,
                    max_fee_percentage: DECIMAL_PRECISION,
                    ..RedeemCollateralArgs::default()
                },
                now,
            )
            .unwrap();

        assert_eq!(protocol.get_trove_status(&low), TroveStatus::ClosedByRedemption);
        assert_eq!(
            protocol.debt_token.total_supply(),
            supply_before - DEBT::from(2210.0)
        );
        assert_eq!(protocol.debt_token.balance_of(&whale), DEBT::from(2990.0));
        assert_eq!(
            protocol.active_pool.sent_to(&whale),
            effects.coll_to_transfer_to_redeemer
        );
        assert_eq!(
            protocol.active_pool.sent_to(&protocol.fee_recipient),
            effects.coll_fee_to_fee_recipient
        );
        assert!(protocol.get_redemption_rate_with_decay(now).unwrap() > REDEMPTION_FEE_FLOOR);
        assert_pools_match_ledger(&protocol);

        let surplus = protocol.surplus_pool.surplus_of(&low);
        assert_eq!(surplus, ETH::from(20.0) - DEBT::from(2010.0) / 200);
        assert_eq!(protocol.claim_collateral(low).unwrap(), surplus);
        assert_pools_match_ledger(&protocol);
    }

    #[test]
    fn test_redemption_without_balance_rolls_back() {
        let mut protocol = new_protocol(GlobalConfig::default(), price(200.0));
        open(&mut protocol, 100.0, 5000.0);
        open(&mut protocol, 20.0, 2000.0);
        let now = protocol.ledger.market.redemption_bootstrap_end;
        let before = snapshot(&protocol);

        let res = protocol.redeem_collateral(
            Pubkey::new_unique(),
            &RedeemCollateralArgs {
                amount: DEBT::from(100.0),
                max_fee_percentage: DECIMAL_PRECISION,
                ..RedeemCollateralArgs::default()
            },
            now,
        );
        assert_eq!(res, Err(TroveError::InsufficientDebtBalance));
        assert_eq!(snapshot(&protocol), before);
    }

    #[test]
    fn test_update_global_config() {
        let mut protocol = new_protocol(GlobalConfig::default(), price(200.0));
        let key = |option: GlobalConfigOption| option as u16;

        protocol
            .update_global_config(key(GlobalConfigOption::MinNetDebt), 2500)
            .unwrap();
        assert_eq!(protocol.ledger.config.min_net_debt, DEBT::from(2500.0));
        assert_eq!(
            protocol.open_trove(
                Pubkey::new_unique(),
                &open_args(ETH::from(20.0), DEBT::from(2000.0)),
                NOW
            ),
            Err(TroveError::NetDebtBelowMinimum)
        );
        protocol
            .update_global_config(key(GlobalConfigOption::MinNetDebt), 1800)
            .unwrap();

        protocol
            .update_global_config(key(GlobalConfigOption::GasCompensation), 50)
            .unwrap();
        assert_eq!(protocol.ledger.config.gas_compensation, DEBT::from(50.0));
        open(&mut protocol, 20.0, 2000.0);
        assert_eq!(
            protocol.update_global_config(key(GlobalConfigOption::GasCompensation), 200),
            Err(TroveError::GlobalConfigValueError)
        );

        assert_eq!(
            protocol.update_global_config(key(GlobalConfigOption::MaxTroves), 0),
            Err(TroveError::GlobalConfigValueError)
        );
        protocol
            .update_global_config(key(GlobalConfigOption::MaxTroves), 1)
            .unwrap();
        assert!(protocol.ledger.sorted_troves.is_full());

        protocol
            .update_global_config(key(GlobalConfigOption::DebtCeiling), 1_000_000)
            .unwrap();
        assert_eq!(protocol.ledger.config.debt_ceiling, DEBT::from(1_000_000.0));

        protocol
            .update_global_config(key(GlobalConfigOption::IsBorrowingAllowed), 0)
            .unwrap();
        assert!(!protocol.ledger.config.is_borrowing_allowed);

        assert_eq!(
            protocol.update_global_config(key(GlobalConfigOption::RedemptionBootstrapPeriod), 0),
            Err(TroveError::GlobalConfigValueError)
        );
        assert_eq!(
            protocol.update_global_config(99, 1),
            Err(TroveError::GlobalConfigKeyError)
        );
    }

    #[test]
    fn test_bootstrap_period_before_initialization() {
        let mut protocol: TestProtocol = ProtocolAccounts::new(
            GlobalConfig::default(),
            InMemoryPool::new(Pubkey::new_unique()),
            InMemoryPool::new(Pubkey::new_unique()),
            InMemorySurplusPool::new(Pubkey::new_unique()),
            InMemoryDebtToken::new(),
            FixedPriceFeed::new(price(200.0)),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        protocol
            .update_global_config(GlobalConfigOption::RedemptionBootstrapPeriod as u16, 60)
            .unwrap();
        protocol.initialize_market(NOW).unwrap();
        assert_eq!(protocol.ledger.market.redemption_bootstrap_end, NOW + 60);
        assert_eq!(
            protocol.initialize_market(NOW),
            Err(TroveError::MarketAlreadyInitialized)
        );
    }

    #[test]
    fn test_views() {
        let mut protocol = new_protocol(GlobalConfig::default(), price(200.0));
        let bob = open(&mut protocol, 100.0, 2000.0);
        let alice = open(&mut protocol, 20.0, 2000.0);

        assert_eq!(protocol.fetch_price().unwrap(), price(200.0));
        assert_eq!(protocol.get_entire_system_coll().unwrap(), ETH::from(120.0));
        assert_eq!(protocol.get_entire_system_debt().unwrap(), DEBT::from(4420.0));
        assert!(!protocol.check_recovery_mode(price(200.0)).unwrap());
        // 120 * 150 / 4420 = 4.07
        assert!(protocol.get_tcr(price(150.0)).unwrap() > Decimal::from_percent(150));

        assert_eq!(
            protocol.get_nominal_icr(&alice).unwrap(),
            math::compute_nominal_cr(ETH::from(20.0), DEBT::from(2210.0))
        );
        assert_eq!(
            protocol.get_current_icr(&alice, price(200.0)).unwrap(),
            math::compute_cr(ETH::from(20.0), DEBT::from(2210.0), price(200.0))
        );
        assert_eq!(
            protocol.get_trove_status(&Pubkey::new_unique()),
            TroveStatus::NonExistent
        );
        assert_eq!(
            protocol.get_entire_debt_and_coll(&Pubkey::new_unique()).err(),
            Some(TroveError::TroveNotActive)
        );

        assert_eq!(
            protocol.get_borrowing_rate_with_decay(NOW).unwrap(),
            BORROWING_FEE_FLOOR
        );
        assert_eq!(
            protocol.get_redemption_rate_with_decay(NOW).unwrap(),
            REDEMPTION_FEE_FLOOR
        );
        assert_eq!(
            protocol
                .get_borrowing_fee_with_decay(DEBT::from(1000.0), NOW)
                .unwrap(),
            DEBT::from(5.0)
        );
        assert_eq!(
            protocol
                .get_redemption_fee_with_decay(ETH::from(10.0), NOW)
                .unwrap(),
            ETH::from(10.0) / 200
        );

        let hint = protocol
            .get_approx_hint(
                math::compute_nominal_cr(ETH::from(100.0), DEBT::from(2210.0)),
                50,
                &mut thread_rng(),
            )
            .unwrap();
        assert_eq!(hint.hint, Some(bob));
    }

    #[derive(Clone, Debug)]
    enum Step {
        Open(u8),
        Deposit(u8, u8),
        Withdraw(u8, u8),
        Close(u8),
        Liquidate(u8),
        BatchLiquidate,
        Redeem(u8, u8),
        Claim(u8),
        MovePrice(u8),
    }

    impl Arbitrary for Step {
        fn arbitrary(g: &mut Gen) -> Self {
            match u8::arbitrary(g) % 9 {
                0 => Step::Open(u8::arbitrary(g)),
                1 => Step::Deposit(u8::arbitrary(g), u8::arbitrary(g)),
                2 => Step::Withdraw(u8::arbitrary(g), u8::arbitrary(g)),
                3 => Step::Close(u8::arbitrary(g)),
                4 => Step::Liquidate(u8::arbitrary(g)),
                5 => Step::BatchLiquidate,
                6 => Step::Redeem(u8::arbitrary(g), u8::arbitrary(g)),
                7 => Step::Claim(u8::arbitrary(g)),
                _ => Step::MovePrice(u8::arbitrary(g)),
            }
        }
    }

    #[quickcheck]
    fn collateral_is_conserved_under_random_steps(steps: Vec<Step>) -> bool {
        let mut protocol = new_protocol(GlobalConfig::default(), price(200.0));
        let now = protocol.ledger.market.redemption_bootstrap_end;
        let liquidator = Pubkey::new_unique();
        let mut owners = vec![open(&mut protocol, 1000.0, 2000.0)];
        let mut deposited = ETH::from(1000.0);
        let pick = |owners: &Vec<Pubkey>, n: u8| owners[n as usize % owners.len()];

        for step in steps {
            match step {
                Step::Open(n) => {
                    // 15 to ~79 ETH against 2000
                    let coll = ETH::from(15.0) + ETH::from(n as f64 / 4.0);
                    let owner = Pubkey::new_unique();
                    let args = open_args(coll, DEBT::from(2000.0));
                    if protocol.open_trove(owner, &args, now).is_ok() {
                        owners.push(owner);
                        deposited += coll;
                    }
                }
                Step::Deposit(n, amount) => {
                    let params = AdjustTroveParams {
                        coll_deposit: ETH::from(amount as f64 / 8.0),
                        max_fee_percentage: DECIMAL_PRECISION,
                        ..AdjustTroveParams::default()
                    };
                    if protocol.adjust_trove(pick(&owners, n), &params, now).is_ok() {
                        deposited += params.coll_deposit;
                    }
                }
                Step::Withdraw(n, amount) => {
                    let params = AdjustTroveParams {
                        coll_withdrawal: ETH::from(amount as f64 / 16.0),
                        max_fee_percentage: DECIMAL_PRECISION,
                        ..AdjustTroveParams::default()
                    };
                    let _ = protocol.adjust_trove(pick(&owners, n), &params, now);
                }
                Step::Close(n) => {
                    let owner = pick(&owners, n);
                    if let Ok(entire) = protocol.get_entire_debt_and_coll(&owner) {
                        // cover the borrowing fee the owner never received
                        let needed = entire.debt.saturating_sub(DEBT::from(200.0));
                        let balance = protocol.debt_token.balance_of(&owner);
                        if needed > balance {
                            protocol.debt_token.mint(&owner, needed - balance).unwrap();
                        }
                    }
                    let _ = protocol.close_trove(owner);
                }
                Step::Liquidate(n) => {
                    let _ = protocol.liquidate(liquidator, pick(&owners, n));
                }
                Step::BatchLiquidate => {
                    let _ = protocol.batch_liquidate_troves(liquidator, 5);
                }
                Step::Redeem(n, amount) => {
                    let args = RedeemCollateralArgs {
                        amount: DEBT::from(amount as f64 * 10.0),
                        max_fee_percentage: DECIMAL_PRECISION,
                        ..RedeemCollateralArgs::default()
                    };
                    let _ = protocol.redeem_collateral(pick(&owners, n), &args, now);
                }
                Step::Claim(n) => {
                    let _ = protocol.claim_collateral(pick(&owners, n));
                }
                Step::MovePrice(n) => {
                    protocol.price_feed.set_price(price(100.0 + n as f64 / 2.0));
                }
            }
            assert_collateral_conserved(&protocol, deposited);
        }
        true
    }
}
