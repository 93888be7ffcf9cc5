use anchor_lang::prelude::Pubkey;
use decimal_wad::decimal::Decimal;

use crate::{
    handler_adjust_trove, handler_batch_liquidate, handler_batch_liquidate::BatchSelection,
    handler_claim_collateral, handler_close_trove, handler_initialize_market, handler_liquidate,
    handler_open_trove, handler_redeem_collateral, handler_update_global_config,
    token_operations::{CollateralPool, DebtToken, PriceFeed, SurplusPool},
    trove_manager::{
        borrowing_rate, hint_helpers,
        liquidation_calcs::{self, SystemMode},
        redistribution::{self, EntireDebtAndColl},
        types::{
            AdjustTroveEffects, AdjustTroveParams, ApproxHint, BatchLiquidationEffects,
            CloseTroveEffects, LiquidationEffects, OpenTroveArgs, OpenTroveEffects,
            RedeemCollateralArgs, RedemptionEffects, RedemptionHints,
        },
    },
    utils::oracle::get_price,
    GlobalConfig, Ledger, TroveError, TroveStatus,
};

pub struct ProtocolAccounts<P, S, T, O> {
    pub ledger: Ledger,
    pub active_pool: P,
    pub default_pool: P,
    pub surplus_pool: S,
    pub debt_token: T,
    pub price_feed: O,
    // holds the debt token gas compensation of every open trove
    pub gas_pool: Pubkey,
    pub fee_recipient: Pubkey,
}

impl<P, S, T, O> ProtocolAccounts<P, S, T, O>
where
    P: CollateralPool + Clone,
    S: SurplusPool + Clone,
    T: DebtToken + Clone,
    O: PriceFeed,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: GlobalConfig,
        active_pool: P,
        default_pool: P,
        surplus_pool: S,
        debt_token: T,
        price_feed: O,
        gas_pool: Pubkey,
        fee_recipient: Pubkey,
    ) -> Self {
        ProtocolAccounts {
            ledger: Ledger::new(config),
            active_pool,
            default_pool,
            surplus_pool,
            debt_token,
            price_feed,
            gas_pool,
            fee_recipient,
        }
    }

    fn atomically<R, F>(&mut self, f: F) -> Result<R, TroveError>
    where
        F: FnOnce(&mut Self) -> Result<R, TroveError>,
    {
        let checkpoint = (
            self.ledger.clone(),
            self.active_pool.clone(),
            self.default_pool.clone(),
            self.surplus_pool.clone(),
            self.debt_token.clone(),
        );
        let res = f(self);
        if res.is_err() {
            let (ledger, active_pool, default_pool, surplus_pool, debt_token) = checkpoint;
            self.ledger = ledger;
            self.active_pool = active_pool;
            self.default_pool = default_pool;
            self.surplus_pool = surplus_pool;
            self.debt_token = debt_token;
        }
        res
    }

    pub fn initialize_market(&mut self, now: u64) -> Result<(), TroveError> {
        self.atomically(|accounts| handler_initialize_market::process(accounts, now))
    }

    pub fn update_global_config(&mut self, key: u16, value: u64) -> Result<(), TroveError> {
        self.atomically(|accounts| handler_update_global_config::process(accounts, key, value))
    }

    pub fn open_trove(
        &mut self,
        owner: Pubkey,
        args: &OpenTroveArgs,
        now: u64,
    ) -> Result<OpenTroveEffects, TroveError> {
        self.atomically(|accounts| handler_open_trove::process(accounts, owner, args, now))
    }

    pub fn adjust_trove(
        &mut self,
        owner: Pubkey,
        params: &AdjustTroveParams,
        now: u64,
    ) -> Result<AdjustTroveEffects, TroveError> {
        self.atomically(|accounts| handler_adjust_trove::process(accounts, owner, params, now))
    }

    pub fn close_trove(&mut self, owner: Pubkey) -> Result<CloseTroveEffects, TroveError> {
        self.atomically(|accounts| handler_close_trove::process(accounts, owner))
    }

    pub fn liquidate(
        &mut self,
        liquidator: Pubkey,
        owner: Pubkey,
    ) -> Result<LiquidationEffects, TroveError> {
        self.atomically(|accounts| handler_liquidate::process(accounts, liquidator, owner))
    }

    pub fn batch_liquidate_troves(
        &mut self,
        liquidator: Pubkey,
        max_iterations: u64,
    ) -> Result<BatchLiquidationEffects, TroveError> {
        self.atomically(|accounts| {
            handler_batch_liquidate::process(
                accounts,
                liquidator,
                BatchSelection::FromTail { max_iterations },
            )
        })
    }

    pub fn liquidate_troves_by_id(
        &mut self,
        liquidator: Pubkey,
        owners: &[Pubkey],
    ) -> Result<BatchLiquidationEffects, TroveError> {
        self.atomically(|accounts| {
            handler_batch_liquidate::process(accounts, liquidator, BatchSelection::ByOwner(owners))
        })
    }

    pub fn redeem_collateral(
        &mut self,
        redeemer: Pubkey,
        args: &RedeemCollateralArgs,
        now: u64,
    ) -> Result<RedemptionEffects, TroveError> {
        self.atomically(|accounts| {
            handler_redeem_collateral::process(accounts, redeemer, args, now)
        })
    }

    pub fn claim_collateral(&mut self, owner: Pubkey) -> Result<u128, TroveError> {
        self.atomically(|accounts| handler_claim_collateral::process(accounts, owner))
    }

    pub fn fetch_price(&mut self) -> Result<u128, TroveError> {
        get_price(&mut self.price_feed)
    }

    pub fn get_trove_status(&self, owner: &Pubkey) -> TroveStatus {
        self.ledger.troves.status_of(owner)
    }

    pub fn get_entire_debt_and_coll(
        &self,
        owner: &Pubkey,
    ) -> Result<EntireDebtAndColl, TroveError> {
        let trove = self.ledger.troves.active(owner)?;
        redistribution::get_entire_debt_and_coll(&self.ledger.market, trove)
    }

    pub fn get_nominal_icr(&self, owner: &Pubkey) -> Result<u128, TroveError> {
        let trove = self.ledger.troves.active(owner)?;
        redistribution::get_nominal_icr(&self.ledger.market, trove)
    }

    pub fn get_current_icr(&self, owner: &Pubkey, price: u128) -> Result<u128, TroveError> {
        let trove = self.ledger.troves.active(owner)?;
        redistribution::get_current_icr(&self.ledger.market, trove, price)
    }

    pub fn get_entire_system_coll(&self) -> Result<u128, TroveError> {
        Ok(self.ledger.market.system_balances()?.coll)
    }

    pub fn get_entire_system_debt(&self) -> Result<u128, TroveError> {
        Ok(self.ledger.market.system_balances()?.debt)
    }

    pub fn get_tcr(&self, price: u128) -> Result<Decimal, TroveError> {
        Ok(liquidation_calcs::calc_system_mode(&self.ledger.market, price)?.1)
    }

    pub fn check_recovery_mode(&self, price: u128) -> Result<bool, TroveError> {
        let (mode, _) = liquidation_calcs::calc_system_mode(&self.ledger.market, price)?;
        Ok(mode == SystemMode::Recovery)
    }

    pub fn get_borrowing_rate_with_decay(&self, now: u64) -> Result<u128, TroveError> {
        borrowing_rate::get_borrowing_rate_with_decay(&self.ledger.market, now)
    }

    pub fn get_redemption_rate_with_decay(&self, now: u64) -> Result<u128, TroveError> {
        borrowing_rate::get_redemption_rate_with_decay(&self.ledger.market, now)
    }

    pub fn get_borrowing_fee_with_decay(&self, debt: u128, now: u64) -> Result<u128, TroveError> {
        borrowing_rate::get_borrowing_fee_with_decay(&self.ledger.market, debt, now)
    }

    pub fn get_redemption_fee_with_decay(
        &self,
        coll_drawn: u128,
        now: u64,
    ) -> Result<u128, TroveError> {
        borrowing_rate::get_redemption_fee_with_decay(&self.ledger.market, coll_drawn, now)
    }

    pub fn get_approx_hint<R: rand::Rng>(
        &self,
        nicr: u128,
        num_trials: u64,
        rng: &mut R,
    ) -> Result<ApproxHint, TroveError> {
        hint_helpers::get_approx_hint(&self.ledger, nicr, num_trials, rng)
    }

    pub fn get_redemption_hints(
        &self,
        amount: u128,
        price: u128,
        max_iterations: u64,
    ) -> Result<RedemptionHints, TroveError> {
        hint_helpers::get_redemption_hints(&self.ledger, amount, price, max_iterations)
    }
}
