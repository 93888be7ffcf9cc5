use anchor_lang::prelude::*;
use decimal_wad::error::DecimalError;

#[macro_use]
pub mod utils;

mod handler_adjust_trove;
mod handler_batch_liquidate;
mod handler_claim_collateral;
mod handler_close_trove;
mod handler_initialize_market;
mod handler_liquidate;
mod handler_open_trove;
mod handler_redeem_collateral;
mod handler_update_global_config;
pub mod protocol;
pub mod state;
pub mod token_operations;
pub mod trove_manager;

#[cfg(test)]
mod tests_protocol;

pub use protocol::ProtocolAccounts;
pub use state::*;

declare_id!("5QTRJ1Vq5GvwMFSTzKQ9AqvmAgb4PRk3tDoUSyfqWkPH");

#[error]
#[derive(PartialEq, Eq)]
pub enum TroveError {
    #[msg("Math operation overflow")]
    MathOverflow,

    #[msg("Cannot redistribute over zero total stakes")]
    ZeroTotalStakes,

    #[msg("Rewards can only be applied to an active trove")]
    RewardsOnInactiveTrove,

    #[msg("Sorted list links are inconsistent")]
    CorruptedSortedList,

    #[msg("Trove record missing for a listed owner")]
    MissingTroveRecord,

    #[msg("Pool balance lower than the amount requested")]
    InsufficientPoolBalance,

    #[msg("Trove is already active")]
    TroveIsActive,

    #[msg("Trove does not exist or is closed")]
    TroveNotActive,

    #[msg("Sorted list is full")]
    ListFull,

    #[msg("Sorted list already contains the id")]
    DuplicateId,

    #[msg("Id cannot be zero")]
    ZeroId,

    #[msg("NICR must be positive")]
    ZeroNicr,

    #[msg("Sorted list does not contain the id")]
    NodeNotFound,

    #[msg("There must be either a collateral change or a debt change")]
    ZeroAdjustment,

    #[msg("Cannot withdraw and add collateral at the same time")]
    SimultaneousCollChange,

    #[msg("Debt increase requires a non-zero debt change")]
    ZeroDebtChange,

    #[msg("Max fee percentage out of range")]
    InvalidMaxFeePercentage,

    #[msg("Only one trove in the system")]
    OnlyOneTroveInSystem,

    #[msg("Collateral withdrawal exceeds the trove collateral")]
    CollWithdrawalExceedsColl,

    #[msg("Repayment exceeds the trove net debt")]
    RepaymentExceedsDebt,

    #[msg("Borrowing is currently disabled")]
    BorrowingNotAllowed,

    #[msg("Amount must be greater than zero")]
    ZeroAmountInvalid,

    #[msg("No collateral available to claim")]
    NoCollateralToClaim,

    #[msg("Global config key not recognized")]
    GlobalConfigKeyError,

    #[msg("Global config value not valid")]
    GlobalConfigValueError,

    #[msg("Redemptions are not allowed during the bootstrap period")]
    CannotRedeemDuringBootstrapPeriod,

    #[msg("Price is not valid")]
    PriceNotValid,

    #[msg("Market has already been initialized")]
    MarketAlreadyInitialized,

    #[msg("ICR is below the minimum collateral ratio")]
    IcrBelowMcr,

    #[msg("ICR is below the critical collateral ratio")]
    IcrBelowCcr,

    #[msg("TCR would fall below the critical collateral ratio")]
    TcrBelowCcr,

    #[msg("TCR is below the minimum collateral ratio")]
    TcrBelowMcr,

    #[msg("Fee exceeded provided maximum")]
    ExcessiveFee,

    #[msg("Net debt must be greater than the minimum")]
    NetDebtBelowMinimum,

    #[msg("Debt token balance insufficient")]
    InsufficientDebtBalance,

    #[msg("Nothing to liquidate")]
    NothingToLiquidate,

    #[msg("Unable to redeem any amount")]
    UnableToRedeem,

    #[msg("Fee would eat up all returned collateral")]
    RedemptionFeeTooLarge,

    #[msg("Total system debt would exceed the debt ceiling")]
    DebtCeilingExceeded,

    #[msg("Collateral withdrawal not permitted in recovery mode")]
    CollWithdrawalInRecoveryMode,

    #[msg("Cannot decrease ICR in recovery mode")]
    IcrDecreaseInRecoveryMode,

    #[msg("Operation not permitted during recovery mode")]
    OperationNotPermittedInRecoveryMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvariantViolation,
    PreconditionFailed,
    EconomicConstraintViolated,
    NotPermittedInMode,
}

impl TroveError {
    pub fn kind(&self) -> ErrorKind {
        use TroveError::*;
        match self {
            MathOverflow
            | ZeroTotalStakes
            | RewardsOnInactiveTrove
            | CorruptedSortedList
            | MissingTroveRecord
            | InsufficientPoolBalance => ErrorKind::InvariantViolation,

            TroveIsActive
            | TroveNotActive
            | ListFull
            | DuplicateId
            | ZeroId
            | ZeroNicr
            | NodeNotFound
            | ZeroAdjustment
            | SimultaneousCollChange
            | ZeroDebtChange
            | InvalidMaxFeePercentage
            | OnlyOneTroveInSystem
            | CollWithdrawalExceedsColl
            | RepaymentExceedsDebt
            | BorrowingNotAllowed
            | ZeroAmountInvalid
            | NoCollateralToClaim
            | GlobalConfigKeyError
            | GlobalConfigValueError
            | CannotRedeemDuringBootstrapPeriod
            | PriceNotValid
            | MarketAlreadyInitialized => ErrorKind::PreconditionFailed,

            IcrBelowMcr
            | IcrBelowCcr
            | TcrBelowCcr
            | TcrBelowMcr
            | ExcessiveFee
            | NetDebtBelowMinimum
            | InsufficientDebtBalance
            | NothingToLiquidate
            | UnableToRedeem
            | RedemptionFeeTooLarge
            | DebtCeilingExceeded => ErrorKind::EconomicConstraintViolated,

            CollWithdrawalInRecoveryMode
            | IcrDecreaseInRecoveryMode
            | OperationNotPermittedInRecoveryMode => ErrorKind::NotPermittedInMode,
        }
    }
}

impl From<DecimalError> for TroveError {
    fn from(err: DecimalError) -> TroveError {
        match err {
            DecimalError::MathOverflow => TroveError::MathOverflow,
        }
    }
}
