use super::{GlobalConfig, MarketState, SortedTroves, Troves};

/// Everything the core mutates for one instruction. Handlers snapshot it
/// before running an operation and put the snapshot back on failure.
#[derive(Clone, Debug)]
pub struct Ledger {
    pub market: MarketState,
    pub troves: Troves,
    pub sorted_troves: SortedTroves,
    pub config: GlobalConfig,
}

impl Ledger {
    pub fn new(config: GlobalConfig) -> Ledger {
        Ledger {
            market: MarketState::default(),
            troves: Troves::default(),
            sorted_troves: SortedTroves::new(config.max_troves),
            config,
        }
    }
}
