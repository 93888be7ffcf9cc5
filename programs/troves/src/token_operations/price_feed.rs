use super::PriceFeed;
use crate::TroveError;

/// Feed that answers whatever price was last set.
#[derive(Clone, Copy, Debug)]
pub struct FixedPriceFeed {
    pub price: u128,
}

impl FixedPriceFeed {
    pub fn new(price: u128) -> Self {
        FixedPriceFeed { price }
    }

    pub fn set_price(&mut self, price: u128) {
        self.price = price;
    }
}

impl PriceFeed for FixedPriceFeed {
    fn fetch_price(&mut self) -> Result<u128, TroveError> {
        Ok(self.price)
    }
}
