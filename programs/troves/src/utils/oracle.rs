use anchor_lang::prelude::msg;

use crate::{token_operations::PriceFeed, TroveError};

/// Reads the feed once for the current instruction.
pub fn get_price<O: PriceFeed>(price_feed: &mut O) -> Result<u128, TroveError> {
    let price = price_feed.fetch_price()?;
    if price == 0 {
        msg!("Price feed returned a zero price");
        return Err(TroveError::PriceNotValid);
    }
    Ok(price)
}
