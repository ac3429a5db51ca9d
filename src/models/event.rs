//! Transaction events delivered by the feed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::trade::TradeDirection;

/// Raw transaction as the feed publishes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedTransaction {
    pub from: String,
    pub token_mint: String,
    pub amount: Decimal,
    pub is_buy: bool,
    pub hash: String,
    pub price: Decimal,
}

/// A signal wallet's trade, as evaluated by the copy engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEvent {
    pub source_address: String,
    pub token_mint: String,
    pub amount: Decimal,
    pub direction: TradeDirection,
    pub price: Decimal,
    pub tx_reference: String,
}

impl From<FeedTransaction> for TransactionEvent {
    fn from(tx: FeedTransaction) -> Self {
        Self {
            source_address: tx.from,
            token_mint: tx.token_mint,
            amount: tx.amount,
            direction: TradeDirection::from_is_buy(tx.is_buy),
            price: tx.price,
            tx_reference: tx.hash,
        }
    }
}
