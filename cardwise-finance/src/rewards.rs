//! Reward optimizer: which card earns the most on a given purchase.

use cardwise_core::{PaymentInstrument, Wallet};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RewardError {
    #[error("no payment instruments to choose from")]
    NoInstruments,
}

/// One instrument's yield on a purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation<'a> {
    pub instrument: &'a PaymentInstrument,
    pub rate: f64,
    pub estimated_reward: f64,
}

fn score<'a>(instrument: &'a PaymentInstrument, category: &str, amount: f64) -> Recommendation<'a> {
    let rate = instrument.rate_for(category);
    Recommendation {
        instrument,
        rate,
        estimated_reward: amount * rate,
    }
}

/// Strictly greater wins, so ties keep the earlier instrument.
fn better<'a>(best: Recommendation<'a>, candidate: Recommendation<'a>) -> Recommendation<'a> {
    if candidate.estimated_reward > best.estimated_reward {
        candidate
    } else {
        best
    }
}

/// Pick the instrument with the highest reward for `amount` spent in `category`.
pub fn best_instrument<'a>(
    category: &str,
    amount: f64,
    instruments: &'a [PaymentInstrument],
) -> Result<Recommendation<'a>, RewardError> {
    let (first, rest) = instruments.split_first().ok_or(RewardError::NoInstruments)?;
    Ok(rest
        .iter()
        .map(|i| score(i, category, amount))
        .fold(score(first, category, amount), better))
}

/// [`best_instrument`] over a wallet, which is never empty.
pub fn recommend<'a>(category: &str, amount: f64, wallet: &'a Wallet) -> Recommendation<'a> {
    let best = wallet
        .iter()
        .skip(1)
        .map(|i| score(i, category, amount))
        .fold(score(wallet.primary(), category, amount), better);
    tracing::debug!(
        category,
        amount,
        card = %best.instrument.name,
        rate = best.rate,
        "recommended card"
    );
    best
}

/// Every instrument's rate and reward, in wallet order.
pub fn compare<'a>(category: &str, amount: f64, wallet: &'a Wallet) -> Vec<Recommendation<'a>> {
    wallet.iter().map(|i| score(i, category, amount)).collect()
}
