//! Payment instruments (credit cards) and the wallet that holds them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// A card with per-category reward multipliers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentInstrument {
    pub id: Uuid,
    pub name: String,
    /// Category name → reward rate. Overrides `base_rate` for that category only.
    #[serde(default)]
    pub multipliers: BTreeMap<String, f64>,
    pub base_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PaymentInstrument {
    pub fn new(name: impl Into<String>, base_rate: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            multipliers: BTreeMap::new(),
            base_rate,
            note: None,
        }
    }

    pub fn with_multiplier(mut self, category: impl Into<String>, rate: f64) -> Self {
        self.multipliers.insert(category.into(), rate);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Effective reward rate for a category: its multiplier when one is
    /// configured (names compared case-insensitively), else the base rate.
    pub fn rate_for(&self, category: &str) -> f64 {
        if let Some(rate) = self.multipliers.get(category) {
            return *rate;
        }
        let wanted = category.to_lowercase();
        self.multipliers
            .iter()
            .find(|(name, _)| name.to_lowercase() == wanted)
            .map(|(_, rate)| *rate)
            .unwrap_or(self.base_rate)
    }

    /// Check that every configured rate is a finite amount above zero.
    pub fn validate(&self) -> CoreResult<()> {
        std::iter::once(self.base_rate)
            .chain(self.multipliers.values().copied())
            .try_for_each(|rate| {
                if rate.is_finite() && rate > 0.0 {
                    Ok(())
                } else {
                    Err(CoreError::InvalidRate(rate))
                }
            })
    }

    /// Move a multiplier from one category name to another (after a category rename).
    pub fn retarget(&mut self, old: &str, new: &str) -> bool {
        let old = old.to_lowercase();
        let key = self
            .multipliers
            .keys()
            .find(|k| k.to_lowercase() == old)
            .cloned();
        match key {
            Some(key) => {
                if let Some(rate) = self.multipliers.remove(&key) {
                    self.multipliers.insert(new.to_string(), rate);
                }
                true
            }
            None => false,
        }
    }
}

/// Ordered list of instruments that is never empty.
///
/// The first instrument is the system default; it only changes when it is
/// removed or reordered while others remain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Vec<PaymentInstrument>", into = "Vec<PaymentInstrument>")]
pub struct Wallet {
    primary: PaymentInstrument,
    rest: Vec<PaymentInstrument>,
}

impl Wallet {
    pub fn new(primary: PaymentInstrument) -> Self {
        Self {
            primary,
            rest: Vec::new(),
        }
    }

    pub fn from_instruments(instruments: Vec<PaymentInstrument>) -> CoreResult<Self> {
        instruments.iter().try_for_each(PaymentInstrument::validate)?;
        let mut iter = instruments.into_iter();
        let primary = iter.next().ok_or(CoreError::EmptyWallet)?;
        Ok(Self {
            primary,
            rest: iter.collect(),
        })
    }

    pub fn primary(&self) -> &PaymentInstrument {
        &self.primary
    }

    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaymentInstrument> {
        std::iter::once(&self.primary).chain(self.rest.iter())
    }

    pub fn get(&self, id: Uuid) -> Option<&PaymentInstrument> {
        self.iter().find(|i| i.id == id)
    }

    pub fn find(&self, name: &str) -> Option<&PaymentInstrument> {
        let wanted = name.trim().to_lowercase();
        self.iter().find(|i| i.name.to_lowercase() == wanted)
    }

    pub fn push(&mut self, instrument: PaymentInstrument) -> CoreResult<()> {
        instrument.validate()?;
        self.rest.push(instrument);
        Ok(())
    }

    /// Remove an instrument. The last remaining instrument cannot be removed.
    pub fn remove(&mut self, id: Uuid) -> CoreResult<PaymentInstrument> {
        if self.primary.id == id {
            if self.rest.is_empty() {
                return Err(CoreError::EmptyWallet);
            }
            let next = self.rest.remove(0);
            return Ok(std::mem::replace(&mut self.primary, next));
        }
        let idx = self
            .rest
            .iter()
            .position(|i| i.id == id)
            .ok_or(CoreError::InstrumentNotFound(id))?;
        Ok(self.rest.remove(idx))
    }

    /// Move the instrument at `from` to index `to` (clamped).
    pub fn move_instrument(&mut self, from: usize, to: usize) {
        let mut all: Vec<PaymentInstrument> = self.clone().into();
        if from >= all.len() {
            return;
        }
        let item = all.remove(from);
        let to = to.min(all.len());
        all.insert(to, item);
        let mut iter = all.into_iter();
        if let Some(primary) = iter.next() {
            self.primary = primary;
            self.rest = iter.collect();
        }
    }

    /// Apply a category rename to every instrument's multipliers.
    pub fn retarget_category(&mut self, old: &str, new: &str) {
        self.primary.retarget(old, new);
        for instrument in &mut self.rest {
            instrument.retarget(old, new);
        }
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            primary: PaymentInstrument::new("Savor Max", 1.0)
                .with_multiplier("Dining", 4.0)
                .with_multiplier("Entertainment", 3.0)
                .with_multiplier("Groceries", 2.0),
            rest: vec![
                PaymentInstrument::new("Freedom Flexy", 1.0)
                    .with_multiplier("Gas", 3.0)
                    .with_multiplier("Transit", 3.0)
                    .with_multiplier("Online Shopping", 3.0)
                    .with_note("Rotating 5x categories quarterly."),
                PaymentInstrument::new("Everyday Grocer", 1.0)
                    .with_multiplier("Groceries", 3.0)
                    .with_multiplier("Health", 2.0),
                PaymentInstrument::new("Travel Pro", 1.0)
                    .with_multiplier("Travel", 3.0)
                    .with_multiplier("Dining", 2.0)
                    .with_multiplier("Transit", 2.0),
                PaymentInstrument::new("Flat 2%", 2.0),
            ],
        }
    }
}

impl TryFrom<Vec<PaymentInstrument>> for Wallet {
    type Error = CoreError;

    fn try_from(instruments: Vec<PaymentInstrument>) -> CoreResult<Self> {
        Self::from_instruments(instruments)
    }
}

impl From<Wallet> for Vec<PaymentInstrument> {
    fn from(wallet: Wallet) -> Self {
        let mut all = Vec::with_capacity(wallet.len());
        all.push(wallet.primary);
        all.extend(wallet.rest);
        all
    }
}
