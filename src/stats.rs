use crate::config::{SwordConfig, MAX_ENERGY, MAX_HEALTH};
use anyhow::{anyhow, Result};

/// Integer gauge clamped to `0..=max`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Meter {
    value: i32,
    max: i32,
}

impl Meter {
    pub fn full(max: i32) -> Self {
        Meter { value: max, max }
    }

    pub fn health() -> Self {
        Meter::full(MAX_HEALTH)
    }

    pub fn energy() -> Self {
        Meter::full(MAX_ENERGY)
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn is_full(&self) -> bool {
        self.value >= self.max
    }

    pub fn is_empty(&self) -> bool {
        self.value <= 0
    }

    /// returns true when the value moved
    pub fn add(&mut self, amount: i32) -> bool {
        let before = self.value;
        self.value = (self.value + amount).clamp(0, self.max);
        self.value != before
    }

    pub fn sub(&mut self, amount: i32) -> bool {
        self.add(-amount)
    }

    /// all or nothing : never goes below zero to pay
    pub fn try_spend(&mut self, cost: i32) -> bool {
        if self.value < cost {
            return false;
        }
        self.value -= cost;
        true
    }
}

/// The fixed, ordered sword list plus the equipped index
#[derive(Debug, Clone)]
pub struct Armory {
    swords: Vec<SwordConfig>,
    index: usize,
}

impl Armory {
    pub fn new(swords: Vec<SwordConfig>) -> Result<Self> {
        if swords.is_empty() {
            return Err(anyhow!("Armory needs at least one sword"));
        }
        Ok(Armory { swords, index: 0 })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.swords.len()
    }

    pub fn current(&self) -> &SwordConfig {
        &self.swords[self.index]
    }

    /// steps through the list, wrapping both ways
    pub fn cycle(&mut self, step: i32) -> usize {
        let count = self.swords.len() as i64;
        self.index = (self.index as i64 + step as i64).rem_euclid(count) as usize;
        self.index
    }
}
