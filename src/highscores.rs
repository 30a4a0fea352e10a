//! Persisted high score
//!
//! A single integer in storage under a fixed key. Anything missing or
//! non-numeric reads as zero.

use crate::platform::{Storage, StorageError};

/// Best score seen on this device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    value: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "highScore";

    pub fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Parse a stored value from its leading digits (`"120abc"` reads as 120).
    ///
    /// Absent, negative or non-numeric values become zero.
    pub fn parse(raw: Option<&str>) -> Self {
        let value = raw.and_then(leading_integer).unwrap_or(0);
        Self { value }
    }

    /// Load from storage
    pub fn load(storage: &dyn Storage) -> Self {
        let stored = storage.get_item(Self::STORAGE_KEY);
        let high = Self::parse(stored.as_deref());
        log::info!("Loaded high score: {}", high.value);
        high
    }

    /// Raise the high score if `score` beats it. Returns true when it did.
    pub fn submit(&mut self, score: u64) -> bool {
        if score > self.value {
            self.value = score;
            true
        } else {
            false
        }
    }

    /// Write the current value to storage
    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        storage.set_item(Self::STORAGE_KEY, &self.value.to_string())?;
        log::info!("High score saved ({})", self.value);
        Ok(())
    }
}

fn leading_integer(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..end].parse().ok()
}
