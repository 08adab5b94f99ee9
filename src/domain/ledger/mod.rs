use std::collections::VecDeque;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::transaction::LedgerEntry;

pub const DEFAULT_CAPACITY: usize = 100;

/// What happens to a new entry once the ledger holds `capacity` entries.
///
/// In both cases the balance change that produced the entry is still applied.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// Discard the oldest entry to make room.
    #[default]
    EvictOldest,
    /// Keep the existing entries and discard the new one.
    DropNewest,
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(default)]
pub struct LedgerLimits {
    pub capacity: usize,
    pub policy: CapacityPolicy,
}

impl Default for LedgerLimits {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            policy: CapacityPolicy::default(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Admission {
    Appended,
    Evicted(LedgerEntry),
    Dropped(LedgerEntry),
}

/// Chronological transaction log bounded by [`LedgerLimits`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Ledger {
    entries: VecDeque<LedgerEntry>,
    limits: LedgerLimits,
}

impl Ledger {
    pub fn new(limits: LedgerLimits) -> Self {
        let limits = LedgerLimits {
            capacity: limits.capacity.max(1),
            ..limits
        };

        Self {
            entries: VecDeque::with_capacity(limits.capacity),
            limits,
        }
    }

    pub fn limits(&self) -> LedgerLimits {
        self.limits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.limits.capacity
    }

    pub fn push(&mut self, entry: LedgerEntry) -> Admission {
        if !self.is_full() {
            self.entries.push_back(entry);
            return Admission::Appended;
        }

        match self.limits.policy {
            CapacityPolicy::EvictOldest => {
                let evicted = self.entries.pop_front();
                self.entries.push_back(entry);
                evicted.map_or(Admission::Appended, Admission::Evicted)
            }
            CapacityPolicy::DropNewest => Admission::Dropped(entry),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<LedgerEntry> {
        self.entries
            .iter()
            .skip(self.entries.len().saturating_sub(n))
            .cloned()
            .collect()
    }

    pub fn to_vec(&self) -> Vec<LedgerEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Signed sum of every retained entry.
    pub fn net_effect(&self) -> Decimal {
        self.entries.iter().map(LedgerEntry::effect).sum()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(LedgerLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::transaction::TransactionKind;

    fn deposit(amount: Decimal) -> LedgerEntry {
        LedgerEntry::new(TransactionKind::Deposit, amount, "16-10-2026 10:00:00 AM")
    }

    fn bounded(capacity: usize, policy: CapacityPolicy) -> Ledger {
        Ledger::new(LedgerLimits { capacity, policy })
    }

    #[test]
    fn evict_oldest_keeps_newest_entries() {
        let mut ledger = bounded(2, CapacityPolicy::EvictOldest);

        assert_eq!(ledger.push(deposit(dec!(1))), Admission::Appended);
        assert_eq!(ledger.push(deposit(dec!(2))), Admission::Appended);
        assert_eq!(
            ledger.push(deposit(dec!(3))),
            Admission::Evicted(deposit(dec!(1)))
        );

        assert_eq!(ledger.to_vec(), vec![deposit(dec!(2)), deposit(dec!(3))]);
    }

    #[test]
    fn drop_newest_keeps_oldest_entries() {
        let mut ledger = bounded(2, CapacityPolicy::DropNewest);
        ledger.push(deposit(dec!(1)));
        ledger.push(deposit(dec!(2)));

        assert_eq!(
            ledger.push(deposit(dec!(3))),
            Admission::Dropped(deposit(dec!(3)))
        );
        assert_eq!(ledger.to_vec(), vec![deposit(dec!(1)), deposit(dec!(2))]);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let ledger = bounded(0, CapacityPolicy::DropNewest);

        assert_eq!(ledger.limits().capacity, 1);
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let mut ledger = Ledger::default();
        for amount in [dec!(1), dec!(2), dec!(3), dec!(4)] {
            ledger.push(deposit(amount));
        }

        assert_eq!(ledger.recent(2), vec![deposit(dec!(3)), deposit(dec!(4))]);
        assert_eq!(ledger.recent(10).len(), 4);
        assert!(ledger.recent(0).is_empty());
    }

    #[test]
    fn net_effect_signs_withdrawals() {
        let mut ledger = Ledger::default();
        ledger.push(deposit(dec!(500)));
        ledger.push(LedgerEntry::new(
            TransactionKind::Withdraw,
            dec!(200),
            "16-10-2026 10:00:01 AM",
        ));

        assert_eq!(ledger.net_effect(), dec!(300));
    }
}
