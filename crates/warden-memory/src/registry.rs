use crate::ThisError;
use std::{cell::RefCell, collections::BTreeMap};

///
/// MemoryRange
/// Inclusive block of memory ids owned by one crate.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MemoryRange {
    pub start: u8,
    pub end: u8,
}

impl MemoryRange {
    #[must_use]
    pub const fn contains(&self, id: u8) -> bool {
        id >= self.start && id <= self.end
    }

    const fn overlaps(self, other: Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

///
/// MemoryRegistryEntry
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MemoryRegistryEntry {
    pub crate_name: String,
    pub label: String,
}

///
/// MemoryRegistryError
///

#[derive(Debug, ThisError)]
pub enum MemoryRegistryError {
    #[error("memory range {start}-{end} of '{crate_name}' overlaps the range owned by '{owner}'")]
    Overlap {
        crate_name: String,
        start: u8,
        end: u8,
        owner: String,
    },

    #[error("memory id {0} is already registered")]
    DuplicateId(u8),

    #[error("memory id {id} ({label}) is outside every range reserved by '{crate_name}'")]
    OutOfRange {
        id: u8,
        crate_name: String,
        label: String,
    },
}

thread_local! {
    static RESERVED_RANGES: RefCell<Vec<(String, MemoryRange)>> = const { RefCell::new(Vec::new()) };
    static REGISTRY: RefCell<BTreeMap<u8, MemoryRegistryEntry>> = const { RefCell::new(BTreeMap::new()) };

    // reservations and `ic_memory!` registrations queued before init
    static PENDING_RANGES: RefCell<Vec<(String, u8, u8)>> = const { RefCell::new(Vec::new()) };
    static PENDING_REGISTRATIONS: RefCell<Vec<(u8, String, String)>> = const { RefCell::new(Vec::new()) };
}

///
/// MemoryRegistry
///

pub struct MemoryRegistry;

impl MemoryRegistry {
    /// Reserve an id range for a crate. Re-reserving the exact same range is a no-op.
    pub fn reserve_range(crate_name: &str, start: u8, end: u8) -> Result<(), MemoryRegistryError> {
        let range = MemoryRange { start, end };

        let already_reserved = RESERVED_RANGES.with_borrow(|ranges| {
            for (owner, existing) in ranges {
                if existing.overlaps(range) {
                    if owner == crate_name && *existing == range {
                        return Ok(true);
                    }

                    return Err(MemoryRegistryError::Overlap {
                        crate_name: crate_name.to_string(),
                        start,
                        end,
                        owner: owner.clone(),
                    });
                }
            }

            Ok(false)
        })?;

        if !already_reserved {
            RESERVED_RANGES.with_borrow_mut(|ranges| ranges.push((crate_name.to_string(), range)));
        }

        Ok(())
    }

    /// Register a memory id. The id must sit inside a range the crate reserved.
    pub fn register(id: u8, crate_name: &str, label: &str) -> Result<(), MemoryRegistryError> {
        let in_range = RESERVED_RANGES.with_borrow(|ranges| {
            ranges
                .iter()
                .any(|(owner, range)| owner == crate_name && range.contains(id))
        });
        if !in_range {
            return Err(MemoryRegistryError::OutOfRange {
                id,
                crate_name: crate_name.to_string(),
                label: label.to_string(),
            });
        }

        REGISTRY.with_borrow_mut(|reg| {
            if reg.contains_key(&id) {
                return Err(MemoryRegistryError::DuplicateId(id));
            }

            reg.insert(
                id,
                MemoryRegistryEntry {
                    crate_name: crate_name.to_string(),
                    label: label.to_string(),
                },
            );

            Ok(())
        })
    }

    #[must_use]
    pub fn export() -> Vec<(u8, MemoryRegistryEntry)> {
        REGISTRY.with_borrow(|reg| reg.iter().map(|(k, v)| (*k, v.clone())).collect())
    }

    #[must_use]
    pub fn export_ranges() -> Vec<(String, MemoryRange)> {
        RESERVED_RANGES.with_borrow(Clone::clone)
    }

    #[must_use]
    pub fn get(id: u8) -> Option<MemoryRegistryEntry> {
        REGISTRY.with_borrow(|reg| reg.get(&id).cloned())
    }
}

//
// deferred registration
//

pub fn defer_reserve_range(crate_name: &str, start: u8, end: u8) {
    PENDING_RANGES.with_borrow_mut(|ranges| ranges.push((crate_name.to_string(), start, end)));
}

pub fn defer_register(id: u8, crate_name: &str, label: &str) {
    PENDING_REGISTRATIONS.with_borrow_mut(|regs| {
        regs.push((id, crate_name.to_string(), label.to_string()));
    });
}

#[must_use]
pub fn drain_pending_ranges() -> Vec<(String, u8, u8)> {
    PENDING_RANGES.with_borrow_mut(std::mem::take)
}

#[must_use]
pub fn drain_pending_registrations() -> Vec<(u8, String, String)> {
    PENDING_REGISTRATIONS.with_borrow_mut(std::mem::take)
}

#[cfg(test)]
pub fn reset_for_tests() {
    RESERVED_RANGES.with_borrow_mut(Vec::clear);
    REGISTRY.with_borrow_mut(BTreeMap::clear);
    PENDING_RANGES.with_borrow_mut(Vec::clear);
    PENDING_REGISTRATIONS.with_borrow_mut(Vec::clear);
}

///
/// TESTS
///
