use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Millisecond time source for id allocation.
pub trait Clock: Send {
    fn now_millis(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Client,
    Project,
    Provider,
    TeamMember,
    Form,
}

impl EntityKind {
    pub fn prefix(self) -> &'static str {
        match self {
            EntityKind::Client => "cli",
            EntityKind::Project => "pro",
            EntityKind::Provider => "prov",
            EntityKind::TeamMember => "team",
            EntityKind::Form => "form",
        }
    }

    /// Label shown in notifications.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Client => "Cliente",
            EntityKind::Project => "Proyecto",
            EntityKind::Provider => "Proveedor",
            EntityKind::TeamMember => "Miembro",
            EntityKind::Form => "Formulario",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hands out `{prefix}-{millis}` identifiers.
///
/// Ticks are strictly increasing for the lifetime of the allocator: when the
/// clock has not advanced past the last issued tick, the next tick is
/// `last + 1`. Two allocations in the same millisecond therefore never
/// collide, whatever their kind.
pub struct IdAllocator {
    clock: Box<dyn Clock>,
    last_tick: u64,
}

impl IdAllocator {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            last_tick: 0,
        }
    }

    pub fn system() -> Self {
        Self::new(SystemClock)
    }

    fn next_tick(&mut self) -> u64 {
        let now = self.clock.now_millis();
        let tick = if now > self.last_tick {
            now
        } else {
            self.last_tick + 1
        };
        self.last_tick = tick;
        tick
    }

    pub fn allocate(&mut self, kind: EntityKind) -> String {
        let tick = self.next_tick();
        format!("{}-{tick}", kind.prefix())
    }

    /// Reserves one tick for `count` ids, told apart by a row index suffix.
    pub fn allocate_batch(&mut self, kind: EntityKind, count: usize) -> Vec<String> {
        if count == 0 {
            return Vec::new();
        }
        let tick = self.next_tick();
        (0..count)
            .map(|index| format!("{}-{tick}-{index}", kind.prefix()))
            .collect()
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for IdAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdAllocator")
            .field("last_tick", &self.last_tick)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn prefixes_follow_kind() {
        let mut ids = IdAllocator::new(FixedClock(1_700_000_000_000));
        assert_eq!(ids.allocate(EntityKind::Client), "cli-1700000000000");
        assert_eq!(ids.allocate(EntityKind::Provider), "prov-1700000000001");
    }

    #[test]
    fn same_tick_allocations_stay_distinct() {
        let mut ids = IdAllocator::new(FixedClock(42));
        let issued: HashSet<String> = (0..100).map(|_| ids.allocate(EntityKind::Project)).collect();
        assert_eq!(issued.len(), 100);
    }

    #[test]
    fn batch_shares_tick_and_indexes_rows() {
        let mut ids = IdAllocator::new(FixedClock(7));
        let batch = ids.allocate_batch(EntityKind::Form, 3);
        assert_eq!(batch, vec!["form-7-0", "form-7-1", "form-7-2"]);

        let next = ids.allocate_batch(EntityKind::Form, 1);
        assert_eq!(next, vec!["form-8-0"]);
    }

    #[test]
    fn empty_batch_does_not_consume_a_tick() {
        let mut ids = IdAllocator::new(FixedClock(10));
        assert!(ids.allocate_batch(EntityKind::Form, 0).is_empty());
        assert_eq!(ids.allocate(EntityKind::Form), "form-10");
    }
}
