//! Capacity statistics for fixed-size containers

use core::fmt;

/// Capacity statistics for debugging and overload monitoring
///
/// Containers update these inside the same critical section as the
/// mutation they describe, so a snapshot is always self-consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtlStats {
    /// Total number of slots in the container
    pub capacity: usize,
    /// Number of occupied slots
    pub len: usize,
    /// Maximum number of occupied slots ever reached
    pub high_water: usize,
    /// Number of insertions refused because the container was full
    pub rejected: u32,
}

impl RtlStats {
    /// Create new statistics for an empty container
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            len: 0,
            high_water: 0,
            rejected: 0,
        }
    }

    /// Update statistics after an insertion
    pub fn on_insert(&mut self) {
        self.len += 1;
        if self.len > self.high_water {
            self.high_water = self.len;
        }
    }

    /// Update statistics after a removal
    pub fn on_remove(&mut self) {
        if self.len > 0 {
            self.len -= 1;
        }
    }

    /// Update statistics after a refused insertion
    pub fn on_reject(&mut self) {
        self.rejected = self.rejected.saturating_add(1);
    }

    /// Update statistics after the container was emptied
    pub fn on_clear(&mut self) {
        self.len = 0;
    }

    /// Forget the high-water mark and rejection count
    pub fn reset(&mut self) {
        self.high_water = self.len;
        self.rejected = 0;
    }

    /// Number of free slots
    pub const fn free(&self) -> usize {
        self.capacity - self.len
    }

    /// Peak utilization as a percentage (0-100)
    pub fn peak_utilization(&self) -> u8 {
        if self.capacity == 0 {
            0
        } else {
            ((self.high_water * 100) / self.capacity) as u8
        }
    }
}

impl fmt::Display for RtlStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} (peak {}, rejected {})",
            self.len, self.capacity, self.high_water, self.rejected
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RtlStats {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "RtlStats{{ len: {}, capacity: {}, peak: {}, rejected: {} }}",
            self.len,
            self.capacity,
            self.high_water,
            self.rejected
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_tracking() {
        let mut stats = RtlStats::new(4);

        assert_eq!(stats.free(), 4);
        assert_eq!(stats.high_water, 0);

        stats.on_insert();
        stats.on_insert();
        stats.on_insert();
        stats.on_remove();
        assert_eq!(stats.len, 2);
        assert_eq!(stats.high_water, 3);
        assert_eq!(stats.peak_utilization(), 75);

        stats.on_reject();
        stats.on_reject();
        assert_eq!(stats.rejected, 2);

        stats.reset();
        assert_eq!(stats.high_water, 2);
        assert_eq!(stats.rejected, 0);

        stats.on_clear();
        stats.on_remove();
        assert_eq!(stats.len, 0);
        assert_eq!(stats.free(), 4);
    }
}
