use std::collections::VecDeque;

/// One frozen observation of per-market trade volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolumeSnapshot {
    pub long_volume: u128,
    pub short_volume: u128,
}

/// FIFO-bounded, recency-weighted history of flushed volume snapshots.
///
/// Owned exclusively by one `MarketBalance`. Appending beyond `capacity`
/// evicts the oldest snapshot; reads never evict.
#[derive(Debug, Clone)]
pub struct VolumeWindow {
    snapshots: VecDeque<VolumeSnapshot>,
    capacity: usize,
    decay_coefficients: Vec<u64>,
}

impl VolumeWindow {
    pub fn new(capacity: usize, decay_coefficients: Vec<u64>) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity.saturating_add(1)),
            capacity,
            decay_coefficients,
        }
    }

    pub fn add_snapshot(&mut self, long_volume: u128, short_volume: u128) {
        self.snapshots.push_back(VolumeSnapshot {
            long_volume,
            short_volume,
        });
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
    }

    /// Recency-weighted volume totals over the held snapshots.
    ///
    /// Coefficient 0 pairs with the most recently added snapshot; snapshots
    /// older than the coefficient table carry unit weight. Pure read.
    pub fn weighted(&self) -> (u128, u128) {
        let mut long_total: u128 = 0;
        let mut short_total: u128 = 0;

        for (i, snapshot) in self.snapshots.iter().rev().enumerate() {
            let coeff = self.decay_coefficients.get(i).copied().unwrap_or(1) as u128;
            long_total = long_total.saturating_add(snapshot.long_volume.saturating_mul(coeff));
            short_total = short_total.saturating_add(snapshot.short_volume.saturating_mul(coeff));
        }

        (long_total, short_total)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_weighs_zero() {
        let window = VolumeWindow::new(4, vec![100, 50]);
        assert!(window.is_empty());
        assert_eq!(window.weighted(), (0, 0));
    }

    #[test]
    fn weighted_decays_by_recency() {
        let coefficients = vec![100, 90, 80, 70, 60, 50, 40, 30, 20, 10];
        let mut window = VolumeWindow::new(11, coefficients);

        for _ in 0..11 {
            window.add_snapshot(2, 1);
        }

        assert_eq!(window.len(), 11);
        // Ten weighted snapshots (sum of coefficients 550) plus the
        // eleventh at unit weight.
        assert_eq!(window.weighted(), (1102, 551));
    }

    #[test]
    fn overflowing_capacity_evicts_the_oldest() {
        let mut window = VolumeWindow::new(2, vec![1, 1]);

        window.add_snapshot(10, 1);
        window.add_snapshot(20, 2);
        window.add_snapshot(30, 3);

        assert_eq!(window.len(), 2);
        // The (10, 1) snapshot is gone.
        assert_eq!(window.weighted(), (50, 5));
    }

    #[test]
    fn weighted_is_a_pure_read() {
        let mut window = VolumeWindow::new(3, vec![2]);
        window.add_snapshot(5, 7);

        assert_eq!(window.weighted(), (10, 14));
        assert_eq!(window.weighted(), (10, 14));
        assert_eq!(window.len(), 1);
    }
}
