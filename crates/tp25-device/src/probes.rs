//! Probe state store.

use tp25_protocol::{Probe, ProbeIndex, PROBE_COUNT, REPORTED_PROBE_COUNT};

/// State of the six addressable probes.
///
/// Probes are addressed 1..=6 on the wire through [`ProbeIndex`]; storage is
/// zero-based and never exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeStore {
    probes: [Probe; PROBE_COUNT],
}

impl Default for ProbeStore {
    fn default() -> Self {
        ProbeStore {
            probes: [Probe::default(); PROBE_COUNT],
        }
    }
}

impl ProbeStore {
    /// Store with default probes, overriding the temperatures of the first
    /// `temperatures.len()` probes. Extra entries are ignored.
    pub fn with_temperatures(temperatures: &[u16]) -> Self {
        let mut store = Self::default();
        for (probe, &temperature) in store.probes.iter_mut().zip(temperatures) {
            probe.temperature = temperature;
        }
        store
    }

    /// State of one probe.
    pub fn get(&self, index: ProbeIndex) -> &Probe {
        &self.probes[index.slot()]
    }

    /// Mutable state of one probe.
    pub fn get_mut(&mut self, index: ProbeIndex) -> &mut Probe {
        &mut self.probes[index.slot()]
    }

    /// The probes carried by a temperature report (probes 1..=4).
    ///
    /// The stock firmware reports its reserved slot 0 followed by probes
    /// 1..=3; this store has no reserved slot, so probe 4 is reported instead.
    pub fn reported(&self) -> [Probe; REPORTED_PROBE_COUNT] {
        let mut reported = [Probe::default(); REPORTED_PROBE_COUNT];
        reported.copy_from_slice(&self.probes[..REPORTED_PROBE_COUNT]);
        reported
    }

    /// All probes with their wire index.
    pub fn iter(&self) -> impl Iterator<Item = (ProbeIndex, &Probe)> {
        ProbeIndex::all().zip(self.probes.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(index: u8) -> ProbeIndex {
        ProbeIndex::new(index).unwrap()
    }

    #[test]
    fn test_with_temperatures() {
        let store = ProbeStore::with_temperatures(&[100, 101]);
        assert_eq!(store.get(idx(1)).temperature, 100);
        assert_eq!(store.get(idx(2)).temperature, 101);
        assert_eq!(store.get(idx(3)).temperature, 200);
        assert_eq!(store.get(idx(6)), &Probe::default());
    }

    #[test]
    fn test_get_mut_addresses_one_probe() {
        let mut store = ProbeStore::default();
        store.get_mut(idx(6)).alarm_index = 3;
        assert_eq!(store.get(idx(6)).alarm_index, 3);
        assert!(store.iter().filter(|(_, p)| p.alarm_index == 3).count() == 1);
    }

    #[test]
    fn test_reported_is_first_four() {
        let store = ProbeStore::with_temperatures(&[1, 2, 3, 4, 5, 6]);
        let temps: Vec<u16> = store.reported().iter().map(|p| p.temperature).collect();
        assert_eq!(temps, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_reported_includes_probe_four_not_five() {
        let mut store = ProbeStore::default();
        store.get_mut(idx(4)).temperature = 999;
        store.get_mut(idx(5)).temperature = 555;
        let reported = store.reported();
        assert_eq!(reported[3].temperature, 999);
        assert!(reported.iter().all(|p| p.temperature != 555));
    }

    #[test]
    fn test_iter_indices() {
        let store = ProbeStore::default();
        let indices: Vec<u8> = store.iter().map(|(i, _)| i.get()).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
    }
}
