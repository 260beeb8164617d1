//! Radio state mirror

/// Last radio frequencies the panel is known to agree with
///
/// Used only for change detection: a heartbeat goes out as soon as the
/// simulator's radios drift from what the panel last saw. Values the panel
/// itself set are recorded here too, so they are not echoed straight back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RadioMirror {
    active: Option<i32>,
    standby: Option<i32>,
}

impl RadioMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known active frequency
    pub fn active(&self) -> Option<i32> {
        self.active
    }

    /// Last known standby frequency
    pub fn standby(&self) -> Option<i32> {
        self.standby
    }

    /// Whether either frequency differs from the mirror
    pub fn differs(&self, active: i32, standby: i32) -> bool {
        self.active != Some(active) || self.standby != Some(standby)
    }

    /// Record both frequencies
    pub fn record(&mut self, active: i32, standby: i32) {
        self.active = Some(active);
        self.standby = Some(standby);
    }

    /// Record the standby frequency only
    pub fn record_standby(&mut self, standby: i32) {
        self.standby = Some(standby);
    }

    /// Forget everything, forcing the next check to report a change
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::RadioMirror;

    #[test]
    fn test_unknown_mirror_differs() {
        let mirror = RadioMirror::new();
        assert!(mirror.differs(0, 0));
    }

    #[test]
    fn test_record_and_compare() {
        let mut mirror = RadioMirror::new();
        mirror.record(118_000, 122_800);
        assert!(!mirror.differs(118_000, 122_800));
        assert!(mirror.differs(118_000, 122_805));
        assert!(mirror.differs(118_005, 122_800));

        mirror.record_standby(122_805);
        assert!(!mirror.differs(118_000, 122_805));

        mirror.reset();
        assert_eq!(mirror.active(), None);
        assert_eq!(mirror.standby(), None);
    }
}
