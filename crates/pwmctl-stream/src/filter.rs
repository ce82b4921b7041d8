use pwmctl_frame::{Reading, ReadingKind};

use crate::error::{Result, StreamError};

/// A set of [`ReadingKind`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadingFilterSet(u8);

impl ReadingFilterSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every known kind.
    pub fn all() -> Self {
        ReadingKind::ALL.into_iter().collect()
    }

    fn bit(kind: ReadingKind) -> u8 {
        match kind {
            ReadingKind::Acc => 1 << 0,
            ReadingKind::Gyro => 1 << 1,
            ReadingKind::Mag => 1 << 2,
        }
    }

    pub fn contains(&self, kind: ReadingKind) -> bool {
        self.0 & Self::bit(kind) != 0
    }

    /// Returns false if `kind` was already present.
    pub fn insert(&mut self, kind: ReadingKind) -> bool {
        let present = self.contains(kind);
        self.0 |= Self::bit(kind);
        !present
    }

    /// Returns false if `kind` was not present.
    pub fn remove(&mut self, kind: ReadingKind) -> bool {
        let present = self.contains(kind);
        self.0 &= !Self::bit(kind);
        present
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in [`ReadingKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = ReadingKind> + '_ {
        ReadingKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl FromIterator<ReadingKind> for ReadingFilterSet {
    fn from_iter<I: IntoIterator<Item = ReadingKind>>(iter: I) -> Self {
        let mut set = Self::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

/// Decides which readings reach the consumer. All kinds start enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingFilter {
    enabled: ReadingFilterSet,
}

impl Default for ReadingFilter {
    fn default() -> Self {
        Self {
            enabled: ReadingFilterSet::all(),
        }
    }
}

impl ReadingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable every kind in `kinds`. Enabling an enabled kind is a no-op.
    pub fn enable(&mut self, kinds: impl IntoIterator<Item = ReadingKind>) {
        for kind in kinds {
            self.enabled.insert(kind);
        }
    }

    /// Disable every kind in `kinds`.
    ///
    /// Fails with [`StreamError::NotEnabled`] on the first kind that is not
    /// enabled at that point (so naming a kind twice fails too). On failure
    /// the filter is left unchanged.
    pub fn disable(&mut self, kinds: impl IntoIterator<Item = ReadingKind>) -> Result<()> {
        let mut next = self.enabled;
        for kind in kinds {
            if !next.remove(kind) {
                return Err(StreamError::NotEnabled(kind));
            }
        }
        self.enabled = next;
        Ok(())
    }

    /// Whether `reading` passes the filter.
    pub fn apply(&self, reading: &Reading) -> bool {
        self.enabled.contains(reading.kind)
    }

    pub fn is_enabled(&self, kind: ReadingKind) -> bool {
        self.enabled.contains(kind)
    }

    /// The currently enabled kinds.
    pub fn enabled(&self) -> ReadingFilterSet {
        self.enabled
    }
}
