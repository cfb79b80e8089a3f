//! Unit of work configuration.

/// Configuration for a unit of work.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deepest value nesting a snapshot will copy.
    ///
    /// Snapshots copy property values in full; this bounds how much a
    /// single registration can copy.
    pub max_snapshot_depth: usize,

    /// Whether edit commands log their change sets at debug level.
    pub log_changes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_snapshot_depth: 32,
            log_changes: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deepest value nesting a snapshot will copy.
    #[must_use]
    pub const fn max_snapshot_depth(mut self, depth: usize) -> Self {
        self.max_snapshot_depth = depth;
        self
    }

    /// Sets whether edit commands log their change sets.
    #[must_use]
    pub const fn log_changes(mut self, value: bool) -> Self {
        self.log_changes = value;
        self
    }
}
