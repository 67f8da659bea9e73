//! Compaction strategy option builders.
//!
//! Each strategy accumulates its `compaction` sub-map, starting from the
//! mandatory `class` entry. The strategies share [`CompactionStrategy`] so
//! CREATE TABLE can accept any of them.

use super::properties::PropertyValue;

/// A strategy that can be handed to `CreateTable::with_compaction`.
pub trait CompactionStrategy {
    /// The entries of the `compaction` option map, `class` first.
    fn into_properties(self) -> Vec<(String, PropertyValue)>;
}

fn seeded(class: &str) -> Vec<(String, PropertyValue)> {
    vec![("class".to_string(), PropertyValue::from(class))]
}

fn push(
    mut properties: Vec<(String, PropertyValue)>,
    name: &str,
    value: impl Into<PropertyValue>,
) -> Vec<(String, PropertyValue)> {
    properties.push((name.to_string(), value.into()));
    properties
}

/// `SizeTieredCompactionStrategy` options.
#[derive(Debug, Clone)]
pub struct SizeTieredCompaction {
    properties: Vec<(String, PropertyValue)>,
}

impl SizeTieredCompaction {
    pub fn new() -> Self {
        Self {
            properties: seeded("SizeTieredCompactionStrategy"),
        }
    }

    pub fn with_max_threshold(mut self, max_threshold: i32) -> Self {
        self.properties = push(self.properties, "max_threshold", max_threshold);
        self
    }

    pub fn with_min_threshold(mut self, min_threshold: i32) -> Self {
        self.properties = push(self.properties, "min_threshold", min_threshold);
        self
    }

    pub fn with_min_sstable_size_in_bytes(mut self, bytes: i64) -> Self {
        self.properties = push(self.properties, "min_sstable_size", bytes);
        self
    }

    pub fn with_only_purge_repaired_tombstones(mut self, enabled: bool) -> Self {
        self.properties = push(self.properties, "only_purge_repaired_tombstones", enabled);
        self
    }

    pub fn with_bucket_high(mut self, bucket_high: f64) -> Self {
        self.properties = push(self.properties, "bucket_high", bucket_high);
        self
    }

    pub fn with_bucket_low(mut self, bucket_low: f64) -> Self {
        self.properties = push(self.properties, "bucket_low", bucket_low);
        self
    }
}

impl Default for SizeTieredCompaction {
    fn default() -> Self {
        Self::new()
    }
}

impl CompactionStrategy for SizeTieredCompaction {
    fn into_properties(self) -> Vec<(String, PropertyValue)> {
        self.properties
    }
}

/// `LeveledCompactionStrategy` options.
#[derive(Debug, Clone)]
pub struct LeveledCompaction {
    properties: Vec<(String, PropertyValue)>,
}

impl LeveledCompaction {
    pub fn new() -> Self {
        Self {
            properties: seeded("LeveledCompactionStrategy"),
        }
    }

    pub fn with_sstable_size_in_mb(mut self, size: i32) -> Self {
        self.properties = push(self.properties, "sstable_size_in_mb", size);
        self
    }

    pub fn with_tombstone_compaction_interval_in_seconds(mut self, seconds: i32) -> Self {
        self.properties = push(self.properties, "tombstone_compaction_interval", seconds);
        self
    }

    pub fn with_tombstone_threshold(mut self, threshold: f64) -> Self {
        self.properties = push(self.properties, "tombstone_threshold", threshold);
        self
    }
}

impl Default for LeveledCompaction {
    fn default() -> Self {
        Self::new()
    }
}

impl CompactionStrategy for LeveledCompaction {
    fn into_properties(self) -> Vec<(String, PropertyValue)> {
        self.properties
    }
}

/// `TimeWindowCompactionStrategy` options.
#[derive(Debug, Clone)]
pub struct TimeWindowCompaction {
    properties: Vec<(String, PropertyValue)>,
}

impl TimeWindowCompaction {
    pub fn new() -> Self {
        Self {
            properties: seeded("TimeWindowCompactionStrategy"),
        }
    }

    pub fn with_compaction_window(mut self, unit: &str, size: i32) -> Self {
        self.properties = push(self.properties, "compaction_window_unit", unit);
        self.properties = push(self.properties, "compaction_window_size", size);
        self
    }

    pub fn with_timestamp_resolution(mut self, resolution: &str) -> Self {
        self.properties = push(self.properties, "timestamp_resolution", resolution);
        self
    }

    pub fn with_unsafe_aggressive_sstable_expiration(mut self, enabled: bool) -> Self {
        self.properties = push(
            self.properties,
            "unsafe_aggressive_sstable_expiration",
            enabled,
        );
        self
    }
}

impl Default for TimeWindowCompaction {
    fn default() -> Self {
        Self::new()
    }
}

impl CompactionStrategy for TimeWindowCompaction {
    fn into_properties(self) -> Vec<(String, PropertyValue)> {
        self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_class_first() {
        let properties = SizeTieredCompaction::new()
            .with_max_threshold(10)
            .into_properties();
        assert_eq!(properties[0].0, "class");
        assert_eq!(
            properties[0].1,
            PropertyValue::from("SizeTieredCompactionStrategy")
        );
        assert_eq!(properties[1], ("max_threshold".to_string(), PropertyValue::Int(10)));
    }

    #[test]
    fn time_window_sets_unit_and_size_together() {
        let properties = TimeWindowCompaction::new()
            .with_compaction_window("DAYS", 7)
            .into_properties();
        assert_eq!(properties.len(), 3);
        assert_eq!(properties[1].0, "compaction_window_unit");
        assert_eq!(properties[2].1, PropertyValue::Int(7));
    }
}
