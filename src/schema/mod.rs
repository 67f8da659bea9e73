//! DDL statement builders: CREATE TABLE and CREATE KEYSPACE, plus the
//! `WITH ...` option serializer and compaction strategy helpers they share.

pub mod compaction;
pub mod create_keyspace;
pub mod create_table;
pub mod properties;

pub use compaction::{
    CompactionStrategy, LeveledCompaction, SizeTieredCompaction, TimeWindowCompaction,
};
pub use create_keyspace::CreateKeyspace;
pub use create_table::{CreateTable, KeyCaching, RowsPerPartition};
pub use properties::PropertyValue;
