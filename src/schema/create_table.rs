//! CREATE TABLE statement builder.
//!
//! Columns keep their declaration order; each one carries its role, so the
//! partition key, clustering columns and static columns are derived views of
//! a single list rather than parallel maps that could drift apart.
//!
//! ```
//! use cql_builder::cql_type::CqlType;
//! use cql_builder::schema::CreateTable;
//!
//! let cql = CreateTable::table("bar")
//!     .with_partition_key("k", CqlType::Int)
//!     .with_column("v", CqlType::Text)
//!     .build();
//! assert_eq!(cql, "CREATE TABLE bar (k int PRIMARY KEY,v text)");
//! ```

use super::compaction::CompactionStrategy;
use super::properties::{append_table_properties, PropertyValue};
use crate::cql_type::CqlType;
use crate::identifier::Identifier;
use crate::select::ClusteringOrder;
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "bindings")]
use ts_rs::TS;

/// The role a column plays in the table's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
#[serde(rename_all = "snake_case")]
enum ColumnKind {
    Partition,
    Clustering,
    Static,
    Regular,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
struct Column {
    name: Identifier,
    data_type: CqlType,
    kind: ColumnKind,
}

/// Key cache population for the `caching` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCaching {
    All,
    None,
}

impl KeyCaching {
    fn value(self) -> &'static str {
        match self {
            KeyCaching::All => "ALL",
            KeyCaching::None => "NONE",
        }
    }
}

/// Row cache population for the `caching` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowsPerPartition {
    All,
    None,
    Rows(u32),
}

impl RowsPerPartition {
    fn value(self) -> PropertyValue {
        match self {
            RowsPerPartition::All => PropertyValue::from("ALL"),
            RowsPerPartition::None => PropertyValue::from("NONE"),
            RowsPerPartition::Rows(count) => PropertyValue::Int(count.into()),
        }
    }
}

/// An immutable CREATE TABLE statement under construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
#[cfg_attr(feature = "bindings", ts(export))]
pub struct CreateTable {
    keyspace: Option<Identifier>,
    table: Identifier,
    if_not_exists: bool,
    compact_storage: bool,
    columns: Vec<Column>,
    clustering_orderings: Vec<(Identifier, ClusteringOrder)>,
    properties: Vec<(String, PropertyValue)>,
}

impl CreateTable {
    /// Start a CREATE TABLE in the session's current keyspace.
    pub fn table(table: impl Into<Identifier>) -> Self {
        Self::keyspace_table(None::<Identifier>, table)
    }

    /// Start a CREATE TABLE on a keyspace-qualified name.
    pub fn keyspace_table(
        keyspace: Option<impl Into<Identifier>>,
        table: impl Into<Identifier>,
    ) -> Self {
        CreateTable {
            keyspace: keyspace.map(Into::into),
            table: table.into(),
            if_not_exists: false,
            compact_storage: false,
            columns: Vec::new(),
            clustering_orderings: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Add `IF NOT EXISTS`.
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    fn with_column_kind(
        mut self,
        name: impl Into<Identifier>,
        data_type: CqlType,
        kind: ColumnKind,
    ) -> Self {
        self.columns.push(Column {
            name: name.into(),
            data_type,
            kind,
        });
        self
    }

    /// Declare a partition key column. Call order defines the key order.
    pub fn with_partition_key(self, name: impl Into<Identifier>, data_type: CqlType) -> Self {
        self.with_column_kind(name, data_type, ColumnKind::Partition)
    }

    /// Declare a clustering column. Call order defines the clustering order.
    pub fn with_clustering_column(self, name: impl Into<Identifier>, data_type: CqlType) -> Self {
        self.with_column_kind(name, data_type, ColumnKind::Clustering)
    }

    /// Declare a regular column.
    pub fn with_column(self, name: impl Into<Identifier>, data_type: CqlType) -> Self {
        self.with_column_kind(name, data_type, ColumnKind::Regular)
    }

    /// Declare a static column.
    pub fn with_static_column(self, name: impl Into<Identifier>, data_type: CqlType) -> Self {
        self.with_column_kind(name, data_type, ColumnKind::Static)
    }

    /// Add `WITH COMPACT STORAGE`. Idempotent.
    pub fn with_compact_storage(mut self) -> Self {
        self.compact_storage = true;
        self
    }

    /// Declare the on-disk sort direction of a clustering column.
    ///
    /// Directions render in call order; redeclaring a column removes its old
    /// entry and appends the new one at the end.
    pub fn with_clustering_order(
        mut self,
        column: impl Into<Identifier>,
        order: ClusteringOrder,
    ) -> Self {
        let column = column.into();
        self.clustering_orderings
            .retain(|(existing, _)| *existing != column);
        self.clustering_orderings.push((column, order));
        self
    }

    /// Add an arbitrary table option.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    // -- well-known option shortcuts ----------------------------------------

    pub fn with_bloom_filter_fp_chance(self, chance: f64) -> Self {
        self.with_property("bloom_filter_fp_chance", chance)
    }

    pub fn with_cdc(self, enabled: bool) -> Self {
        self.with_property("cdc", enabled)
    }

    pub fn with_comment(self, comment: impl Into<String>) -> Self {
        self.with_property("comment", comment.into())
    }

    pub fn with_dc_local_read_repair_chance(self, chance: f64) -> Self {
        self.with_property("dclocal_read_repair_chance", chance)
    }

    pub fn with_default_time_to_live_seconds(self, ttl: i32) -> Self {
        self.with_property("default_time_to_live", ttl)
    }

    pub fn with_gc_grace_seconds(self, seconds: i32) -> Self {
        self.with_property("gc_grace_seconds", seconds)
    }

    pub fn with_memtable_flush_period_in_ms(self, period: i32) -> Self {
        self.with_property("memtable_flush_period_in_ms", period)
    }

    pub fn with_min_index_interval(self, min: i32) -> Self {
        self.with_property("min_index_interval", min)
    }

    pub fn with_max_index_interval(self, max: i32) -> Self {
        self.with_property("max_index_interval", max)
    }

    pub fn with_read_repair_chance(self, chance: f64) -> Self {
        self.with_property("read_repair_chance", chance)
    }

    pub fn with_speculative_retry(self, retry: impl Into<String>) -> Self {
        self.with_property("speculative_retry", retry.into())
    }

    /// Set the `compaction` option from a strategy builder.
    pub fn with_compaction(self, strategy: impl CompactionStrategy) -> Self {
        self.with_property("compaction", PropertyValue::Map(strategy.into_properties()))
    }

    /// Set the `caching` option.
    pub fn with_caching(self, keys: KeyCaching, rows_per_partition: RowsPerPartition) -> Self {
        self.with_property(
            "caching",
            PropertyValue::Map(vec![
                ("keys".to_string(), PropertyValue::from(keys.value())),
                (
                    "rows_per_partition".to_string(),
                    rows_per_partition.value(),
                ),
            ]),
        )
    }

    /// Set `compression` to the given algorithm with default settings.
    pub fn with_compression(self, algorithm: impl Into<String>) -> Self {
        self.with_property(
            "compression",
            PropertyValue::Map(vec![("class".to_string(), algorithm.into().into())]),
        )
    }

    /// Set `compression` with explicit chunk length and CRC check chance.
    pub fn with_compression_options(
        self,
        algorithm: impl Into<String>,
        chunk_length_kb: i32,
        crc_check_chance: f64,
    ) -> Self {
        self.with_property(
            "compression",
            PropertyValue::Map(vec![
                ("class".to_string(), algorithm.into().into()),
                ("chunk_length_kb".to_string(), chunk_length_kb.into()),
                ("crc_check_chance".to_string(), crc_check_chance.into()),
            ]),
        )
    }

    pub fn with_lz4_compression(self) -> Self {
        self.with_compression("LZ4Compressor")
    }

    pub fn with_snappy_compression(self) -> Self {
        self.with_compression("SnappyCompressor")
    }

    pub fn with_deflate_compression(self) -> Self {
        self.with_compression("DeflateCompressor")
    }

    pub fn with_no_compression(self) -> Self {
        self.with_property(
            "compression",
            PropertyValue::Map(vec![("sstable_compression".to_string(), "".into())]),
        )
    }

    // -- rendering ----------------------------------------------------------

    /// Render the statement.
    pub fn build(&self) -> String {
        let mut out = String::from("CREATE TABLE ");
        if self.if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        if let Some(keyspace) = &self.keyspace {
            out.push_str(&keyspace.as_cql());
            out.push('.');
        }
        out.push_str(&self.table.as_cql());

        let partition_count = self.count(ColumnKind::Partition);
        let clustering_count = self.count(ColumnKind::Clustering);
        // With a lone partition column and no clustering, PRIMARY KEY is
        // inlined on the column definition itself.
        let single_primary_key = partition_count == 1 && clustering_count == 0;

        out.push_str(" (");
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&column.name.as_cql());
            out.push(' ');
            out.push_str(&column.data_type.as_cql());
            if single_primary_key && column.kind == ColumnKind::Partition {
                out.push_str(" PRIMARY KEY");
            } else if column.kind == ColumnKind::Static {
                out.push_str(" STATIC");
            }
        }

        if !single_primary_key {
            out.push_str(",PRIMARY KEY(");
            if partition_count > 1 {
                out.push('(');
            }
            let mut first = true;
            for column in self.kind(ColumnKind::Partition) {
                if !first {
                    out.push(',');
                }
                first = false;
                out.push_str(&column.name.as_cql());
            }
            if partition_count > 1 {
                out.push(')');
            }
            for column in self.kind(ColumnKind::Clustering) {
                out.push(',');
                out.push_str(&column.name.as_cql());
            }
            out.push(')');
        }
        out.push(')');

        let mut first_option = true;
        if self.compact_storage {
            out.push_str(" WITH COMPACT STORAGE");
            first_option = false;
        }
        if !self.clustering_orderings.is_empty() {
            out.push_str(if first_option { " WITH " } else { " AND " });
            first_option = false;
            out.push_str("CLUSTERING ORDER BY (");
            for (i, (column, order)) in self.clustering_orderings.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&column.as_cql());
                out.push(' ');
                out.push_str(order.as_cql());
            }
            out.push(')');
        }
        append_table_properties(&self.properties, first_option, &mut out);

        out
    }

    fn count(&self, kind: ColumnKind) -> usize {
        self.kind(kind).count()
    }

    fn kind(&self, kind: ColumnKind) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(move |c| c.kind == kind)
    }
}

impl fmt::Display for CreateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::compaction::SizeTieredCompaction;

    #[test]
    fn inlines_single_partition_key() {
        let cql = CreateTable::table("bar")
            .with_partition_key("k", CqlType::Int)
            .with_column("v", CqlType::Text)
            .build();
        assert_eq!(cql, "CREATE TABLE bar (k int PRIMARY KEY,v text)");
    }

    #[test]
    fn groups_compound_partition_key() {
        let cql = CreateTable::table("bar")
            .with_partition_key("kc", CqlType::Int)
            .with_partition_key("ka", CqlType::Timestamp)
            .with_column("v", CqlType::Text)
            .build();
        assert_eq!(
            cql,
            "CREATE TABLE bar (kc int,ka timestamp,v text,PRIMARY KEY((kc,ka)))"
        );
    }

    #[test]
    fn single_partition_key_with_clustering_column() {
        let cql = CreateTable::table("bar")
            .with_partition_key("k", CqlType::Int)
            .with_clustering_column("c", CqlType::udt("category", true))
            .with_column("v", CqlType::Text)
            .build();
        assert_eq!(
            cql,
            "CREATE TABLE bar (k int,c frozen<category>,v text,PRIMARY KEY(k,c))"
        );
    }

    #[test]
    fn compound_key_with_clustering_columns() {
        let cql = CreateTable::table("bar")
            .with_partition_key("kc", CqlType::Int)
            .with_partition_key("ka", CqlType::Timestamp)
            .with_clustering_column("c", CqlType::Float)
            .with_clustering_column("a", CqlType::Uuid)
            .with_column("v", CqlType::Text)
            .build();
        assert_eq!(
            cql,
            "CREATE TABLE bar (kc int,ka timestamp,c float,a uuid,v text,\
             PRIMARY KEY((kc,ka),c,a))"
        );
    }

    #[test]
    fn marks_static_columns() {
        let cql = CreateTable::table("bar")
            .with_partition_key("k", CqlType::Int)
            .with_clustering_column("c", CqlType::Int)
            .with_static_column("s", CqlType::Text)
            .build();
        assert_eq!(
            cql,
            "CREATE TABLE bar (k int,c int,s text STATIC,PRIMARY KEY(k,c))"
        );
    }

    #[test]
    fn renders_compact_storage_and_options() {
        let cql = CreateTable::table("bar")
            .with_partition_key("k", CqlType::Int)
            .with_column("v", CqlType::Text)
            .with_compact_storage()
            .build();
        assert_eq!(
            cql,
            "CREATE TABLE bar (k int PRIMARY KEY,v text) WITH COMPACT STORAGE"
        );

        let cql = CreateTable::table("bar")
            .with_partition_key("k", CqlType::Int)
            .with_column("v", CqlType::Text)
            .with_compact_storage()
            .with_default_time_to_live_seconds(86400)
            .build();
        assert_eq!(
            cql,
            "CREATE TABLE bar (k int PRIMARY KEY,v text) \
             WITH COMPACT STORAGE AND default_time_to_live=86400"
        );
    }

    #[test]
    fn renders_option_shortcuts_in_call_order() {
        let cql = CreateTable::table("bar")
            .with_partition_key("k", CqlType::Int)
            .with_column("v", CqlType::Text)
            .with_bloom_filter_fp_chance(0.42)
            .with_cdc(false)
            .with_comment("Hello world")
            .with_gc_grace_seconds(864000)
            .with_speculative_retry("99percentile")
            .build();
        assert_eq!(
            cql,
            "CREATE TABLE bar (k int PRIMARY KEY,v text) \
             WITH bloom_filter_fp_chance=0.42 AND cdc=false AND comment='Hello world' \
             AND gc_grace_seconds=864000 AND speculative_retry='99percentile'"
        );
    }

    #[test]
    fn renders_clustering_order() {
        let cql = CreateTable::table("bar")
            .with_partition_key("k", CqlType::Int)
            .with_clustering_column("c1", CqlType::Int)
            .with_clustering_column("c2", CqlType::Int)
            .with_clustering_order("c1", ClusteringOrder::Asc)
            .with_clustering_order("c2", ClusteringOrder::Desc)
            .build();
        assert_eq!(
            cql,
            "CREATE TABLE bar (k int,c1 int,c2 int,PRIMARY KEY(k,c1,c2)) \
             WITH CLUSTERING ORDER BY (c1 ASC,c2 DESC)"
        );
    }

    #[test]
    fn redeclared_clustering_order_moves_to_the_end() {
        let cql = CreateTable::table("bar")
            .with_partition_key("k", CqlType::Int)
            .with_clustering_column("c1", CqlType::Int)
            .with_clustering_column("c2", CqlType::Int)
            .with_clustering_order("c1", ClusteringOrder::Asc)
            .with_clustering_order("c2", ClusteringOrder::Desc)
            .with_clustering_order("c1", ClusteringOrder::Desc)
            .build();
        assert_eq!(
            cql,
            "CREATE TABLE bar (k int,c1 int,c2 int,PRIMARY KEY(k,c1,c2)) \
             WITH CLUSTERING ORDER BY (c2 DESC,c1 DESC)"
        );
    }

    #[test]
    fn renders_compaction_and_caching() {
        let cql = CreateTable::table("bar")
            .with_partition_key("k", CqlType::Int)
            .with_compaction(SizeTieredCompaction::new().with_max_threshold(10))
            .with_caching(KeyCaching::All, RowsPerPartition::Rows(100))
            .build();
        assert_eq!(
            cql,
            "CREATE TABLE bar (k int PRIMARY KEY) \
             WITH compaction={'class':'SizeTieredCompactionStrategy','max_threshold':10} \
             AND caching={'keys':'ALL','rows_per_partition':100}"
        );
    }

    #[test]
    fn renders_if_not_exists_and_keyspace() {
        let cql = CreateTable::keyspace_table(Some("ks"), "bar")
            .if_not_exists()
            .with_partition_key("k", CqlType::Int)
            .build();
        assert_eq!(cql, "CREATE TABLE IF NOT EXISTS ks.bar (k int PRIMARY KEY)");
    }
}
