//! RocksDB column family definitions.
//!
//! | Name | Key | Value |
//! |------|-----|-------|
//! | markov | `SymbolContext` bytes (`Order` bytes, backoff positions zeroed) | LZ4 block of `2 × Width` or `8 × Width` bytes |

use rocksdb::{BlockBasedOptions, Cache, ColumnFamilyDescriptor, Options};

/// The single collection holding context vectors.
pub const CF_MARKOV: &str = "markov";

/// All column family names.
pub const ALL: &[&str] = &[CF_MARKOV];

/// Options for the markov column family.
///
/// Values are already LZ4 blocks, so RocksDB compression is off. Reads are
/// point lookups, so a bloom filter sits in front of every SST.
pub fn markov_cf_options(cache: &Cache) -> Options {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    block_opts.set_bloom_filter(10.0, false);
    block_opts.set_cache_index_and_filter_blocks(true);

    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_opts);
    opts.set_compression_type(rocksdb::DBCompressionType::None);
    opts.create_if_missing(true);
    opts
}

/// Descriptors for every column family, sharing one block cache.
pub fn get_column_family_descriptors(cache: &Cache) -> Vec<ColumnFamilyDescriptor> {
    vec![ColumnFamilyDescriptor::new(
        CF_MARKOV,
        markov_cf_options(cache),
    )]
}
