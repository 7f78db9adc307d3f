/// Data layer: core types, loading/cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read file → RawTable (text cells)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  names, schema fallbacks, coercion, derived columns, dedup
///   └───────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  CrashTable   │  read-only, shared behind an Arc
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐     ┌──────────┐
///   │  filter   │ ──▶ │ metrics   │  totals, distinct counts, top-N ranking
///   └──────────┘     └──────────┘
/// ```

pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod schema;
