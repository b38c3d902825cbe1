/// Data layer: row types, loading, normalization, filtering and aggregation.
///
/// Architecture:
/// ```text
///  day.csv / .json / .parquet      hour.csv / .json / .parquet
///        │                               │
///        ▼                               ▼
///   ┌──────────┐                    ┌──────────┐
///   │  loader   │  parse file       │  loader   │
///   └──────────┘                    └──────────┘
///        │ RawDailyRecord                │ HourlyRecord
///        ▼                               │
///   ┌───────────┐                        │
///   │ normalize  │  dates + labels       │
///   └───────────┘                        │
///        │                               │
///        ▼                               ▼
///   ┌────────────────────────────────────────┐
///   │ Dataset   (immutable, shared via Arc)   │
///   └────────────────────────────────────────┘
///        │
///        ▼
///   ┌──────────┐     ┌───────────┐     ┌────────┐
///   │  filter   │ ──▶ │ aggregate  │ ──▶ │ charts  │
///   └──────────┘     └───────────┘     └────────┘
/// ```

pub mod aggregate;
pub mod charts;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
