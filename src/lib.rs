pub mod cache;
pub mod chart;
pub mod config;
pub mod deck;
pub mod fetch;
pub mod metrics;
pub mod render;
pub mod table;

pub use cache::DataCache;
pub use chart::{ChartKind, ChartOptions, ChartSpec, Series};
pub use config::DeckConfig;
pub use deck::ChartDeck;
pub use table::{parse_csv, CellValue, ParsedTable};
