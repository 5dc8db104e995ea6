//! Data models for configuration and table results.

pub mod config;
pub mod table;

pub use config::{Flavor, HandlerConfig, PageErrorPolicy, ParserConfig, PdftabConfig};
pub use table::{Table, TableList, TitleAssignment};
