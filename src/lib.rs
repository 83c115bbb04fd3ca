#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod pipeline;
pub mod render;
pub mod squircle;
pub mod stats;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, load_config};
pub use error::{LangstatError, Result};
pub use pipeline::{Treemap, TreemapOutput, render_language_stats, render_language_stats_json};
