pub mod batch;
pub mod cluster;
pub mod config;
pub mod error;
pub mod index;
pub mod matcher;
pub mod signature;

pub use batch::{resolve_batch, BatchOutcome, BatchStats};
pub use cluster::cluster;
pub use config::AppConfig;
pub use error::LabelError;
pub use index::{MatchIndex, Resolution};
