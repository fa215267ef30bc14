pub mod config;
pub mod errors;
pub mod generate;
pub mod lister;
pub mod output;
pub mod partition;
pub mod progress;
pub mod results;
pub mod scanner;
pub mod sink;

pub use config::{GenerateConfig, ScanConfig};
pub use errors::{ScanError, ScanResult};
pub use generate::{run_generate, GenerateSummary};
pub use progress::{GenerateEvent, ScanEvent};
pub use results::{Match, ScanOutcome, ScanReport, ScanSummary};
pub use scanner::run_scan;
