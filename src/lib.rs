mod check;
pub use check::*;
mod logger;
pub use logger::*;
mod metrics;
pub use metrics::*;
mod prober;
pub use prober::*;
mod runner;
pub use runner::*;
mod secrets;
pub use secrets::*;
