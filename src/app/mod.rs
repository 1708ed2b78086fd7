pub mod keyboard_input;

mod controller;
mod runtime;
mod shutdown;
mod startup;
mod stats;
mod types;


pub use controller::HandpadController;
pub use stats::RunStats;
pub use types::ShutdownReason;
