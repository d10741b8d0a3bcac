pub mod csv;
pub mod terminal;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Interactive terminal viewer
    #[default]
    Terminal,
    /// Write the sampled dataset as CSV and exit
    Csv,
}
