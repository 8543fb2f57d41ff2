//! Command type for the cleaning step

/// The six caller inputs to a cleaning run, as parsed from the CLI.
#[derive(Debug, Clone)]
pub struct CleanCommand {
    /// Store reference to the raw input table (`name`, `name:latest`, `name:vN`)
    pub input_artifact: String,
    /// Inclusive lower price bound
    pub min_price: f64,
    /// Inclusive upper price bound
    pub max_price: f64,
    /// Name for the new artifact version
    pub output_artifact: String,
    /// Classification tag for the new artifact
    pub output_type: String,
    /// Free-text description for the new artifact
    pub output_description: String,
}
