// MIDI Perturbation Index - rhythm irregularity analysis
// Extracts note-level timing from MIDI files and flags abrupt duration changes

// Module declarations
pub mod analysis;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod midi;
pub mod report;

// Re-exports for convenience
pub use analysis::{analyze_stream, PerturbationAnalysis};
pub use config::AnalysisOptions;
pub use midi::{decode_file, MessageStream};

/// Initialize env-filtered logging for library consumers and tests.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_module_structure() {
        // Verify all modules are accessible
        // This ensures the crate compiles with proper module hierarchy
    }
}
