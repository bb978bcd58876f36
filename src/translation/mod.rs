/*!
 * Translation job processing.
 *
 * - `orchestrator`: runs a batch of files through the backend and reports progress
 */

// Re-export main types for easier usage
pub use self::orchestrator::{JobOrchestrator, OrchestratorOptions};

// Submodules
pub mod orchestrator;
