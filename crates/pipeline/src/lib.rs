//! # Context Pipeline
//!
//! One run over a project root:
//!
//! ```text
//! PipelineConfig ──validate──► FileScanner ──► SyntaxClassifier (per file)
//!                                                   │
//!                 package.json ──► FrameworkInferer ◄┘
//!                                         │
//!                 git (timeout) ──► ContextAssembler ──► ContextBundle + diagnostics
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use context_pipeline::{ContextPipeline, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::discover("/path/to/project")?;
//!     let output = ContextPipeline::new(config)?.run().await?;
//!
//!     for document in output.bundle.documents() {
//!         println!("{}", document.file_name());
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod pipeline;

pub use config::{PipelineConfig, CONFIG_FILE, MIN_CHARS_PER_DOCUMENT};
pub use error::{ConfigError, PipelineError, Result};
pub use pipeline::{ContextPipeline, PipelineOutput};
