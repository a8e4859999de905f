pub mod catalog;
pub mod clients;
pub mod config;
pub mod diversity;
pub mod editor;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod prompt;
pub mod scenarios;
pub mod selection;
pub mod studio;

pub use clients::{ImageSynthesizer, SynthesisError, create_synthesizer};
pub use error::{PhotoshootError, Result};
pub use orchestrator::{BATCH_SIZE, BatchOrchestrator, ConfirmedSession};
pub use output::OutputDocument;
