//! Generates runnable AI-assistant programs from a one-sentence description.
//!
//! `Interpreter` turns the description into `GenerationParams`, the
//! composer assembles language-specific sections from the template
//! registry, and the emitter joins them into the final source text.
//! `Generator` ties these together behind request validation.

pub mod artifact;
pub mod composer;
pub mod config;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod interpreter;
pub mod logger;
pub mod params;
pub mod registry;
pub mod template;

pub use error::{GenerationError, GenerationResult};
pub use generator::{GenerationOutcome, GenerationRequest, GenerationStatus, Generator};
pub use interpreter::Interpreter;
pub use params::{Api, Feature, FeatureSet, GenerationParams, Language};
