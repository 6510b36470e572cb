//! # verdict-lens
//!
//! Image verdicts from Google Gemini `generateContent`.
//!
//! ## Overview
//!
//! A chosen image is validated, sent inline with an instruction to the
//! generative API, and the model's JSON answer is decoded into a typed
//! [`AnalysisResult`]. A [`ViewController`] keeps exactly one of five panels
//! (upload, preview, loading, result, error) visible and changes state only
//! through dispatched [`Action`]s.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use verdict_lens::{Action, ClassifierConfig, GeminiClassifier, SelectedFile, Session, ViewController};
//!
//! #[tokio::main]
//! async fn main() -> verdict_lens::Result<()> {
//!     let config = ClassifierConfig::load(None)?;
//!     let controller = ViewController::new(config.validate());
//!     let classifier = Arc::new(GeminiClassifier::new(config)?);
//!     let mut session = Session::new(controller, classifier);
//!
//!     let file = SelectedFile::from_path("photo.jpg").await?;
//!     session.handle(Action::Select(file)).await;
//!     session.handle(Action::Analyze).await;
//!     println!("{}", verdict_lens::view::render_panel(session.controller()));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Configuration loading and the startup check |
//! | [`image`] | File selection and validation |
//! | [`client`] | Classification client |
//! | [`wire`] | Gemini request/response types |
//! | [`decode`] | Strict answer decoding |
//! | [`controller`] | Five-panel state machine |
//! | [`session`] | Runs controller commands |
//! | [`view`] | Terminal rendering |

pub mod client;
pub mod config;
pub mod controller;
pub mod decode;
pub mod error;
pub mod image;
pub mod prompt;
pub mod result;
pub mod session;
pub mod view;
pub mod wire;

pub use client::{Classifier, GeminiClassifier};
pub use config::ClassifierConfig;
pub use controller::{Action, Command, Panel, UiState, ViewController};
pub use error::{Error, ErrorContext, ValidationError};
pub use image::{ImagePayload, SelectedFile};
pub use result::{AnalysisResult, Category, Confidence};
pub use session::Session;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
