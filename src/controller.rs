//! Five-panel view controller.
//!
//! All user input and asynchronous completions arrive as [`Action`]s through
//! [`ViewController::dispatch`]. Network work is never done here: an analyze
//! request is handed back to the caller as a [`Command`], and its outcome comes
//! back as [`Action::Completed`].

use std::fmt;
use tracing::{error, info, warn};

use crate::error::{Error, ErrorContext, ValidationError};
use crate::image::{ImagePayload, SelectedFile};
use crate::result::AnalysisResult;
use crate::Result;

/// The five mutually exclusive panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Upload,
    Preview,
    Loading,
    Result,
    Error,
}

impl Panel {
    pub const ALL: [Panel; 5] = [
        Panel::Upload,
        Panel::Preview,
        Panel::Loading,
        Panel::Result,
        Panel::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Preview => "preview",
            Self::Loading => "loading",
            Self::Result => "result",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiState {
    Idle,
    Previewing,
    Analyzing,
    Showing(AnalysisResult),
    Failed(String),
}

impl UiState {
    pub fn panel(&self) -> Panel {
        match self {
            Self::Idle => Panel::Upload,
            Self::Previewing => Panel::Preview,
            Self::Analyzing => Panel::Loading,
            Self::Showing(_) => Panel::Result,
            Self::Failed(_) => Panel::Error,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Previewing => "previewing",
            Self::Analyzing => "analyzing",
            Self::Showing(_) => "showing",
            Self::Failed(_) => "failed",
        }
    }
}

pub enum Action {
    /// A file was picked or dropped.
    Select(SelectedFile),
    /// Picking the file failed before its bytes were available.
    SelectFailed(ValidationError),
    Clear,
    Analyze,
    Retry,
    /// Outcome of a previously issued [`Command::Classify`].
    Completed(Result<AnalysisResult>),
    /// Failure caught outside the classification path (panic, lost task).
    UnexpectedFailure(String),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(file) => f.debug_tuple("Select").field(file).finish(),
            Self::SelectFailed(e) => f.debug_tuple("SelectFailed").field(e).finish(),
            Self::Clear => f.write_str("Clear"),
            Self::Analyze => f.write_str("Analyze"),
            Self::Retry => f.write_str("Retry"),
            Self::Completed(Ok(r)) => write!(f, "Completed(Ok({}))", r.category),
            Self::Completed(Err(e)) => write!(f, "Completed(Err({}))", e),
            Self::UnexpectedFailure(m) => f.debug_tuple("UnexpectedFailure").field(m).finish(),
        }
    }
}

/// Work the caller must perform on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Classify(ImagePayload),
}

pub struct ViewController {
    state: UiState,
    payload: Option<ImagePayload>,
    locked: bool,
}

impl ViewController {
    /// Build from the startup configuration check. A failed check leaves the
    /// controller locked on the error panel.
    pub fn new(config_check: Result<()>) -> Self {
        match config_check {
            Ok(()) => {
                info!("view controller ready");
                Self {
                    state: UiState::Idle,
                    payload: None,
                    locked: false,
                }
            }
            Err(e) => {
                error!(error = %e, "configuration check failed");
                Self {
                    state: UiState::Failed(e.user_message()),
                    payload: None,
                    locked: true,
                }
            }
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn visible_panel(&self) -> Panel {
        self.state.panel()
    }

    /// Visibility of every panel; exactly one entry is `true`.
    pub fn panels(&self) -> [(Panel, bool); 5] {
        let visible = self.visible_panel();
        Panel::ALL.map(|p| (p, p == visible))
    }

    pub fn payload(&self) -> Option<&ImagePayload> {
        self.payload.as_ref()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn dispatch(&mut self, action: Action) -> Option<Command> {
        if self.locked {
            warn!(?action, "controller locked by configuration error, ignoring");
            return None;
        }
        if matches!(self.state, UiState::Analyzing)
            && matches!(
                action,
                Action::Select(_)
                    | Action::SelectFailed(_)
                    | Action::Clear
                    | Action::Analyze
                    | Action::Retry
            )
        {
            warn!(?action, "analysis in flight, ignoring");
            return None;
        }

        match action {
            Action::Select(file) => {
                self.select(file);
                None
            }
            Action::SelectFailed(e) => {
                self.fail(Error::from(e));
                None
            }
            Action::Clear => {
                self.payload = None;
                self.enter(UiState::Idle);
                None
            }
            Action::Analyze => match self.state {
                UiState::Idle | UiState::Previewing | UiState::Failed(_) => self.start_analysis(),
                _ => {
                    warn!(state = self.state.name(), "analyze not offered here, ignoring");
                    None
                }
            },
            Action::Retry => match self.state {
                UiState::Failed(_) => self.start_analysis(),
                _ => {
                    warn!(state = self.state.name(), "retry only follows a failure, ignoring");
                    None
                }
            },
            Action::Completed(outcome) => {
                if !matches!(self.state, UiState::Analyzing) {
                    warn!(state = self.state.name(), "stale completion ignored");
                    return None;
                }
                match outcome {
                    Ok(result) => self.enter(UiState::Showing(result)),
                    Err(e) => self.fail(e),
                }
                None
            }
            Action::UnexpectedFailure(message) => {
                if matches!(self.state, UiState::Analyzing) {
                    self.fail(Error::unknown_with_context(
                        message,
                        ErrorContext::new().with_source("controller"),
                    ));
                } else {
                    warn!(%message, "unexpected failure outside analysis");
                }
                None
            }
        }
    }

    fn select(&mut self, file: SelectedFile) {
        match ImagePayload::from_file(file) {
            Ok(payload) => {
                info!(image = payload.name(), bytes = payload.size(), "image loaded");
                self.payload = Some(payload);
                self.enter(UiState::Previewing);
            }
            Err(e) => self.fail(e.into()),
        }
    }

    fn start_analysis(&mut self) -> Option<Command> {
        match &self.payload {
            Some(payload) => {
                let command = Command::Classify(payload.clone());
                self.enter(UiState::Analyzing);
                Some(command)
            }
            None => {
                self.fail(ValidationError::NoImageLoaded.into());
                None
            }
        }
    }

    fn fail(&mut self, e: Error) {
        error!(error = %e, "attempt failed");
        self.enter(UiState::Failed(e.user_message()));
    }

    fn enter(&mut self, next: UiState) {
        info!(from = self.state.name(), to = next.name(), "transition");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{Category, Confidence};

    fn ready() -> ViewController {
        ViewController::new(Ok(()))
    }

    fn png() -> SelectedFile {
        SelectedFile::new("cat.png", "image/png", vec![1, 2, 3, 4])
    }

    fn verdict() -> AnalysisResult {
        AnalysisResult {
            category: Category::Kara,
            confidence: Confidence::clamped(64),
            details: Vec::new(),
            rationale: "dark background".into(),
        }
    }

    fn assert_single_panel(vc: &ViewController) {
        let shown: Vec<Panel> = vc
            .panels()
            .iter()
            .filter(|(_, visible)| *visible)
            .map(|(p, _)| *p)
            .collect();
        assert_eq!(shown, vec![vc.visible_panel()]);
    }

    #[test]
    fn select_valid_image_previews() {
        let mut vc = ready();
        assert_eq!(vc.visible_panel(), Panel::Upload);
        assert!(vc.dispatch(Action::Select(png())).is_none());
        assert_eq!(vc.state(), &UiState::Previewing);
        assert_eq!(vc.payload().map(|p| p.name()), Some("cat.png"));
        assert_single_panel(&vc);
    }

    #[test]
    fn select_invalid_file_fails_without_payload() {
        let mut vc = ready();
        vc.dispatch(Action::Select(SelectedFile::new("a.txt", "text/plain", vec![1])));
        assert_eq!(
            vc.state(),
            &UiState::Failed("Please select a valid image file.".into())
        );
        assert!(vc.payload().is_none());
        assert!(vc.dispatch(Action::Analyze).is_none());
        assert_eq!(vc.state(), &UiState::Failed("Load an image first.".into()));
    }

    #[test]
    fn clear_drops_payload() {
        let mut vc = ready();
        vc.dispatch(Action::Select(png()));
        vc.dispatch(Action::Clear);
        assert_eq!(vc.state(), &UiState::Idle);
        assert!(vc.payload().is_none());
    }

    #[test]
    fn analyze_issues_one_classify_command() {
        let mut vc = ready();
        vc.dispatch(Action::Select(png()));
        let cmd = vc.dispatch(Action::Analyze);
        assert!(matches!(cmd, Some(Command::Classify(ref p)) if p.name() == "cat.png"));
        assert_eq!(vc.visible_panel(), Panel::Loading);

        // in flight: further actions do nothing
        assert!(vc.dispatch(Action::Analyze).is_none());
        assert!(vc.dispatch(Action::Clear).is_none());
        assert_eq!(vc.state(), &UiState::Analyzing);

        vc.dispatch(Action::Completed(Ok(verdict())));
        assert_eq!(vc.state(), &UiState::Showing(verdict()));
        assert_single_panel(&vc);
    }

    #[test]
    fn analyze_without_image_fails() {
        let mut vc = ready();
        assert!(vc.dispatch(Action::Analyze).is_none());
        assert_eq!(vc.visible_panel(), Panel::Error);
    }

    #[test]
    fn retry_resends_stored_payload() {
        let mut vc = ready();
        vc.dispatch(Action::Select(png()));
        let first = vc.dispatch(Action::Analyze).unwrap();
        vc.dispatch(Action::Completed(Err(Error::Api {
            status: 500,
            status_text: "Internal Server Error".into(),
        })));
        match vc.state() {
            UiState::Failed(msg) => assert!(msg.contains("500")),
            other => panic!("unexpected state {:?}", other),
        }

        let again = vc.dispatch(Action::Retry).unwrap();
        assert_eq!(first, again);
        assert_eq!(vc.state(), &UiState::Analyzing);
    }

    #[test]
    fn analyze_and_retry_only_from_their_panels() {
        let mut vc = ready();
        vc.dispatch(Action::Select(png()));
        assert!(vc.dispatch(Action::Retry).is_none());
        assert_eq!(vc.state(), &UiState::Previewing);

        vc.dispatch(Action::Analyze);
        vc.dispatch(Action::Completed(Ok(verdict())));
        assert!(vc.dispatch(Action::Analyze).is_none());
        assert!(vc.dispatch(Action::Retry).is_none());
        assert_eq!(vc.state(), &UiState::Showing(verdict()));

        vc.dispatch(Action::Clear);
        assert!(vc.dispatch(Action::Retry).is_none());
        assert_eq!(vc.state(), &UiState::Idle);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut vc = ready();
        vc.dispatch(Action::Select(png()));
        vc.dispatch(Action::Completed(Ok(verdict())));
        assert_eq!(vc.state(), &UiState::Previewing);
    }

    #[test]
    fn unexpected_failure_only_matters_while_analyzing() {
        let mut vc = ready();
        vc.dispatch(Action::Select(png()));
        vc.dispatch(Action::UnexpectedFailure("boom".into()));
        assert_eq!(vc.state(), &UiState::Previewing);

        vc.dispatch(Action::Analyze);
        vc.dispatch(Action::UnexpectedFailure("task panicked".into()));
        assert_eq!(
            vc.state(),
            &UiState::Failed("An unexpected error occurred. Please try again.".into())
        );
        assert!(vc.payload().is_some());
    }

    #[test]
    fn configuration_error_locks_controller() {
        let check = Err(Error::configuration_with_context(
            "missing key",
            ErrorContext::new(),
        ));
        let mut vc = ViewController::new(check);
        assert!(vc.is_locked());
        assert_eq!(vc.visible_panel(), Panel::Error);
        assert!(vc.dispatch(Action::Select(png())).is_none());
        assert!(vc.dispatch(Action::Analyze).is_none());
        assert_eq!(vc.visible_panel(), Panel::Error);
        assert!(vc.payload().is_none());
    }

    #[test]
    fn new_selection_replaces_payload() {
        let mut vc = ready();
        vc.dispatch(Action::Select(png()));
        vc.dispatch(Action::Select(SelectedFile::new("dog.jpg", "image/jpeg", vec![9])));
        assert_eq!(vc.payload().map(|p| p.name()), Some("dog.jpg"));
        assert_eq!(vc.state(), &UiState::Previewing);
    }
}
