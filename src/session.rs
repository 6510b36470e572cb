//! Drives a [`ViewController`] against a [`Classifier`].
//!
//! Classification runs on its own tokio task; a panic or a lost task comes
//! back as [`Action::UnexpectedFailure`] instead of tearing down the session.

use std::sync::Arc;
use tracing::error;

use crate::client::Classifier;
use crate::controller::{Action, Command, ViewController};

pub struct Session {
    controller: ViewController,
    classifier: Arc<dyn Classifier>,
}

impl Session {
    pub fn new(controller: ViewController, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            controller,
            classifier,
        }
    }

    pub fn controller(&self) -> &ViewController {
        &self.controller
    }

    /// Dispatch an action and run any command it produces to completion.
    pub async fn handle(&mut self, action: Action) {
        let mut next = Some(action);
        while let Some(action) = next.take() {
            if let Some(command) = self.controller.dispatch(action) {
                next = Some(self.execute(command).await);
            }
        }
    }

    /// Dispatch an action without running the resulting command.
    pub fn dispatch(&mut self, action: Action) -> Option<Command> {
        self.controller.dispatch(action)
    }

    /// Run a command and turn its outcome into the completion action.
    pub async fn execute(&self, command: Command) -> Action {
        match command {
            Command::Classify(payload) => {
                let classifier = Arc::clone(&self.classifier);
                let task = tokio::spawn(async move { classifier.classify(&payload).await });
                match task.await {
                    Ok(outcome) => Action::Completed(outcome),
                    Err(join_err) => {
                        error!(error = %join_err, "classification task failed");
                        Action::UnexpectedFailure(join_err.to_string())
                    }
                }
            }
        }
    }
}
