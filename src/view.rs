//! Terminal rendering of the visible panel.

use std::fmt::Write as _;

use crate::controller::{UiState, ViewController};
use crate::result::{AnalysisResult, Category};

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeVariant {
    Pembe,
    Kara,
}

impl BadgeVariant {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pembe => "🌸 PEMBE",
            Self::Kara => "⚫ KARA",
        }
    }

    /// Style class, lower-case label.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Pembe => "pembe",
            Self::Kara => "kara",
        }
    }
}

impl From<Category> for BadgeVariant {
    fn from(c: Category) -> Self {
        match c {
            Category::Pembe => Self::Pembe,
            Category::Kara => Self::Kara,
        }
    }
}

/// Everything the result panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub badge: BadgeVariant,
    /// Width of the confidence fill, in percent.
    pub fill_percent: u8,
    pub confidence_text: String,
    pub details: Vec<(String, String)>,
    pub rationale: String,
}

impl ResultCard {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            badge: result.category.into(),
            fill_percent: result.confidence.value(),
            confidence_text: result.confidence.to_string(),
            details: result
                .details
                .iter()
                .map(|(k, v)| (humanize(k), v.clone()))
                .collect(),
            rationale: result.rationale.clone(),
        }
    }

    /// Fixed-width text bar, e.g. `[##########----------]`.
    pub fn bar(&self) -> String {
        let filled = (self.fill_percent as usize * BAR_WIDTH + 50) / 100;
        format!(
            "[{}{}]",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled)
        )
    }
}

fn humanize(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Text for whichever panel is visible.
pub fn render_panel(vc: &ViewController) -> String {
    let mut out = String::new();
    match vc.state() {
        UiState::Idle => {
            out.push_str("== Upload ==\nOpen or drop an image (max 5MB).\n");
        }
        UiState::Previewing => {
            out.push_str("== Preview ==\n");
            if let Some(p) = vc.payload() {
                let _ = writeln!(out, "{} ({}, {} bytes)", p.name(), p.mime_type(), p.size());
            }
            out.push_str("Commands: analyze, clear\n");
        }
        UiState::Analyzing => {
            out.push_str("== Analyzing ==\nWaiting for the classification service...\n");
        }
        UiState::Showing(result) => {
            let card = ResultCard::from_result(result);
            let _ = writeln!(out, "== Result ==\n{}", card.badge.label());
            let _ = writeln!(out, "Confidence {} {}", card.bar(), card.confidence_text);
            if !card.details.is_empty() {
                out.push_str("Details:\n");
                for (k, v) in &card.details {
                    let _ = writeln!(out, "  {}: {}", k, v);
                }
            }
            let _ = writeln!(out, "Reasoning:\n  {}", card.rationale);
        }
        UiState::Failed(message) => {
            let _ = writeln!(out, "== Error ==\n{}", message);
            if !vc.is_locked() {
                out.push_str("Commands: retry, open <path>\n");
            }
        }
    }
    out
}
