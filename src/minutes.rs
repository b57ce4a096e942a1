//! Presentation rules for the results page.

use crate::error::ApiError;
use crate::models::{ActionItem, MeetingResult, Minutes};

pub const NONE_RECORDED: &str = "None recorded";
pub const NO_ACTION_ITEMS: &str = "No action items found";
pub const BULLET: &str = "\u{2022}";

pub const COPY_LABEL: &str = "Copy as Text";
pub const COPIED_LABEL: &str = "\u{2713} Copied!";

/// Task with optional ` (assignee)` and ` \u{2014} deadline` suffixes.
pub fn action_item_line(item: &ActionItem) -> String {
    let mut line = item.task.clone();
    if let Some(assignee) = item.assignee() {
        line.push_str(&format!(" ({assignee})"));
    }
    if let Some(deadline) = item.deadline() {
        line.push_str(&format!(" \u{2014} {deadline}"));
    }
    line
}

fn bullets_or_placeholder(items: &[String]) -> Vec<String> {
    if items.is_empty() {
        vec![NONE_RECORDED.to_string()]
    } else {
        items.iter().map(|i| format!("{BULLET} {i}")).collect()
    }
}

/// Plain-text minutes for the clipboard. Includes every action item whatever
/// its confidence.
pub fn plain_text(filename: &str, result: &MeetingResult) -> String {
    let mut lines = vec![
        format!("MEETING MINUTES \u{2014} {filename}"),
        String::new(),
        "OVERVIEW".to_string(),
        result.overview.clone(),
        String::new(),
        "KEY POINTS".to_string(),
    ];
    lines.extend(result.key_points.iter().map(|p| format!("{BULLET} {p}")));

    lines.push(String::new());
    lines.push("DECISIONS".to_string());
    lines.extend(bullets_or_placeholder(&result.decisions));

    lines.push(String::new());
    lines.push("OPEN QUESTIONS".to_string());
    lines.extend(bullets_or_placeholder(&result.open_questions));

    lines.push(String::new());
    lines.push("ACTION ITEMS".to_string());
    if result.action_items.is_empty() {
        lines.push(NONE_RECORDED.to_string());
    } else {
        lines.extend(
            result
                .action_items
                .iter()
                .map(|a| format!("{BULLET} {}", action_item_line(a))),
        );
    }

    lines.join("\n")
}

pub fn has_low_confidence(items: &[ActionItem]) -> bool {
    items.iter().any(ActionItem::is_low_confidence)
}

/// Items to list, in backend order. Low-confidence items only when revealed.
pub fn visible_action_items(items: &[ActionItem], show_low_confidence: bool) -> Vec<&ActionItem> {
    items
        .iter()
        .filter(|a| show_low_confidence || !a.is_low_confidence())
        .collect()
}

#[derive(Debug)]
pub enum ResultsPhase {
    Loading,
    Loaded(Minutes),
    Error(String),
}

/// State of one results page: the single fetch plus the display toggles.
#[derive(Debug)]
pub struct ResultsView {
    job_id: String,
    phase: ResultsPhase,
    show_low_confidence: bool,
    transcript_open: bool,
    copied: bool,
}

impl ResultsView {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            phase: ResultsPhase::Loading,
            show_low_confidence: false,
            transcript_open: false,
            copied: false,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn phase(&self) -> &ResultsPhase {
        &self.phase
    }

    pub fn minutes(&self) -> Option<&Minutes> {
        match &self.phase {
            ResultsPhase::Loaded(m) => Some(m),
            _ => None,
        }
    }

    /// Record the outcome of the fetch. Returns false if the view was not
    /// waiting for one.
    pub fn finish_loading(&mut self, outcome: Result<Minutes, ApiError>) -> bool {
        if !matches!(self.phase, ResultsPhase::Loading) {
            return false;
        }
        self.phase = match outcome {
            Ok(minutes) => ResultsPhase::Loaded(minutes),
            Err(e) => {
                log::error!("Loading results for {} failed: {e}", self.job_id);
                ResultsPhase::Error(format!("Could not load the meeting minutes. {e}"))
            }
        };
        true
    }

    /// Back to loading so the fetch can be issued again. Only valid from the
    /// error state.
    pub fn retry(&mut self) -> bool {
        if matches!(self.phase, ResultsPhase::Error(_)) {
            self.phase = ResultsPhase::Loading;
            true
        } else {
            false
        }
    }

    pub fn toggle_low_confidence(&mut self) {
        self.show_low_confidence = !self.show_low_confidence;
    }

    /// Label for the low-confidence toggle, or `None` when there is nothing
    /// to reveal and the toggle must not be offered.
    pub fn low_confidence_toggle_label(&self) -> Option<&'static str> {
        let minutes = self.minutes()?;
        if !has_low_confidence(&minutes.result.action_items) {
            return None;
        }
        Some(if self.show_low_confidence {
            "Hide low-confidence items"
        } else {
            "Show low-confidence items"
        })
    }

    /// True when the result lists any action item, visible or not.
    pub fn has_action_items(&self) -> bool {
        self.minutes()
            .is_some_and(|m| !m.result.action_items.is_empty())
    }

    pub fn visible_action_items(&self) -> Vec<&ActionItem> {
        self.minutes()
            .map(|m| visible_action_items(&m.result.action_items, self.show_low_confidence))
            .unwrap_or_default()
    }

    pub fn transcript_open(&self) -> bool {
        self.transcript_open
    }

    pub fn toggle_transcript(&mut self) {
        self.transcript_open = !self.transcript_open;
    }

    pub fn transcript_toggle_label(&self) -> &'static str {
        if self.transcript_open {
            "\u{25B2} Hide"
        } else {
            "\u{25BC} Show"
        }
    }

    pub fn plain_text(&self) -> Option<String> {
        self.minutes().map(|m| plain_text(&m.filename, &m.result))
    }

    pub fn set_copied(&mut self, copied: bool) {
        self.copied = copied;
    }

    pub fn copy_label(&self) -> &'static str {
        if self.copied {
            COPIED_LABEL
        } else {
            COPY_LABEL
        }
    }
}
