//! Stage status lines for the pipeline runners
//!
//! On a terminal each stage (load, validate, match) gets a spinner line.
//! Elsewhere the bars are hidden and log lines carry the progress.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

fn stage_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {prefix:<10.cyan.bold} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Owns the `MultiProgress` that stage lines and the log bridge share.
pub struct ProgressContext {
    multi: MultiProgress,
    is_tty: bool,
}

impl ProgressContext {
    /// Detect the terminal from stderr.
    pub fn new() -> Self {
        Self::with_tty(std::io::stderr().is_terminal())
    }

    pub fn with_tty(is_tty: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            is_tty,
        }
    }

    /// Spinner line labelled `stage`. Finish it with
    /// `finish_with_message`; off a terminal the returned bar is hidden.
    pub fn stage_line(&self, stage: &str) -> ProgressBar {
        if !self.is_tty {
            return ProgressBar::hidden();
        }
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(stage_style());
        bar.set_prefix(stage.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    /// Handle for `init_logging`, so log lines print above the spinners.
    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }
}

impl Default for ProgressContext {
    fn default() -> Self {
        Self::new()
    }
}

/// `1234567` → `"1,234,567"`.
pub fn fmt_num(n: usize) -> String {
    let digits = n.to_string();
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.char_indices() {
        if idx > 0 && (idx + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
