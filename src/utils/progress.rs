use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Running "<label> records extracted: N" counter on stderr.
///
/// Presentation only: hidden when quiet or when stderr is not a terminal
/// (indicatif checks the latter itself).
pub struct RecordCounter {
    pb: ProgressBar,
    label: String,
}

impl RecordCounter {
    pub fn new(label: &str, quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_draw_target(ProgressDrawTarget::stderr());
            if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        };

        let counter = Self {
            pb,
            label: label.to_string(),
        };
        counter.render();
        counter
    }

    pub fn inc(&self, n: u64) {
        self.pb.inc(n);
        self.render();
    }

    pub fn count(&self) -> u64 {
        self.pb.position()
    }

    pub fn finish(&self) {
        self.pb.finish_with_message(format!(
            "{} records extracted: {} (done)",
            self.label,
            self.pb.position()
        ));
    }

    pub fn abandon(&self, reason: &str) {
        self.pb.abandon_with_message(format!(
            "{} records extracted: {} ({})",
            self.label,
            self.pb.position(),
            reason
        ));
    }

    fn render(&self) {
        self.pb
            .set_message(format!("{} records extracted: {}", self.label, self.pb.position()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_counter_still_counts() {
        let counter = RecordCounter::new("DataCite", true);
        counter.inc(25);
        counter.inc(4);
        assert_eq!(counter.count(), 29);
        counter.finish();
    }
}
