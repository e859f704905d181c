use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{failed, ok, pending};

/// Spinner shown on stderr while a remote call is in flight
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("  {msg} {spinner}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(pending(message).to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    pub fn succeed(self, message: &str) {
        self.pb
            .finish_with_message(ok(format!("{message} ✓")).to_string());
    }

    pub fn fail(self, message: &str) {
        self.pb
            .finish_with_message(failed(format!("{message} ✗")).to_string());
    }
}
