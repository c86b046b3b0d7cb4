use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{heading, phase_done, phase_running};

/// Progress tracking for the two collection phases
pub struct PhaseProgress {
    pb: ProgressBar,
}

impl PhaseProgress {
    pub fn start_phase_1() -> Self {
        eprintln!("{}", heading("Collecting"));
        let pb = create_spinner(phase_running("[1/2] fetching builds").to_string());
        Self { pb }
    }

    pub fn finish_phase_1_start_phase_2(self, build_count: usize) -> Self {
        self.pb.finish_with_message(
            phase_done(format!("[1/2] fetched {build_count} builds")).to_string(),
        );
        let pb = create_spinner(phase_running("[2/2] normalizing steps").to_string());
        Self { pb }
    }

    pub fn finish_phase_2(self, step_count: usize) {
        self.pb.finish_with_message(
            phase_done(format!("[2/2] found {step_count} steps")).to_string(),
        );
        eprintln!();
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
