use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use partemp::core::ladder::format_temperature;
use partemp::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use tracing::warn;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} replicates {msg}";

/// Renders replicate progress as a bar on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new(hidden: bool) -> Self {
        let pb = ProgressBar::new(0).with_style(Self::bar_style());
        pb.set_draw_target(if hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        });

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::TaskStart { total_steps } => {
                    pb_guard.reset();
                    pb_guard.set_length(total_steps);
                    pb_guard.set_position(0);
                }
                Progress::ReplicateStart { index, temperature } => {
                    pb_guard.set_message(format!(
                        "(#{} at {} K)",
                        index,
                        format_temperature(temperature)
                    ));
                }
                Progress::TaskIncrement => {
                    pb_guard.inc(1);
                }
                Progress::TaskFinish => {
                    pb_guard.finish_with_message("✓ Done");
                }
                Progress::Message(msg) => {
                    pb_guard.println(format!("  {}", msg));
                }
            }
        })
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.pb.lock().map(|pb| pb.position()).unwrap_or(0)
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_tracks_replicate_increments() {
        let handler = CliProgressHandler::new(true);
        let callback = handler.get_callback();

        callback(Progress::TaskStart { total_steps: 3 });
        callback(Progress::ReplicateStart {
            index: 0,
            temperature: 205.0,
        });
        callback(Progress::TaskIncrement);
        callback(Progress::TaskIncrement);
        assert_eq!(handler.position(), 2);

        callback(Progress::Message("grompp failed for npt1.mdp".to_string()));
        callback(Progress::TaskFinish);
    }

    #[test]
    fn task_start_resets_position() {
        let handler = CliProgressHandler::new(true);
        let callback = handler.get_callback();

        callback(Progress::TaskStart { total_steps: 2 });
        callback(Progress::TaskIncrement);
        callback(Progress::TaskStart { total_steps: 5 });
        assert_eq!(handler.position(), 0);
    }
}
