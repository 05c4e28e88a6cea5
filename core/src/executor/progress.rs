use std::collections::HashMap;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use super::types::TaskStatus;

/// Visual progress monitor for task execution
///
/// Provides an overall bar plus a spinner for every task in flight.
pub struct ProgressMonitor {
    multi: MultiProgress,
    overall: ProgressBar,
    task_bars: HashMap<String, ProgressBar>,
    enabled: bool,
}

impl ProgressMonitor {
    /// Create a new progress monitor
    ///
    /// # Arguments
    ///
    /// * `total_tasks` - Total number of tasks in the run
    /// * `enabled` - Whether to draw anything at all
    pub fn new(total_tasks: usize, enabled: bool) -> Self {
        if !enabled {
            return Self {
                multi: MultiProgress::new(),
                overall: ProgressBar::hidden(),
                task_bars: HashMap::new(),
                enabled: false,
            };
        }

        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(total_tasks as u64));

        overall.set_style(
            ProgressStyle::default_bar()
                .template(
                    "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} tasks ({percent}%) {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓▒░  "),
        );

        overall.set_message("Starting...");

        Self {
            multi,
            overall,
            task_bars: HashMap::new(),
            enabled: true,
        }
    }

    /// Add a spinner for a task that is about to run
    pub fn start_task(&mut self, task_id: &str, attempt: u32) {
        if !self.enabled {
            return;
        }

        let label = if attempt > 1 {
            format!("⏳ {} (attempt {})", task_id, attempt)
        } else {
            format!("⏳ {}", task_id)
        };

        if let Some(bar) = self.task_bars.get(task_id) {
            bar.set_message(label);
            return;
        }

        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        bar.set_message(label);
        bar.enable_steady_tick(Duration::from_millis(100));

        self.task_bars.insert(task_id.to_string(), bar);
    }

    /// Mark a task as resolved
    pub fn complete_task(&mut self, task_id: &str, status: TaskStatus, duration_ms: u64) {
        if !self.enabled {
            return;
        }

        let icon = match status {
            TaskStatus::Success => "✅",
            TaskStatus::Failed => "❌",
            TaskStatus::Skipped => "⏭",
        };

        match self.task_bars.remove(task_id) {
            Some(bar) => bar.finish_with_message(format!("{} {} ({}ms)", icon, task_id, duration_ms)),
            None => self.overall.println(format!("  {} {}", icon, task_id)),
        }

        self.overall.inc(1);
    }

    /// Mark phase progress
    pub fn update_phase(&self, phase_index: usize, total_phases: usize) {
        if self.enabled {
            self.overall
                .set_message(format!("Phase {}/{}", phase_index + 1, total_phases));
        }
    }

    /// Finish overall progress
    pub fn finish(&self, success: bool) {
        if !self.enabled {
            return;
        }

        let msg = if success {
            "✅ All tasks completed"
        } else {
            "❌ Run finished with failures"
        };

        self.overall.finish_with_message(msg.to_string());
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        // Ensure all spinners are cleaned up
        for (_, bar) in self.task_bars.drain() {
            bar.finish_and_clear();
        }
    }
}
