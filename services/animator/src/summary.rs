//! Run summary formatting.

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use pipeline::{Animation, EncodeStatus};

/// Formats an animation outcome for the console.
pub struct Summary;

impl Summary {
    /// Format the outcome as a console table.
    pub fn format_table(animation: &Animation) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec!["Animation Summary", ""]);

        if let Some(run) = &animation.run {
            table.add_row(vec!["Directory:", &run.directory.display().to_string()]);
            table.add_row(vec!["Ranks:", &run.num_ranks.to_string()]);
            table.add_row(vec!["Workers:", &run.workers.to_string()]);
            table.add_row(vec!["Timesteps:", &run.total().to_string()]);
            table.add_row(vec!["Succeeded:", &run.succeeded.len().to_string()]);
            table.add_row(vec!["Failed:", &run.failed.len().to_string()]);
            table.add_row(vec!["Render time:", &format!("{:.2}s", run.elapsed_secs)]);
            table.add_row(vec!["Per timestep:", &format!("{:.1}ms", run.mean_task_ms)]);

            if !run.failed.is_empty() {
                table.add_row(vec!["", ""]);
                table.add_row(vec!["Failed timestep", "Error"]);
                for (timestep, failure) in &run.failed {
                    table.add_row(vec![
                        format!("{timestep:05}"),
                        format!("{}: {}", failure.kind, failure.message),
                    ]);
                }
            }
            table.add_row(vec!["", ""]);
        }

        table.add_row(vec!["Frames:", &animation.frames.to_string()]);
        let encode = match &animation.encode {
            EncodeStatus::Encoded(path) => format!("{}", path.display()),
            EncodeStatus::Skipped => "skipped (no frames)".to_string(),
            EncodeStatus::Failed(e) => format!("{}: {e}", e.kind()),
        };
        table.add_row(vec!["Encode:", &encode]);
        table.add_row(vec!["Encode time:", &format!("{:.2}s", animation.encode_secs)]);

        table.to_string()
    }

    /// Format the outcome as JSON.
    pub fn format_json(animation: &Animation) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(animation)?)
    }
}
