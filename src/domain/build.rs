const TASK_INFO_MARKER: &str = "Task info";

/// Captured result of an external command: stdout followed by stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub output: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Finds the Koji task URL in `koji build` output.
///
/// The reference is the first token following `Task info:` on the last line
/// carrying the marker.
pub fn extract_task_reference(output: &str) -> Option<String> {
    output
        .lines()
        .filter(|line| line.contains(TASK_INFO_MARKER))
        .filter_map(|line| {
            let (_, rest) = line.split_once(TASK_INFO_MARKER)?;
            let rest = rest.trim_start().strip_prefix(':').unwrap_or(rest);
            rest.split_whitespace().next().map(str::to_string)
        })
        .last()
}

pub fn build_comment(task_url: &str) -> String {
    format!("This package built on koji: {task_url}")
}
