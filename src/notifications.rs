/// Cross-platform notification support
/// Currently only implements macOS notifications

#[cfg(target_os = "macos")]
use std::process::Command;

/// Send a notification when a task is completed
pub fn notify_task_done(task_text: &str) {
    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "Questlog - Task Completed""#,
            task_text.replace('"', "\\\"")
        );

        let _ = Command::new("osascript").arg("-e").arg(&script).output();
    }

    #[cfg(not(target_os = "macos"))]
    {
        // No-op on other platforms
        let _ = task_text;
    }
}

/// Send a notification when a focus session runs down
pub fn notify_focus_complete(task_label: &str) {
    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "Questlog - Pomodoro Complete""#,
            task_label.replace('"', "\\\"")
        );

        let _ = Command::new("osascript").arg("-e").arg(&script).output();
    }

    #[cfg(not(target_os = "macos"))]
    {
        // No-op on other platforms
        let _ = task_label;
    }
}
