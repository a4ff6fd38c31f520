//! User-Friendly Error Formatting
//!
//! Renders top-level failures of the binary with a short explanation and
//! troubleshooting hints.

use std::fmt::Write;

use crate::error::GestureError;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Format error for user consumption
pub fn format_user_error(error: &anyhow::Error) -> String {
    let mut output = String::new();

    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "╔════════════════════════════════════════════════════════════╗"
    )
    .ok();
    writeln!(
        &mut output,
        "║                     ERROR                                  ║"
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();
    writeln!(&mut output).ok();

    let gesture_error = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<GestureError>());
    let error_msg = error.to_string();

    match gesture_error {
        Some(GestureError::UnknownProfile(name)) => format_unknown_profile(&mut output, name),
        Some(GestureError::InvalidProfile(_)) => format_config_error(&mut output),
        Some(GestureError::Io(_)) => format_input_error(&mut output),
        _ if error_msg.contains("config") || error_msg.contains("TOML") => {
            format_config_error(&mut output)
        }
        _ if error_msg.contains("input") => format_input_error(&mut output),
        _ => format_generic_error(&mut output, &error_msg),
    }

    writeln!(&mut output).ok();
    writeln!(&mut output, "{}", RULE).ok();
    writeln!(&mut output, "Technical Details:").ok();
    writeln!(&mut output).ok();
    writeln!(&mut output, "{:#}", error).ok();
    writeln!(&mut output).ok();
    writeln!(&mut output, "{}", RULE).ok();
    writeln!(&mut output, "Need Help?").ok();
    writeln!(
        &mut output,
        "  - Run with --verbose for detailed logs: air-gesture -vv"
    )
    .ok();
    writeln!(&mut output, "  - List profiles: air-gesture --list-profiles").ok();

    output
}

fn format_unknown_profile(output: &mut String, name: &str) {
    writeln!(output, "Unknown Threshold Profile").ok();
    writeln!(output).ok();
    writeln!(output, "No profile named '{}' is configured.", name).ok();
    writeln!(output).ok();
    writeln!(output, "  1. Built-in profiles: default, precise, responsive").ok();
    writeln!(output, "     → Names are case-insensitive").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Custom profiles live in the config file").ok();
    writeln!(output, "     → Add a [profiles.{}] table", name.to_lowercase()).ok();
}

fn format_config_error(output: &mut String) {
    writeln!(output, "Configuration Error").ok();
    writeln!(output).ok();
    writeln!(output, "Problem with the configuration file.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Invalid TOML syntax").ok();
    writeln!(output, "     → Check for typos, missing quotes, etc.").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Values out of range").ok();
    writeln!(output, "     → Distances must be positive").ok();
    writeln!(output, "     → cursor_smoothing must be in (0, 1]").ok();
    writeln!(output, "     → process_every_nth must be at least 1").ok();
    if let Some(path) = crate::config::Config::default_path() {
        writeln!(output).ok();
        writeln!(output, "  Default location: {}", path.display()).ok();
    }
}

fn format_input_error(output: &mut String) {
    writeln!(output, "Frame Input Error").ok();
    writeln!(output).ok();
    writeln!(output, "Could not read landmark frames.").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Check the --input path exists and is readable").ok();
    writeln!(output, "  2. Use '-' to read frames from stdin").ok();
    writeln!(
        output,
        "  3. Each line must be one JSON frame: {{\"hands\": [...]}}"
    )
    .ok();
}

fn format_generic_error(output: &mut String, error: &str) {
    writeln!(output, "Gesture Engine Error").ok();
    writeln!(output).ok();
    writeln!(output, "Error: {}", error).ok();
}
