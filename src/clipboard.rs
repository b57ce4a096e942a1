use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::ClipboardError;

/// Clipboard writers to try, in order, for the current platform.
fn candidates() -> Vec<(&'static str, Vec<&'static str>)> {
    #[cfg(target_os = "macos")]
    let tools = vec![("pbcopy", vec![])];

    #[cfg(target_os = "windows")]
    let tools = vec![("clip", vec![])];

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let tools = {
        let wayland = std::env::var("XDG_SESSION_TYPE")
            .map(|s| s == "wayland")
            .unwrap_or(false);
        let mut tools = vec![
            ("xclip", vec!["-selection", "clipboard"]),
            ("xsel", vec!["--clipboard", "--input"]),
        ];
        if wayland {
            tools.insert(0, ("wl-copy", vec![]));
        }
        tools
    };

    tools
}

/// Copy text to the system clipboard. Uses the first tool that can be spawned.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    copy_with(&candidates(), text)
}

fn copy_with(tools: &[(&'static str, Vec<&'static str>)], text: &str) -> Result<(), ClipboardError> {
    for (cmd, args) in tools {
        let mut child = match Command::new(cmd)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                log::debug!("Clipboard tool {cmd} unavailable: {e}");
                continue;
            }
        };

        // stdin is closed when the closure returns, so the tool sees EOF.
        let written = child
            .stdin
            .take()
            .map_or(Ok(()), |mut stdin| stdin.write_all(text.as_bytes()));

        // Always reap the child, even when the write failed.
        let status = child.wait();
        written.map_err(|source| ClipboardError::Write {
            tool: cmd.to_string(),
            source,
        })?;
        let status = status.map_err(|source| ClipboardError::Write {
            tool: cmd.to_string(),
            source,
        })?;
        if !status.success() {
            return Err(ClipboardError::ExitStatus {
                tool: cmd.to_string(),
                status,
            });
        }
        return Ok(());
    }

    let tried: Vec<&str> = tools.iter().map(|(cmd, _)| *cmd).collect();
    Err(ClipboardError::NoTool(tried.join(", ")))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tools_are_skipped() {
        let err = copy_with(&[("clear-minutes-no-such-tool", vec![])], "x").unwrap_err();
        assert!(matches!(err, ClipboardError::NoTool(ref tried) if tried == "clear-minutes-no-such-tool"));
    }

    #[test]
    fn test_first_working_tool_wins() {
        let tools = [
            ("clear-minutes-no-such-tool", vec![]),
            ("sh", vec!["-c", "cat > /dev/null"]),
        ];
        copy_with(&tools, "minutes").unwrap();
    }

    #[test]
    fn test_nonzero_exit_is_reported() {
        let err = copy_with(&[("sh", vec!["-c", "cat > /dev/null; exit 3"])], "x").unwrap_err();
        assert!(matches!(err, ClipboardError::ExitStatus { ref tool, status } if tool == "sh" && status.code() == Some(3)));
    }

    #[test]
    fn test_tool_that_stops_reading_gives_write_error() {
        // Larger than any pipe buffer, so the write fails once `true` exits.
        let text = "a".repeat(4 * 1024 * 1024);
        let err = copy_with(&[("true", vec![])], &text).unwrap_err();
        assert!(matches!(err, ClipboardError::Write { ref tool, .. } if tool == "true"));
    }
}
