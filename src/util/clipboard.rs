use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Put `text` on the system clipboard by piping it to the platform's copy
/// command (`pbcopy`, `wl-copy` or `xclip`)
pub fn copy_text(text: &str) -> io::Result<()> {
    let (program, args) = copy_command()?;
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("{} exited with {}", program, status)))
    }
}

#[cfg(target_os = "macos")]
fn copy_command() -> io::Result<(&'static str, &'static [&'static str])> {
    Ok(("pbcopy", &[]))
}

#[cfg(target_os = "linux")]
fn copy_command() -> io::Result<(&'static str, &'static [&'static str])> {
    if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        Ok(("wl-copy", &[]))
    } else {
        Ok(("xclip", &["-selection", "clipboard"]))
    }
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn copy_command() -> io::Result<(&'static str, &'static [&'static str])> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "no clipboard command on this platform",
    ))
}
