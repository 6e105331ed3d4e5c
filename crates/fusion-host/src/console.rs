//! Console setup and the final keypress pause.

use std::future::Future;
use std::io::{self, BufRead, Write};

/// UTF-8 console code page.
#[cfg(windows)]
const CP_UTF8: &str = "65001";

/// Switch the console to the UTF-8 code page.
///
/// Best effort: any failure is logged and ignored. Other hosts already
/// use UTF-8 terminals, so this is a no-op there.
pub fn set_utf8_code_page() {
    #[cfg(windows)]
    {
        use std::process::{Command, Stdio};

        match Command::new("cmd")
            .args(["/C", "chcp", CP_UTF8])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) if status.success() => tracing::debug!("console code page set to {CP_UTF8}"),
            Ok(status) => tracing::debug!(%status, "chcp failed; continuing"),
            Err(err) => tracing::debug!(error = %err, "chcp unavailable; continuing"),
        }
    }

    #[cfg(not(windows))]
    tracing::debug!("no code page switch needed on this host");
}

/// Blocks until the user acknowledges, before the launcher exits.
pub trait Pause {
    fn pause(&mut self);
}

/// Waits on the real console.
///
/// Windows runs `cmd /C pause` ("Press any key to continue . . ."); other
/// hosts print a prompt and wait for Enter.
pub struct ConsolePause;

impl Pause for ConsolePause {
    fn pause(&mut self) {
        #[cfg(windows)]
        let result = std::process::Command::new("cmd")
            .args(["/C", "pause"])
            .status()
            .map(|_| ());
        #[cfg(not(windows))]
        let result = prompt_and_wait(&mut io::stdin().lock(), &mut io::stdout().lock());

        if let Err(err) = result {
            tracing::debug!(error = %err, "pause failed");
        }
    }
}

/// Returns immediately. Used for `--no-pause` and non-interactive runs.
pub struct NoPause;

impl Pause for NoPause {
    fn pause(&mut self) {}
}

/// Run `pause` on a blocking thread until it returns or `interrupt` fires.
///
/// The launcher keeps an interrupt listener installed after the child
/// exits, which would otherwise swallow Ctrl+C at the prompt. If the
/// listener itself fails, the pause is awaited normally.
pub async fn pause_until<F>(pause: Box<dyn Pause + Send>, interrupt: F)
where
    F: Future<Output = io::Result<()>>,
{
    let mut waiting = tokio::task::spawn_blocking(move || {
        let mut pause = pause;
        pause.pause();
    });

    tokio::select! {
        _ = &mut waiting => {}
        result = interrupt => match result {
            Ok(()) => tracing::debug!("interrupt received at pause"),
            Err(err) => {
                tracing::debug!(error = %err, "cannot listen for interrupts at pause");
                let _ = waiting.await;
            }
        },
    }
}

/// Print the continue prompt to `output` and consume one line of `input`.
///
/// End of input counts as acknowledgment.
pub fn prompt_and_wait<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<()> {
    write!(output, "Press Enter to continue . . . ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}
