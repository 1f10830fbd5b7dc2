//! Terminal prompting.

use std::io::{self, BufRead, Write};

use luna_records::{PassphraseProvider, PromptReason, RecordError, RecordResult};
use tracing::warn;
use zeroize::Zeroizing;

pub const PASSPHRASE_ENV: &str = "LUNA_PASS_PASSPHRASE";

/// Read one line from stdin with echo disabled where the terminal allows.
pub fn read_hidden(prompt: &str) -> io::Result<Zeroizing<String>> {
    eprint!("{prompt}: ");
    io::stderr().flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        let stdin_fd = io::stdin().as_raw_fd();
        if let Ok(mut settings) = termios::Termios::from_fd(stdin_fd) {
            let original = settings;
            settings.c_lflag &= !termios::ECHO;
            echo_changed(
                termios::tcsetattr(stdin_fd, termios::TCSANOW, &settings),
                "could not disable terminal echo; input will be visible",
            );

            let line = read_line();
            eprintln!();

            echo_changed(
                termios::tcsetattr(stdin_fd, termios::TCSANOW, &original),
                "could not restore terminal echo",
            );
            return line;
        }
    }

    read_line()
}

/// Log a failed terminal mode change. Returns `true` on success.
#[cfg_attr(not(unix), allow(dead_code))]
fn echo_changed(result: io::Result<()>, warning: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "{warning}");
            false
        }
    }
}

fn read_line() -> io::Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    io::stdin().lock().read_line(&mut line)?;
    Ok(Zeroizing::new(strip_newline(&line).to_string()))
}

fn strip_newline(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Ask for the value of a secret property.
pub fn prompt_secret(key: &str) -> anyhow::Result<Zeroizing<String>> {
    Ok(read_hidden(&format!("Enter value for {key}"))?)
}

/// Passphrases from `LUNA_PASS_PASSPHRASE` or the terminal.
pub struct TerminalPassphrase;

impl PassphraseProvider for TerminalPassphrase {
    fn passphrase(&self, reason: PromptReason) -> RecordResult<Zeroizing<String>> {
        if let Ok(passphrase) = std::env::var(PASSPHRASE_ENV) {
            return Ok(Zeroizing::new(passphrase));
        }
        read_hidden(reason.prompt()).map_err(|e| RecordError::Passphrase(e.to_string()))
    }
}
