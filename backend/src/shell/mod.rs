//! Interactive menu shell.
//!
//! The shell owns all prompting, printing and file writing. It calls the pure
//! calculation services and turns every [`CoreError`](crate::error::CoreError)
//! they return into a message or a re-prompt. End of input ends the session.

mod astro;
mod prompt;
mod time;

use chrono::NaiveDate;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::ExportSettings;
use crate::error::CoreError;
use crate::scales::ScaleRegistry;
use crate::services::astro::{Ephemeris, DEFAULT_STEP_DAYS};
use crate::services::license::{LicenseDecision, LicenseGate};

pub const WELCOME: &str = "Welcome to Platinum-tool!\nA simple time calculator for your needs.\n";

pub const HELP: &str = "Help:
- This is a time calculator tool.
- Choose options from the menu.
- Dates accept YYYY-MM-DD, MM/DD/YYYY or DD-MM-YYYY.
- Type 'cancel' at a date prompt to go back.
";

/// Errors that end a shell session.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("end of input")]
    EndOfInput,

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type ShellResult<T> = Result<T, ShellError>;

/// Menu-driven session over any line reader and writer.
pub struct Shell<R, W> {
    input: R,
    output: W,
    registry: ScaleRegistry,
    ephemeris: Ephemeris,
    export_dir: Option<PathBuf>,
    step_days: f64,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, registry: ScaleRegistry, ephemeris: Ephemeris) -> Self {
        Self {
            input,
            output,
            registry,
            ephemeris,
            export_dir: None,
            step_days: DEFAULT_STEP_DAYS,
        }
    }

    pub fn with_export(mut self, export: ExportSettings) -> Self {
        self.export_dir = export.directory;
        self
    }

    /// Default step for astro prompts left blank.
    pub fn with_step_days(mut self, step_days: f64) -> Self {
        if step_days.is_finite() && step_days > 0.0 {
            self.step_days = step_days;
        }
        self
    }

    /// Run the main menu until the user exits or input ends.
    pub fn run(&mut self) -> std::io::Result<()> {
        match self.main_menu() {
            Ok(()) | Err(ShellError::EndOfInput) => {
                info!("Shell session finished");
                Ok(())
            }
            Err(ShellError::Io(e)) => Err(e),
        }
    }

    /// Print the welcome banner and check an access key.
    ///
    /// `key` skips the prompt. Returns `false` when the session must not start.
    pub fn unlock(
        &mut self,
        gate: &LicenseGate,
        key: Option<&str>,
        today: NaiveDate,
    ) -> std::io::Result<bool> {
        match self.check_key(gate, key, today) {
            Ok(granted) => Ok(granted),
            Err(ShellError::EndOfInput) => Ok(false),
            Err(ShellError::Io(e)) => Err(e),
        }
    }

    fn check_key(
        &mut self,
        gate: &LicenseGate,
        key: Option<&str>,
        today: NaiveDate,
    ) -> ShellResult<bool> {
        writeln!(self.output, "{WELCOME}")?;
        writeln!(
            self.output,
            "Platinum-tool requires an access key for proprietary use."
        )?;
        let key = match key {
            Some(key) => key.to_string(),
            None => self.ask("Enter your access key: ")?,
        };

        let decision = gate.check(&key, today);
        if gate.proceed(&key, today) {
            writeln!(self.output, "Access granted.\n")?;
            return Ok(true);
        }
        if decision == LicenseDecision::Expired {
            writeln!(self.output, "Access key has expired.")?;
        }
        writeln!(self.output, "Invalid or expired access key. Exiting.")?;
        Ok(false)
    }

    /// Release the reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    fn report_error(&mut self, error: &CoreError) -> ShellResult<()> {
        if !error.is_recoverable() {
            warn!("{}", error);
        }
        writeln!(self.output, "Error: {error}")?;
        Ok(())
    }

    fn main_menu(&mut self) -> ShellResult<()> {
        loop {
            writeln!(self.output, "Menu:")?;
            writeln!(self.output, "1. Time calculation")?;
            writeln!(self.output, "2. Astro calculation")?;
            writeln!(self.output, "3. Help")?;
            writeln!(self.output, "4. Exit")?;
            writeln!(self.output)?;

            match self.ask("Enter your choice: ")?.trim() {
                "1" => self.time_menu()?,
                "2" => self.astro_menu()?,
                "3" => writeln!(self.output, "{HELP}")?,
                "4" => {
                    writeln!(self.output, "Exiting Platinum-tool. Goodbye!")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid choice. Please try again.\n")?,
            }
        }
    }
}
