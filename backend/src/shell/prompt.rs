use chrono::NaiveDateTime;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use super::{Shell, ShellError, ShellResult};
use crate::models::{parse_date_input, parse_magnitude, DateInput, Operation, Scale};

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Print `prompt` and read one line without its line terminator.
    pub(super) fn ask(&mut self, prompt: &str) -> ShellResult<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(ShellError::EndOfInput);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask until `parse` accepts the answer, printing its message otherwise.
    pub(super) fn ask_parsed<T>(
        &mut self,
        prompt: &str,
        mut parse: impl FnMut(&str) -> Result<T, String>,
    ) -> ShellResult<T> {
        loop {
            let line = self.ask(prompt)?;
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(message) => writeln!(self.output, "{message}")?,
            }
        }
    }

    /// `None` when the user types `cancel`.
    pub(super) fn ask_date(&mut self, prompt: &str) -> ShellResult<Option<NaiveDateTime>> {
        let prompt = format!("{prompt}\n(YYYY-MM-DD, MM/DD/YYYY, or DD-MM-YYYY): ");
        self.ask_parsed(&prompt, |raw| match parse_date_input(raw) {
            Ok(DateInput::Date(date)) => Ok(Some(date)),
            Ok(DateInput::Cancel) => Ok(None),
            Err(_) => Err("Invalid date format. Please use YYYY-MM-DD, MM/DD/YYYY, or \
                           DD-MM-YYYY\nType 'cancel' to go back"
                .to_string()),
        })
    }

    pub(super) fn ask_scale(&mut self) -> ShellResult<Scale> {
        let prompt = format!("Choose time-scale ({}): ", Scale::choices());
        self.ask_parsed(&prompt, |raw| {
            raw.parse::<Scale>()
                .map_err(|_| format!("Invalid scale. Please choose from {}", Scale::choices()))
        })
    }

    pub(super) fn ask_operation(&mut self) -> ShellResult<Operation> {
        self.ask_parsed("Choose operation (+ or -): ", |raw| {
            raw.parse::<Operation>()
                .map_err(|_| "Invalid operation. Please choose + or -".to_string())
        })
    }

    pub(super) fn ask_magnitude(&mut self, scale: Scale) -> ShellResult<f64> {
        let prompt = format!("Enter duration in {scale}: ");
        self.ask_parsed(&prompt, |raw| match parse_magnitude(raw) {
            Ok(value) => Ok(value),
            Err(_) if raw.trim().parse::<f64>().is_ok() => {
                Err("Please enter a positive number".to_string())
            }
            Err(_) => Err("Invalid input. Please enter a number".to_string()),
        })
    }

    /// Menu index in `0..count`.
    pub(super) fn ask_index(&mut self, prompt: &str, count: usize) -> ShellResult<usize> {
        let max = count.saturating_sub(1);
        self.ask_parsed(prompt, |raw| match raw.trim().parse::<usize>() {
            Ok(i) if i < count => Ok(i),
            Ok(_) => Err(format!("Invalid choice. Enter 0-{max}")),
            Err(_) => Err("Invalid input. Enter a number.".to_string()),
        })
    }

    /// Directory for an export, or `None` to skip.
    ///
    /// A blank answer uses the configured export directory when there is one.
    pub(super) fn ask_export_dir(&mut self) -> ShellResult<Option<PathBuf>> {
        let prompt = match &self.export_dir {
            Some(dir) => format!(
                "Enter directory path to save results [{}]: ",
                dir.display()
            ),
            None => "Enter directory path to save results (blank to skip): ".to_string(),
        };
        let answer = self.ask(&prompt)?;
        let answer = answer.trim();
        if answer.is_empty() {
            Ok(self.export_dir.clone())
        } else {
            Ok(Some(PathBuf::from(answer)))
        }
    }
}
