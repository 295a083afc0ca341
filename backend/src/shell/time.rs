use chrono::NaiveDateTime;
use std::io::{BufRead, Write};
use tracing::info;

use super::{Shell, ShellResult};
use crate::io::{export_dir_file, write_report};
use crate::models::{Duration, ScalingMode};
use crate::services::duration::{difference, shift};
use crate::services::report::{build_report, render_report};
use crate::services::scaling::{parse_custom_ratios, ScalingPlan};

const REPORT_FILE: &str = "scaling_report.csv";

impl<R: BufRead, W: Write> Shell<R, W> {
    pub(super) fn time_menu(&mut self) -> ShellResult<()> {
        loop {
            writeln!(self.output, "\nTime Calculation Menu:")?;
            writeln!(self.output, "1. Calculate time difference between two dates")?;
            writeln!(self.output, "2. Calculate exact date from offset")?;
            writeln!(self.output, "3. Exit to main menu")?;

            match self.ask("Enter your choice: ")?.trim() {
                "1" => self.time_difference()?,
                "2" => self.time_machine()?,
                "3" => return Ok(()),
                _ => writeln!(self.output, "Invalid choice. Please try again.")?,
            }
        }
    }

    fn time_difference(&mut self) -> ShellResult<()> {
        writeln!(self.output, "\nStarting time calculator...")?;
        let Some(start) = self.ask_date("Enter date of origin")? else {
            return Ok(());
        };
        let Some(end) = self.ask_date("Enter end date")? else {
            return Ok(());
        };
        let scale = self.ask_scale()?;

        let duration = difference(start, end, scale);
        writeln!(self.output, "\nTime difference: {duration}")?;

        loop {
            writeln!(self.output, "\nFurther options:")?;
            writeln!(self.output, "1. Perform further division on the results")?;
            writeln!(self.output, "2. Back to time menu")?;

            match self.ask("Enter choice: ")?.trim() {
                "1" => self.scale_results(start, end, &duration)?,
                "2" => return Ok(()),
                _ => writeln!(self.output, "Invalid choice. Please try again.")?,
            }
        }
    }

    fn scale_results(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        duration: &Duration,
    ) -> ShellResult<()> {
        let base = duration.leading();
        if base == 0 {
            writeln!(self.output, "No time difference")?;
            return Ok(());
        }

        writeln!(self.output, "\nChoose scaling mode:")?;
        for (i, mode) in ScalingMode::ALL.iter().enumerate() {
            writeln!(self.output, "{i}. {mode}")?;
        }
        let mode = ScalingMode::ALL[self.ask_index("Enter choice: ", ScalingMode::ALL.len())?];

        let plan = match mode {
            ScalingMode::Custom => {
                let sequence = self.ask_parsed(
                    "Enter ratios separated by commas (e.g. 0.5, 0.75): ",
                    |raw| parse_custom_ratios(raw).map_err(|e| e.to_string()),
                )?;
                ScalingPlan::custom(sequence)
            }
            _ => self.choose_preset(mode)?,
        };

        let report = plan.apply(base as f64).and_then(|scaled| {
            build_report(
                plan.sequence().values(),
                &scaled,
                duration.scale(),
                base,
                mode,
                start,
                end,
            )
        });
        let report = match report {
            Ok(report) => report,
            Err(e) => {
                writeln!(self.output, "Error in calculations: {e}")?;
                return Ok(());
            }
        };

        writeln!(self.output, "\n{}", render_report(&report))?;
        writeln!(self.output, "Data displayed successfully.")?;

        if let Some(dir) = self.ask_export_dir()? {
            match export_dir_file(&dir, REPORT_FILE).and_then(|path| {
                write_report(&path, &report)?;
                Ok(path)
            }) {
                Ok(path) => writeln!(self.output, "Results saved to {}", path.display())?,
                Err(e) => self.report_error(&e)?,
            }
        }
        Ok(())
    }

    fn choose_preset(&mut self, mode: ScalingMode) -> ShellResult<ScalingPlan> {
        let count = match self.registry.ratios_for(mode) {
            Ok(presets) => {
                writeln!(self.output, "\nAvailable {} Scaling Options:", mode.title())?;
                for (i, preset) in presets.iter().enumerate() {
                    writeln!(self.output, "{i}. {preset}")?;
                }
                presets.len()
            }
            Err(e) => {
                writeln!(self.output, "{e}")?;
                0
            }
        };

        let prompt = format!(
            "\nChoose scaling option (0-{}): ",
            count.saturating_sub(1)
        );
        loop {
            let raw = self.ask(&prompt)?;
            let Ok(index) = raw.trim().parse::<i64>() else {
                writeln!(self.output, "Invalid input. Please enter a valid number.")?;
                continue;
            };
            match ScalingPlan::from_registry(&self.registry, mode, index) {
                Ok(plan) => {
                    info!(%mode, preset = plan.sequence().name(), "Scaling preset chosen");
                    return Ok(plan);
                }
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    fn time_machine(&mut self) -> ShellResult<()> {
        writeln!(self.output, "\nStarting time machine...")?;
        let scale = self.ask_scale()?;
        let operation = self.ask_operation()?;
        let magnitude = self.ask_magnitude(scale)?;
        let Some(origin) = self.ask_date("Enter date of origin")? else {
            return Ok(());
        };

        match shift(origin, scale, magnitude, operation) {
            Ok(date) => writeln!(self.output, "\nExact date: {}", date.format("%Y-%m-%d %H:%M"))?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }
}
