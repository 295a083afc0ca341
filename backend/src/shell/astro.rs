use chrono::NaiveDateTime;
use std::io::{BufRead, Write};

use super::{Shell, ShellResult};
use crate::io::{export_dir_file, write_astro_table};
use crate::models::{parse_date_input, DateInput};
use crate::services::astro::{AstroTable, SynodicTarget};

const PREVIEW_ROWS: usize = 5;

struct RangeQuery {
    start: NaiveDateTime,
    end: NaiveDateTime,
    bodies: Vec<String>,
    step: f64,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub(super) fn astro_menu(&mut self) -> ShellResult<()> {
        loop {
            writeln!(self.output, "\nAstro Calculation Menu:")?;
            writeln!(self.output, "1. Sidereal calculations")?;
            writeln!(self.output, "2. Synodic calculation")?;
            writeln!(self.output, "3. Get planet position")?;
            writeln!(self.output, "4. Exit to main menu")?;
            writeln!(self.output)?;

            match self.ask("Enter your choice: ")?.trim() {
                "1" => self.sidereal()?,
                "2" => self.synodic()?,
                "3" => self.positions()?,
                "4" => return Ok(()),
                _ => writeln!(self.output, "Invalid choice. Please try again.\n")?,
            }
        }
    }

    fn sidereal(&mut self) -> ShellResult<()> {
        let Some(query) = self.ask_range()? else {
            return Ok(());
        };
        let table = self.ephemeris.longitudes_and_angles(
            query.start,
            query.end,
            query.bodies.as_slice(),
            query.step,
        );
        self.show_and_save(&table, "sidereal_longitudes.csv")
    }

    fn synodic(&mut self) -> ShellResult<()> {
        let Some(query) = self.ask_range()? else {
            return Ok(());
        };
        let target = SynodicTarget::Bodies(query.bodies);
        let table = self
            .ephemeris
            .synodic_period(query.start, query.end, &target, query.step);
        self.show_and_save(&table, "synodic_angles.csv")
    }

    fn positions(&mut self) -> ShellResult<()> {
        let Some(date) = self.ask_astro_date("Enter date (YYYY-MM-DD): ")? else {
            return Ok(());
        };
        let table = self.ephemeris.planet_positions(date);
        let label = date.format("%Y-%m-%d").to_string();

        writeln!(self.output, "Planetary Positions on {label}")?;
        if table.is_empty() {
            writeln!(self.output, "No positions available for {label}.")?;
            return Ok(());
        }
        write!(self.output, "{}", table.render_transposed())?;
        self.save_table(&table, &format!("planetary_positions_{label}.csv"))
    }

    /// `None` on cancel.
    fn ask_range(&mut self) -> ShellResult<Option<RangeQuery>> {
        let Some(start) = self.ask_astro_date("Enter start date (YYYY-MM-DD): ")? else {
            return Ok(None);
        };
        let Some(end) = self.ask_astro_date("Enter end date (YYYY-MM-DD): ")? else {
            return Ok(None);
        };

        let bodies = self.ask_parsed(
            "Enter planet names separated by commas (e.g., mars,venus): ",
            |raw| {
                let bodies: Vec<String> = raw
                    .split(',')
                    .map(|b| b.trim().to_lowercase())
                    .filter(|b| !b.is_empty())
                    .collect();
                if bodies.is_empty() {
                    Err("Please enter at least one planet name.".to_string())
                } else {
                    Ok(bodies)
                }
            },
        )?;

        let default_step = self.step_days;
        let prompt = format!("Enter step in days (default {default_step}): ");
        let step = self.ask_parsed(&prompt, |raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(default_step);
            }
            match raw.parse::<f64>() {
                Ok(step) if step.is_finite() && step > 0.0 => Ok(step),
                _ => Err("Step must be a positive number of days.".to_string()),
            }
        })?;

        Ok(Some(RangeQuery {
            start,
            end,
            bodies,
            step,
        }))
    }

    fn ask_astro_date(&mut self, prompt: &str) -> ShellResult<Option<NaiveDateTime>> {
        self.ask_parsed(prompt, |raw| match parse_date_input(raw) {
            Ok(DateInput::Date(date)) => Ok(Some(date)),
            Ok(DateInput::Cancel) => Ok(None),
            Err(e) => Err(format!("{e}\nType 'cancel' to go back")),
        })
    }

    fn show_and_save(&mut self, table: &AstroTable, file_name: &str) -> ShellResult<()> {
        if table.is_empty() {
            writeln!(self.output, "No results for the given dates and bodies.")?;
            return Ok(());
        }
        write!(self.output, "{}", table.head(PREVIEW_ROWS).render())?;
        self.save_table(table, file_name)
    }

    fn save_table(&mut self, table: &AstroTable, file_name: &str) -> ShellResult<()> {
        let Some(dir) = self.ask_export_dir()? else {
            return Ok(());
        };
        let saved = export_dir_file(&dir, file_name).and_then(|path| {
            write_astro_table(&path, table)?;
            Ok(path)
        });
        match saved {
            Ok(path) => writeln!(self.output, "Results saved to {}", path.display())?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }
}
