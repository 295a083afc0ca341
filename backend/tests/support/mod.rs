#![allow(dead_code)]

use std::collections::HashSet;
use std::io::Cursor;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};

use platinum_tool::scales::ScaleRegistry;
use platinum_tool::services::astro::Ephemeris;
use platinum_tool::shell::Shell;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Midnight on the given day.
pub fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Build a shell over `script` with the built-in presets.
pub fn scripted_shell(script: &str, ephemeris: Ephemeris) -> Shell<Cursor<Vec<u8>>, Vec<u8>> {
    Shell::new(
        Cursor::new(script.as_bytes().to_vec()),
        Vec::new(),
        ScaleRegistry::builtin(),
        ephemeris,
    )
}

/// Run the main menu over `script` and return everything printed.
pub fn run_script(script: &str) -> String {
    let mut shell = scripted_shell(script, Ephemeris::kepler());
    shell.run().unwrap();
    let (_, output) = shell.into_parts();
    String::from_utf8(output).unwrap()
}
