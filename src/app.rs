//! Sub-application runner.
//!
//! A sub-application (monitor view, packet capture, firmware transfer)
//! borrows the byte stream from the line editor for as long as it runs. One
//! application at a time; BREAK (Ctrl-C) always kills it and returns the
//! stream to the editor.

use crate::config::APP_IDLE_DELAY_MS;
use crate::error::CliError;
use crate::shell::decoder::KeyButton;

/// A long-running interactive program hosted by the shell.
pub trait SubApp {
    /// One unit of work. Return `true` when more work is pending, which
    /// schedules the next cycle after [`period_ms`](Self::period_ms);
    /// `false` backs off to the idle delay.
    fn run_once(&mut self) -> bool;

    /// Delay between productive work cycles, in milliseconds.
    fn period_ms(&self) -> u32 {
        100
    }

    /// A plain input byte arrived. Return `false` to terminate the
    /// application.
    fn on_char(&mut self, ch: u8) -> bool {
        let _ = ch;
        true
    }

    /// A decoded key arrived. BREAK never reaches this hook.
    fn on_key(&mut self, key: KeyButton) {
        let _ = key;
    }

    /// Cleanup hook, called once on termination.
    fn on_terminate(&mut self) {}
}

/// Single-slot runner for the active sub-application.
pub struct AppRunner<'app> {
    active: Option<&'app mut dyn SubApp>,
}

impl<'app> AppRunner<'app> {
    pub(crate) fn new() -> Self {
        Self { active: None }
    }

    /// True while a sub-application owns the byte stream.
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Install `app` as the active sub-application.
    pub fn start(&mut self, app: &'app mut dyn SubApp) -> Result<(), CliError> {
        if self.active.is_some() {
            return Err(CliError::AppAlreadyRunning);
        }
        #[cfg(feature = "defmt")]
        defmt::info!("sub-app started");
        self.active = Some(app);
        Ok(())
    }

    /// Stop the active application, running its cleanup hook. Idempotent.
    pub fn terminate(&mut self) {
        if let Some(app) = self.active.take() {
            app.on_terminate();
            #[cfg(feature = "defmt")]
            defmt::info!("sub-app terminated");
        }
    }

    /// Deliver a plain byte. Returns `false` when the application gave the
    /// stream up (or none is running); the caller terminates it then.
    pub(crate) fn dispatch_char(&mut self, ch: u8) -> bool {
        match self.active.as_mut() {
            Some(app) => app.on_char(ch),
            None => false,
        }
    }

    /// Deliver a decoded key. BREAK terminates with cleanup; any other key
    /// releases the slot after the hook, skipping cleanup.
    pub(crate) fn dispatch_key(&mut self, key: KeyButton) -> bool {
        if key == KeyButton::Break {
            self.terminate();
            return false;
        }
        match self.active.take() {
            None => false,
            Some(app) => {
                app.on_key(key);
                true
            }
        }
    }

    /// Run one work cycle; returns the delay until the next one.
    pub fn cycle(&mut self) -> u32 {
        match self.active.as_mut() {
            Some(app) => {
                if app.run_once() {
                    app.period_ms()
                } else {
                    APP_IDLE_DELAY_MS
                }
            }
            None => APP_IDLE_DELAY_MS,
        }
    }
}

impl core::fmt::Debug for AppRunner<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppRunner")
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        cycles: u32,
        chars: u32,
        keys: u32,
        terminated: bool,
        busy: bool,
        release_on_char: bool,
    }

    impl SubApp for Probe {
        fn run_once(&mut self) -> bool {
            self.cycles += 1;
            self.busy
        }
        fn period_ms(&self) -> u32 {
            250
        }
        fn on_char(&mut self, _ch: u8) -> bool {
            self.chars += 1;
            !self.release_on_char
        }
        fn on_key(&mut self, _key: KeyButton) {
            self.keys += 1;
        }
        fn on_terminate(&mut self) {
            self.terminated = true;
        }
    }

    #[test]
    fn test_single_slot() {
        let mut first = Probe::default();
        let mut second = Probe::default();
        let mut runner = AppRunner::new();
        assert!(runner.start(&mut first).is_ok());
        assert_eq!(runner.start(&mut second), Err(CliError::AppAlreadyRunning));
        assert!(runner.is_running());
    }

    #[test]
    fn test_break_terminates_with_cleanup() {
        let mut app = Probe::default();
        let mut runner = AppRunner::new();
        runner.start(&mut app).unwrap();
        assert!(!runner.dispatch_key(KeyButton::Break));
        assert!(!runner.is_running());
        assert!(app.terminated);
    }

    #[test]
    fn test_other_key_releases_without_cleanup() {
        let mut app = Probe::default();
        let mut runner = AppRunner::new();
        runner.start(&mut app).unwrap();
        assert!(runner.dispatch_key(KeyButton::F1));
        assert!(!runner.is_running());
        assert_eq!(app.keys, 1);
        assert!(!app.terminated);
    }

    #[test]
    fn test_char_refusal_reported() {
        let mut app = Probe { release_on_char: true, ..Probe::default() };
        let mut runner = AppRunner::new();
        runner.start(&mut app).unwrap();
        assert!(!runner.dispatch_char(b'q'));
    }

    #[test]
    fn test_cycle_cadence() {
        let mut app = Probe { busy: true, ..Probe::default() };
        let mut runner = AppRunner::new();
        runner.start(&mut app).unwrap();
        assert_eq!(runner.cycle(), 250);
        drop(runner);
        app.busy = false;
        let mut runner = AppRunner::new();
        runner.start(&mut app).unwrap();
        assert_eq!(runner.cycle(), APP_IDLE_DELAY_MS);
        runner.terminate();
        assert_eq!(runner.cycle(), APP_IDLE_DELAY_MS);
    }

    #[test]
    fn test_terminate_idempotent() {
        let mut app = Probe::default();
        let mut runner = AppRunner::new();
        runner.start(&mut app).unwrap();
        runner.terminate();
        runner.terminate();
        assert!(!runner.is_running());
    }
}
