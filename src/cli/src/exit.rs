//! Process exit status tracking.
//!
//! Commands report failures by raising the tracked code; the highest code
//! reported during a run becomes the process exit status.

use std::sync::atomic::{AtomicI32, Ordering};

/// Monotonic exit code. Starts at 0 (success) and only ever moves up.
#[derive(Debug, Default)]
pub struct ExitCode {
    code: AtomicI32,
}

impl ExitCode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the tracked code to `code` if it is greater than the current one.
    ///
    /// Codes `<= 0` never lower a failure that has already been recorded.
    pub fn set(&self, code: i32) {
        self.code.fetch_max(code, Ordering::SeqCst);
    }

    /// Return the current code.
    pub fn get(&self) -> i32 {
        self.code.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn reset_for_tests(&self) {
        self.code.store(0, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(ExitCode::new().get(), 0);
    }

    #[test]
    fn raises_to_non_zero() {
        let exit = ExitCode::new();
        exit.set(1);
        assert_eq!(exit.get(), 1);
    }

    #[test]
    fn never_lowers() {
        let exit = ExitCode::new();
        exit.set(2);
        exit.set(1);
        exit.set(0);
        exit.set(-3);
        assert_eq!(exit.get(), 2);
    }

    #[test]
    fn highest_code_wins() {
        let exit = ExitCode::new();
        for code in [1, 3, 2, 0, 1] {
            exit.set(code);
        }
        assert_eq!(exit.get(), 3);
    }

    #[test]
    fn reset_returns_to_success() {
        let exit = ExitCode::new();
        exit.set(4);
        exit.reset_for_tests();
        assert_eq!(exit.get(), 0);
    }
}
