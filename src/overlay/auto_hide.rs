//! Auto-hide heuristic for the control overlay
//!
//! Counts progress callbacks while the controls are visible. Once the count
//! exceeds the threshold the controls hide on the next callback. Pointer
//! activity shows them again and restarts the count.

/// Default number of visible progress ticks before hiding
pub const DEFAULT_AUTO_HIDE_TICKS: u32 = 3;

/// Overlay visibility controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoHide {
    visible: bool,
    count: u32,
    threshold: u32,
}

impl AutoHide {
    pub fn new(threshold: u32) -> Self {
        Self {
            visible: true,
            count: 0,
            threshold,
        }
    }

    /// Register one progress callback
    pub fn tick(&mut self) {
        if self.count > self.threshold {
            self.visible = false;
            self.count = 0;
        }
        if self.visible {
            self.count += 1;
        }
    }

    /// Register pointer activity
    pub fn reveal(&mut self) {
        self.visible = true;
        self.count = 0;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Default for AutoHide {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_HIDE_TICKS)
    }
}
