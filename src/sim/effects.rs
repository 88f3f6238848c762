//! Timed cosmetic effects
//!
//! Window flicker: a building hit toggles some windows and schedules each to
//! revert after a short delay. Timers are keyed by window, so re-triggering
//! a window that is already flickering replaces its timer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::state::Building;

/// Identity of one window on one building
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId {
    pub building: usize,
    pub window: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct FlickerTimer {
    ticks_left: u32,
    /// Lit state before the first toggle
    restore: bool,
}

/// Pending window reverts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlickerSchedule {
    timers: BTreeMap<WindowId, FlickerTimer>,
}

impl FlickerSchedule {
    /// Toggle a window and schedule it to revert after `ticks`.
    ///
    /// If the window already has a timer, the timer is replaced but the lit
    /// state from before the first trigger is kept.
    pub fn trigger(&mut self, buildings: &mut [Building], id: WindowId, ticks: u32) {
        let Some(window) = buildings
            .get_mut(id.building)
            .and_then(|b| b.windows.get_mut(id.window))
        else {
            return;
        };

        let restore = self
            .timers
            .get(&id)
            .map(|t| t.restore)
            .unwrap_or(window.lit);
        window.lit = !window.lit;
        self.timers.insert(
            id,
            FlickerTimer {
                ticks_left: ticks.max(1),
                restore,
            },
        );
    }

    /// Count down one tick and revert expired windows
    pub fn advance(&mut self, buildings: &mut [Building]) {
        self.timers.retain(|id, timer| {
            timer.ticks_left -= 1;
            if timer.ticks_left > 0 {
                return true;
            }
            if let Some(window) = buildings
                .get_mut(id.building)
                .and_then(|b| b.windows.get_mut(id.window))
            {
                window.lit = timer.restore;
            }
            false
        });
    }

    /// Revert every flickering window immediately
    pub fn cancel_all(&mut self, buildings: &mut [Building]) {
        for (id, timer) in std::mem::take(&mut self.timers) {
            if let Some(window) = buildings
                .get_mut(id.building)
                .and_then(|b| b.windows.get_mut(id.window))
            {
                window.lit = timer.restore;
            }
        }
    }

    /// Number of active timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use crate::sim::state::Window;

    fn building(lit: &[bool]) -> Building {
        Building {
            rect: Rect::new(0.0, 300.0, 40.0, 100.0),
            shade: 0,
            windows: lit
                .iter()
                .map(|&lit| Window {
                    rect: Rect::new(5.0, 305.0, 4.0, 6.0),
                    lit,
                })
                .collect(),
        }
    }

    #[test]
    fn test_flicker_reverts_after_duration() {
        let mut buildings = vec![building(&[true, false])];
        let mut schedule = FlickerSchedule::default();
        let id = WindowId {
            building: 0,
            window: 0,
        };

        schedule.trigger(&mut buildings, id, 3);
        assert!(!buildings[0].windows[0].lit);

        schedule.advance(&mut buildings);
        schedule.advance(&mut buildings);
        assert!(!buildings[0].windows[0].lit);
        assert_eq!(schedule.len(), 1);

        schedule.advance(&mut buildings);
        assert!(buildings[0].windows[0].lit);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_retrigger_replaces_timer() {
        let mut buildings = vec![building(&[true])];
        let mut schedule = FlickerSchedule::default();
        let id = WindowId {
            building: 0,
            window: 0,
        };

        for _ in 0..50 {
            schedule.trigger(&mut buildings, id, 5);
        }
        // One timer no matter how often the window was hit
        assert_eq!(schedule.len(), 1);

        for _ in 0..5 {
            schedule.advance(&mut buildings);
        }
        assert!(buildings[0].windows[0].lit);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_cancel_all_restores() {
        let mut buildings = vec![building(&[true, false, true])];
        let mut schedule = FlickerSchedule::default();
        for window in 0..3 {
            schedule.trigger(&mut buildings, WindowId { building: 0, window }, 10);
        }
        schedule.cancel_all(&mut buildings);
        let lit: Vec<bool> = buildings[0].windows.iter().map(|w| w.lit).collect();
        assert_eq!(lit, vec![true, false, true]);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_unknown_window_ignored() {
        let mut buildings = vec![building(&[true])];
        let mut schedule = FlickerSchedule::default();
        schedule.trigger(&mut buildings, WindowId { building: 3, window: 0 }, 5);
        assert!(schedule.is_empty());
    }
}
