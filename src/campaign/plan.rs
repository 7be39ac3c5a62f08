//! Measurement campaign planning.
//!
//! The whole campaign is expanded into a flat list of actions before the run
//! starts. The emulator then only has to execute `MoveTo` and `Dwell` in
//! order, and the shape of the campaign can be checked without running it.

use core::time::Duration;

use crate::config::units::Meters;
use crate::config::CampaignConfig;

/// Fraction of a step by which the last point may exceed `end` and still be
/// included.
pub const POINT_TOLERANCE: f64 = 1e-9;

/// Part of the campaign an action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Increasing points, retracting to the left.
    Forward,
    /// Excursion to one step past the far bound.
    Reversal,
    /// Decreasing points, retracting to the right.
    Reverse,
}

/// Why the axis is standing still.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwellKind {
    /// Holding at a measurement point.
    AtPoint,
    /// Holding after a retract move.
    AfterRetract,
    /// Settling at the reversal position between passes.
    Reversal,
}

/// One step of the campaign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Travel to an absolute position.
    MoveTo {
        /// Destination.
        target: Meters,
        /// Owning pass.
        pass: Pass,
    },
    /// Stand still, sampling with one stop bias.
    Dwell {
        /// How long to stand.
        duration: Duration,
        /// Why.
        kind: DwellKind,
        /// Owning pass.
        pass: Pass,
    },
}

impl Action {
    /// Pass this action belongs to.
    pub fn pass(&self) -> Pass {
        match *self {
            Action::MoveTo { pass, .. } | Action::Dwell { pass, .. } => pass,
        }
    }

    /// Move target, if this is a move.
    pub fn target(&self) -> Option<Meters> {
        match *self {
            Action::MoveTo { target, .. } => Some(target),
            Action::Dwell { .. } => None,
        }
    }
}

/// Precomputed campaign: points and the ordered actions visiting them.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignPlan {
    start: Meters,
    overshoot: Meters,
    points: Vec<Meters>,
    actions: Vec<Action>,
}

impl CampaignPlan {
    /// Expand a campaign configuration.
    ///
    /// The configuration is expected to have passed validation (positive
    /// step, `start <= end`, at least one cycle).
    pub fn new(config: &CampaignConfig) -> Self {
        let start = config.start_m();
        let end = config.end_m();
        let step = config.step_m();
        let overshoot = end + step;

        let points = measurement_points(start, end, step);

        let mut plan = Self {
            start,
            overshoot,
            points,
            actions: Vec::new(),
        };
        plan.expand(config);
        plan
    }

    fn expand(&mut self, config: &CampaignConfig) {
        let step = config.step_m();
        let cycles = config.cycles_per_point;
        let mut actions = Vec::new();

        // Forward pass: approach from the left
        for &point in &self.points {
            let retract = (point - step).max(self.start);
            push_cycles(&mut actions, config, Pass::Forward, point, retract, cycles);
        }

        // Reversal: one step past the far bound
        actions.push(Action::MoveTo {
            target: self.overshoot,
            pass: Pass::Reversal,
        });
        actions.push(Action::Dwell {
            duration: config.dwell_after_retract,
            kind: DwellKind::Reversal,
            pass: Pass::Reversal,
        });

        // Reverse pass: approach from the right
        for (i, &point) in self.points.iter().enumerate().rev() {
            let right_neighbor = self.points.get(i + 1).copied().unwrap_or(self.overshoot);
            push_cycles(&mut actions, config, Pass::Reverse, point, right_neighbor, cycles);
        }

        self.actions = actions;
    }

    /// Measurement points in increasing order.
    #[inline]
    pub fn points(&self) -> &[Meters] {
        &self.points
    }

    /// Reversal position, one step past `end`.
    #[inline]
    pub fn overshoot(&self) -> Meters {
        self.overshoot
    }

    /// Start of the range, where the axis begins.
    #[inline]
    pub fn start(&self) -> Meters {
        self.start
    }

    /// All actions in execution order.
    #[inline]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Actions of a single pass, in execution order.
    pub fn actions_in(&self, pass: Pass) -> impl Iterator<Item = &Action> + '_ {
        self.actions.iter().filter(move |a| a.pass() == pass)
    }

    /// Total time spent dwelling.
    pub fn total_dwell(&self) -> Duration {
        self.actions
            .iter()
            .filter_map(|a| match a {
                Action::Dwell { duration, .. } => Some(*duration),
                Action::MoveTo { .. } => None,
            })
            .sum()
    }

    /// Number of moves in the plan.
    pub fn move_count(&self) -> usize {
        self.actions.iter().filter(|a| a.target().is_some()).count()
    }
}

/// Points `start + step, start + 2*step, ...` up to `end` inclusive.
///
/// Points are computed by multiplication, not accumulation, so rounding
/// error does not grow along the range.
fn measurement_points(start: Meters, end: Meters, step: Meters) -> Vec<Meters> {
    let limit = end.0 + step.0 * POINT_TOLERANCE;
    (1u64..)
        .map(|i| Meters(start.0 + step.0 * i as f64))
        .take_while(|p| p.0 <= limit)
        .collect()
}

fn push_cycles(
    actions: &mut Vec<Action>,
    config: &CampaignConfig,
    pass: Pass,
    point: Meters,
    retract: Meters,
    cycles: u32,
) {
    for cycle in 0..cycles {
        actions.push(Action::MoveTo {
            target: point,
            pass,
        });
        actions.push(Action::Dwell {
            duration: config.dwell_at_point,
            kind: DwellKind::AtPoint,
            pass,
        });

        if cycle + 1 < cycles {
            actions.push(Action::MoveTo {
                target: retract,
                pass,
            });
            actions.push(Action::Dwell {
                duration: config.dwell_after_retract,
                kind: DwellKind::AfterRetract,
                pass,
            });
        }
    }
}
