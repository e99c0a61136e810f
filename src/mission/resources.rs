//! Resource vectors: mission state, goals, command costs and bounds

use serde::{Deserialize, Serialize};
use std::ops::{AddAssign, SubAssign};

/// Amounts of each mission resource. Missing fields deserialize as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub comm: i64,
    pub data: i64,
    pub nav: i64,
    pub power: i64,
    pub drift: i64,
    pub heat: i64,
    pub thrust: i64,
    pub crew: i64,
    pub radiation: i64,
}

impl Resources {
    /// A lower bound every real amount lies above.
    pub fn floor() -> Self {
        Self::splat(i64::MIN)
    }

    /// An upper bound every real amount lies below.
    pub fn ceiling() -> Self {
        Self::splat(i64::MAX)
    }

    fn splat(value: i64) -> Self {
        Self {
            comm: value,
            data: value,
            nav: value,
            power: value,
            drift: value,
            heat: value,
            thrust: value,
            crew: value,
            radiation: value,
        }
    }

    fn fields(&self) -> [i64; 9] {
        [
            self.comm,
            self.data,
            self.nav,
            self.power,
            self.drift,
            self.heat,
            self.thrust,
            self.crew,
            self.radiation,
        ]
    }

    /// Whether every field lies strictly between `lower` and `upper`.
    pub fn ends_within(&self, lower: &Resources, upper: &Resources) -> bool {
        self.fields()
            .iter()
            .zip(lower.fields())
            .zip(upper.fields())
            .all(|((value, low), high)| *value > low && *value < high)
    }

    /// How much slack these resources leave relative to `goal`.
    ///
    /// Power counts tenfold, radiation a hundredfold against. Surplus comm,
    /// data, nav and thrust count only where the goal asks for them; drift,
    /// heat and crew are ignored. Saturates at the `i64` range.
    pub fn risk(&self, goal: &Resources) -> i64 {
        let mut risk = self
            .power
            .saturating_mul(10)
            .saturating_sub(self.radiation.saturating_mul(100));
        for (value, wanted) in [
            (self.comm, goal.comm),
            (self.data, goal.data),
            (self.nav, goal.nav),
            (self.thrust, goal.thrust),
        ] {
            if wanted > 0 {
                risk = risk.saturating_add(value.saturating_sub(wanted));
            }
        }
        risk
    }
}

// Amounts saturate instead of overflowing.
impl AddAssign<&Resources> for Resources {
    fn add_assign(&mut self, other: &Resources) {
        self.comm = self.comm.saturating_add(other.comm);
        self.data = self.data.saturating_add(other.data);
        self.nav = self.nav.saturating_add(other.nav);
        self.power = self.power.saturating_add(other.power);
        self.drift = self.drift.saturating_add(other.drift);
        self.heat = self.heat.saturating_add(other.heat);
        self.thrust = self.thrust.saturating_add(other.thrust);
        self.crew = self.crew.saturating_add(other.crew);
        self.radiation = self.radiation.saturating_add(other.radiation);
    }
}

impl SubAssign<&Resources> for Resources {
    fn sub_assign(&mut self, other: &Resources) {
        self.comm = self.comm.saturating_sub(other.comm);
        self.data = self.data.saturating_sub(other.data);
        self.nav = self.nav.saturating_sub(other.nav);
        self.power = self.power.saturating_sub(other.power);
        self.drift = self.drift.saturating_sub(other.drift);
        self.heat = self.heat.saturating_sub(other.heat);
        self.thrust = self.thrust.saturating_sub(other.thrust);
        self.crew = self.crew.saturating_sub(other.crew);
        self.radiation = self.radiation.saturating_sub(other.radiation);
    }
}

impl std::fmt::Display for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Drift is signed, so it is shown whenever it is off center.
        let shown = [
            ("comm", self.comm, self.comm > 0),
            ("data", self.data, self.data > 0),
            ("nav", self.nav, self.nav > 0),
            ("power", self.power, self.power > 0),
            ("drift", self.drift, self.drift != 0),
            ("heat", self.heat, self.heat > 0),
            ("thrust", self.thrust, self.thrust > 0),
            ("crew", self.crew, self.crew > 0),
            ("radiation", self.radiation, self.radiation > 0),
        ];
        let parts: Vec<String> = shown
            .iter()
            .filter(|(_, _, visible)| *visible)
            .map(|(name, value, _)| format!("{}: {}", name, value))
            .collect();
        write!(f, "{}", parts.join(" | "))
    }
}
