//! The user value object and the ranked views derived from it.

/// A single user entry.
///
/// `uid` is unique within a [`crate::store::UserStore`]; everything else is
/// replaced wholesale by `modify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub uid: u32,
    pub name: String,
    pub exp_pers: u32,
    pub active: u32,
    pub exp_gang: u32,
}

impl Record {
    pub fn new(uid: u32, name: String, exp_pers: u32, active: u32, exp_gang: u32) -> Record {
        Record {
            uid,
            name,
            exp_pers,
            active,
            exp_gang,
        }
    }

    /// `trunc(0.7*exp_pers + 0.3*activity)`.
    ///
    /// Computed in `f64` and truncated toward zero on the cast, matching the
    /// historical source bit-for-bit. Do not change this to `.round()`: two
    /// distinct `(exp_pers, active)` pairs can truncate to the same hybrid
    /// score, which is a known, accepted quirk, not a bug to fix here.
    #[inline]
    pub fn hybrid_a(&self) -> u32 {
        (0.7 * self.exp_pers as f64 + 0.3 * self.active as f64) as u32
    }

    /// `trunc(0.3*exp_pers + 0.3*activity + 0.4*exp_gang)`.
    #[inline]
    pub fn hybrid_b(&self) -> u32 {
        (0.3 * self.exp_pers as f64 + 0.3 * self.active as f64 + 0.4 * self.exp_gang as f64) as u32
    }
}

/// A named, pure projection from a [`Record`] to the `u32` sort key of one
/// ranked view.
#[derive(Clone, Copy)]
pub struct View {
    pub name: &'static str,
    pub project: fn(&Record) -> u32,
}

/// The fixed list of ranked views a [`crate::store::UserStore`] maintains.
///
/// `exp_pers`, `active` and `exp_gang` are reachable from the HTTP surface;
/// `hybrid_a`/`hybrid_b` exercise the coordinator against derived scores
/// without adding new routes.
pub fn view_registry() -> Vec<View> {
    vec![
        View {
            name: "exp_pers",
            project: |r| r.exp_pers,
        },
        View {
            name: "active",
            project: |r| r.active,
        },
        View {
            name: "exp_gang",
            project: |r| r.exp_gang,
        },
        View {
            name: "hybrid_a",
            project: Record::hybrid_a,
        },
        View {
            name: "hybrid_b",
            project: Record::hybrid_b,
        },
    ]
}

#[cfg(test)]
#[path = "record_test.rs"]
mod record_test;
