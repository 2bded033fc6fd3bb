//! Slope-limited piecewise-linear reconstruction of the primitives, one
//! logical axis at a time.

use ndarray::Array2;

use crate::{
    physical_quantities::{Primitive, State, NUM_STATE_COMPONENTS},
    state::CellState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlopeLimiter {
    Minmod,
    MonotonizedCentral,
    VanLeer,
}

fn minmod(a: f64, b: f64) -> f64 {
    0.5 * (a.signum() + b.signum()) * a.abs().min(b.abs())
}

impl SlopeLimiter {
    /// Resolve a limiter by name. Unknown names fall back to the
    /// monotonized-central limiter with a warning rather than aborting.
    pub fn from_name(name: &str) -> Self {
        match name {
            "minmod" => Self::Minmod,
            "monotonized-central" => Self::MonotonizedCentral,
            "van-leer" => Self::VanLeer,
            _ => {
                log::warn!(
                    "Unknown slope limiter {:?}, falling back to monotonized-central",
                    name
                );
                Self::MonotonizedCentral
            }
        }
    }

    /// Bounded slope from the backward difference `a` and forward difference
    /// `b` of one primitive component.
    fn limit(&self, a: f64, b: f64) -> f64 {
        match self {
            Self::Minmod => minmod(a, b),
            Self::MonotonizedCentral => minmod(2. * a, minmod(0.5 * (a + b), 2. * b)),
            Self::VanLeer => {
                if a * b > 0. {
                    2. * a * b / (a + b)
                } else {
                    0.
                }
            }
        }
    }

    fn limited_slope(
        &self,
        left: &State<Primitive>,
        mid: &State<Primitive>,
        right: &State<Primitive>,
    ) -> State<Primitive> {
        let mut slope = State::vacuum();
        for k in 0..NUM_STATE_COMPONENTS {
            slope[k] = self.limit(mid[k] - left[k], right[k] - mid[k]);
        }
        slope
    }
}

/// The two extrapolated face states of each cell along one axis: `minus`
/// towards the lower index, `plus` towards the higher index.
pub struct AxisStates {
    pub minus: Array2<State<Primitive>>,
    pub plus: Array2<State<Primitive>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Extrapolate the cell-centred primitives half a cell towards both faces
/// along the given axis.
///
/// Boundary-adjacent cells copy the cell value (zero slope) rather than
/// extrapolating past the domain, and any cell whose extrapolation would
/// produce a non-positive density or pressure reverts to zero slope as well.
pub fn reconstruct(
    state: &CellState,
    ny: usize,
    nx: usize,
    axis: Axis,
    limiter: SlopeLimiter,
) -> AxisStates {
    let mut minus = Array2::from_elem((ny, nx), State::vacuum());
    let mut plus = Array2::from_elem((ny, nx), State::vacuum());

    for j in 0..ny {
        for i in 0..nx {
            let mid = *state.primitives(j, i);
            let interior = match axis {
                Axis::X => i > 0 && i < nx - 1,
                Axis::Y => j > 0 && j < ny - 1,
            };
            let slope = if interior {
                let (left, right) = match axis {
                    Axis::X => (state.primitives(j, i - 1), state.primitives(j, i + 1)),
                    Axis::Y => (state.primitives(j - 1, i), state.primitives(j + 1, i)),
                };
                limiter.limited_slope(left, &mid, right)
            } else {
                State::vacuum()
            };

            let lo = mid - 0.5 * slope;
            let hi = mid + 0.5 * slope;
            // Revert to first order when the extrapolation loses positivity.
            if lo.density() <= 0. || lo.pressure() <= 0. || hi.density() <= 0.
                || hi.pressure() <= 0.
            {
                minus[(j, i)] = mid;
                plus[(j, i)] = mid;
            } else {
                minus[(j, i)] = lo;
                plus[(j, i)] = hi;
            }
        }
    }

    AxisStates { minus, plus }
}
