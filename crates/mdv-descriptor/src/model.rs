#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::options::OptionsBag;

/// Degrees of freedom for entities with orientation (bodies, rods).
pub const BODY_DOF: usize = 6;
/// Degrees of freedom for translational-only entities (points).
pub const POINT_DOF: usize = 3;

/// How an object's motion is determined.
///
/// Descriptor files encode this as an attachment keyword; the integer
/// codes (0 free, 1 fixed, -1 externally coupled) follow the solver's
/// own convention and survive in [`CouplingMode::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CouplingMode {
    Free,
    Fixed,
    Coupled,
}

impl CouplingMode {
    #[must_use]
    pub fn code(self) -> i8 {
        match self {
            Self::Free => 0,
            Self::Fixed => 1,
            Self::Coupled => -1,
        }
    }
}

/// A 6-DOF body. Orientation components of `r6` are radians; the
/// descriptor stores degrees and the parser converts once at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: i64,
    pub coupling: CouplingMode,
    pub r6: [f64; 6],
}

/// A rod with two end coordinates. `coupled` mirrors the descriptor's
/// 0/1 rod coupling flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rod {
    pub id: i64,
    pub coupled: bool,
    pub end_a: [f64; 3],
    pub end_b: [f64; 3],
}

/// A translational-only point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: i64,
    pub coupling: CouplingMode,
    pub r: [f64; 3],
}

/// A loaded mooring-system descriptor. Immutable once parsed.
///
/// `num_coupled` counts every externally coupled object across all
/// three kinds and fixes the excitation vector's dimensionality at
/// `num_coupled * dof`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemDescriptor {
    pub bodies: Vec<Body>,
    pub rods: Vec<Rod>,
    pub points: Vec<Point>,
    pub options: OptionsBag,
    pub num_coupled: usize,
}

impl SystemDescriptor {
    /// Flat initial pose for all coupled objects, `num_coupled * dof`
    /// long. `dof == 3` walks coupled points; `dof == 6` walks coupled
    /// bodies (full pose) then coupled rods (end A plus the rods'
    /// fixed [0, pi, 0] orientation).
    ///
    /// All coupled objects must share one DOF count; slots belonging
    /// to objects of the other kind stay zero. A hand-built descriptor
    /// whose coupled objects outnumber `num_coupled` fills the vector
    /// in order and drops the overflow.
    #[must_use]
    pub fn initial_pose(&self, dof: usize) -> Vec<f64> {
        let mut xi = vec![0.0; self.num_coupled * dof];
        let mut offset = 0;
        if dof == POINT_DOF {
            for point in &self.points {
                if point.coupling == CouplingMode::Coupled && offset + dof <= xi.len() {
                    xi[offset..offset + 3].copy_from_slice(&point.r);
                    offset += dof;
                }
            }
        }
        if dof == BODY_DOF {
            for body in &self.bodies {
                if body.coupling == CouplingMode::Coupled && offset + dof <= xi.len() {
                    xi[offset..offset + 6].copy_from_slice(&body.r6);
                    offset += dof;
                }
            }
            for rod in &self.rods {
                if rod.coupled && offset + dof <= xi.len() {
                    xi[offset..offset + 3].copy_from_slice(&rod.end_a);
                    xi[offset + 3] = 0.0;
                    xi[offset + 4] = std::f64::consts::PI;
                    xi[offset + 5] = 0.0;
                    offset += dof;
                }
            }
        }
        xi
    }
}
