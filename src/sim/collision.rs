//! Ball/ball collision detection and response
//!
//! Equal-size balls merge into one ball of the next size. Different sizes
//! bounce with a partially elastic impulse and are pushed apart so they do
//! not stay interpenetrated.

use glam::Vec2;

use super::ball::Ball;

/// Distance below which two centers are treated as coincident
pub const COINCIDENT_EPSILON: f32 = 1.0e-4;

/// Result of resolving one pair of balls
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Collision {
    /// The balls overlapped
    pub collided: bool,
    /// The second ball was absorbed into the first and must be removed
    pub merged: bool,
    /// Penetration depth (sum of radii minus center distance)
    pub compression: f32,
}

impl Collision {
    pub fn miss() -> Self {
        Self::default()
    }
}

/// Resolve a possible collision between `a` and `b`
///
/// On a merge `a` survives: it moves to the midpoint, takes the inelastic
/// velocity and grows by one size. The caller removes `b`.
pub fn resolve(a: &mut Ball, b: &mut Ball, restitution: f32) -> Collision {
    let diff = a.pos - b.pos;
    let dist = diff.length();
    let reach = a.radius() + b.radius();

    if dist < COINCIDENT_EPSILON {
        // No usable normal. Same-size stacks still merge, anything else is skipped.
        if a.size() == b.size() {
            merge(a, b, Vec2::ZERO);
            return Collision {
                collided: true,
                merged: true,
                compression: reach - dist,
            };
        }
        return Collision::miss();
    }

    if dist > reach {
        return Collision::miss();
    }

    let n = diff / dist;
    let compression = reach - dist;

    if a.size() == b.size() {
        merge(a, b, n);
        return Collision {
            collided: true,
            merged: true,
            compression,
        };
    }

    let c = n.dot(a.vel - b.vel);
    let total_mass = a.mass() + b.mass();
    let a_mag = (b.mass() * c) / total_mass * (1.0 + restitution);
    let b_mag = (a.mass() * c) / total_mass * (1.0 + restitution);

    a.vel -= a_mag * n;
    b.vel += b_mag * n;

    // push apart so the pair does not stick
    a.pos += n * (compression * 0.5);
    b.pos -= n * (compression * 0.5);

    Collision {
        collided: true,
        merged: false,
        compression,
    }
}

fn merge(a: &mut Ball, b: &Ball, n: Vec2) {
    let c = n.dot(a.vel - b.vel);
    let impulse = (b.mass() * c) / (a.mass() + b.mass());
    a.pos = (a.pos + b.pos) / 2.0;
    a.vel -= impulse * n;
    a.grow();
}
