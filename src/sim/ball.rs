//! Ball entity and per-ball integration

use std::f32::consts::PI;
use std::sync::Arc;

use glam::{Vec2, Vec4};
use rand::Rng;

use crate::color::Palette;
use crate::polar_to_cartesian;

/// Radius per size level
pub const RADIUS_PER_SIZE: f32 = 10.0;

/// Largest size a ball can have; 2^63 is the largest displayable value
pub const MAX_SIZE: u32 = 63;

/// Uniform random point inside a disk of `radius`
///
/// Uses the sum of two uniforms folded at 1, which yields the triangular
/// radial density of a uniform disk without rejection.
pub fn rand_circle<R: Rng>(rng: &mut R, radius: f32) -> Vec2 {
    let t = 2.0 * PI * rng.random::<f32>();
    let u = rng.random::<f32>() + rng.random::<f32>();
    let r = if u > 1.0 { 2.0 - u } else { u };
    polar_to_cartesian(radius * r, t)
}

/// A ball on the field
///
/// `radius`, `mass` and both colors are derived from `size` and only change
/// through [`Ball::grow`].
#[derive(Debug, Clone)]
pub struct Ball {
    size: u32,
    radius: f32,
    mass: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    color: Vec4,
    text_color: Vec4,
    palette: Arc<Palette>,
}

impl Ball {
    pub fn new(size: u32, pos: Vec2, vel: Vec2, palette: Arc<Palette>) -> Self {
        let mut ball = Self {
            size: size.clamp(1, MAX_SIZE),
            radius: 0.0,
            mass: 0.0,
            pos,
            vel,
            color: Vec4::ZERO,
            text_color: Vec4::ZERO,
            palette,
        };
        ball.update_size();
        ball
    }

    /// Fresh ball: size 1 or 2, anywhere on the field, drifting slowly
    pub fn random<R: Rng>(
        rng: &mut R,
        field_size: f32,
        vel_radius: f32,
        palette: Arc<Palette>,
    ) -> Self {
        let size = rng.random_range(1..=2);
        let pos = Vec2::new(
            rng.random_range(0.0..field_size),
            rng.random_range(0.0..field_size),
        );
        let vel = rand_circle(rng, vel_radius);
        Self::new(size, pos, vel, palette)
    }

    fn update_size(&mut self) {
        self.radius = self.size as f32 * RADIUS_PER_SIZE;
        self.mass = 4.0 / 3.0 * PI * self.radius.powi(3);
        self.color = self.palette.ball_color(self.size);
        self.text_color = self.palette.text_color(self.size);
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Displayed number, 2^size
    pub fn value(&self) -> u64 {
        1u64 << self.size
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn text_color(&self) -> Vec4 {
        self.text_color
    }

    /// One size up; a ball at `MAX_SIZE` stays there
    pub fn grow(&mut self) {
        self.size = (self.size + 1).min(MAX_SIZE);
        self.update_size();
    }

    /// Advance one step and bounce off the four walls
    ///
    /// Position is clamped back onto the field, so a ball stays visible even
    /// after the field shrinks under it.
    pub fn physics_step(&mut self, dt: f32, field_size: f32, gravity: Vec2, wall_damping: f32) {
        self.pos += dt * self.vel;
        self.vel += dt * gravity;

        let r = self.radius;

        // left
        if self.pos.x - r < 0.0 {
            self.vel.x = self.vel.x.abs() * wall_damping;
            self.pos.x = r.max(self.pos.x - r);
        }
        // right
        if self.pos.x + r > field_size {
            self.vel.x = -self.vel.x.abs() * wall_damping;
            self.pos.x = (self.pos.x + r).min(field_size - r);
        }
        // top
        if self.pos.y - r < 0.0 {
            self.vel.y = self.vel.y.abs() * wall_damping;
            self.pos.y = r.max(self.pos.y - r);
        }
        // bottom
        if self.pos.y + r > field_size {
            self.vel.y = -self.vel.y.abs() * wall_damping;
            self.pos.y = (self.pos.y + r).min(field_size - r);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ball(size: u32, pos: Vec2, vel: Vec2) -> Ball {
        Ball::new(size, pos, vel, Arc::new(Palette::default()))
    }

    #[test]
    fn test_derived_fields_follow_size() {
        let mut b = ball(3, Vec2::ZERO, Vec2::ZERO);
        assert_eq!(b.radius(), 30.0);
        assert!((b.mass() - 4.0 / 3.0 * PI * 27_000.0).abs() < 1.0);
        assert_eq!(b.value(), 8);

        b.grow();
        assert_eq!(b.size(), 4);
        assert_eq!(b.radius(), 40.0);
        assert_eq!(b.color(), Palette::default().ball_color(4));
        assert_eq!(b.text_color(), Palette::default().text_color(4));
    }

    #[test]
    fn test_size_is_capped() {
        let mut b = ball(u32::MAX, Vec2::ZERO, Vec2::ZERO);
        assert_eq!(b.size(), MAX_SIZE);
        assert_eq!(b.value(), 1u64 << 63);

        b.grow();
        assert_eq!(b.size(), MAX_SIZE);
        assert_eq!(b.radius(), MAX_SIZE as f32 * RADIUS_PER_SIZE);
    }

    #[test]
    fn test_left_wall_bounce() {
        let mut b = ball(1, Vec2::new(5.0, 256.0), Vec2::new(-50.0, 0.0));
        b.physics_step(0.1, 512.0, Vec2::ZERO, 0.9);
        assert_eq!(b.pos.x, 10.0);
        assert!((b.vel.x - 45.0).abs() < 1e-4);
        assert_eq!(b.pos.y, 256.0);
    }

    #[test]
    fn test_corner_bounces_both_axes() {
        let mut b = ball(1, Vec2::new(505.0, 505.0), Vec2::new(20.0, 20.0));
        b.physics_step(0.1, 512.0, Vec2::ZERO, 0.5);
        assert_eq!(b.pos, Vec2::new(502.0, 502.0));
        assert_eq!(b.vel, Vec2::new(-10.0, -10.0));
    }

    #[test]
    fn test_gravity_applied_after_move() {
        let mut b = ball(1, Vec2::new(100.0, 100.0), Vec2::new(10.0, 0.0));
        b.physics_step(0.5, 512.0, Vec2::new(0.0, 200.0), 0.9);
        // position uses the old velocity
        assert_eq!(b.pos, Vec2::new(105.0, 100.0));
        assert_eq!(b.vel, Vec2::new(10.0, 100.0));
    }

    #[test]
    fn test_step_is_deterministic() {
        let mut a = ball(2, Vec2::new(40.0, 60.0), Vec2::new(-300.0, 12.5));
        let mut b = a.clone();
        for _ in 0..50 {
            a.physics_step(1.0 / 60.0, 512.0, Vec2::new(30.0, 200.0), 0.9);
            b.physics_step(1.0 / 60.0, 512.0, Vec2::new(30.0, 200.0), 0.9);
        }
        assert_eq!(a.pos, b.pos);
        assert_eq!(a.vel, b.vel);
    }

    #[test]
    fn test_random_ball_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let palette = Arc::new(Palette::default());
        for _ in 0..200 {
            let b = Ball::random(&mut rng, 512.0, 10.0, palette.clone());
            assert!(b.size() == 1 || b.size() == 2);
            assert!((0.0..512.0).contains(&b.pos.x));
            assert!((0.0..512.0).contains(&b.pos.y));
            assert!(b.vel.length() <= 10.0 + 1e-4);
        }
    }

    proptest! {
        #[test]
        fn prop_ball_stays_on_field(
            size in 1u32..6,
            x in 0.0f32..512.0,
            y in 0.0f32..512.0,
            vx in -2000.0f32..2000.0,
            vy in -2000.0f32..2000.0,
            gx in -400.0f32..400.0,
            gy in -400.0f32..400.0,
            shrink in 0.0f32..200.0,
        ) {
            let mut b = ball(size, Vec2::new(x, y), Vec2::new(vx, vy));
            for _ in 0..20 {
                b.physics_step(1.0 / 30.0, 512.0, Vec2::new(gx, gy), 0.9);
            }
            let r = b.radius();
            let eps = 1e-3;
            prop_assert!(b.pos.x >= r - eps && b.pos.x <= 512.0 - r + eps);
            prop_assert!(b.pos.y >= r - eps && b.pos.y <= 512.0 - r + eps);

            // shrinking the field pulls the ball back in on the next step
            let field = 512.0 - shrink;
            b.physics_step(1.0 / 30.0, field, Vec2::new(gx, gy), 0.9);
            prop_assert!(b.pos.x >= r - eps && b.pos.x <= field - r + eps);
            prop_assert!(b.pos.y >= r - eps && b.pos.y <= field - r + eps);
        }
    }
}
