//! Falling confetti shown on a win
//!
//! Purely cosmetic. Timing comes from the snapshot's confetti cue so master and
//! followers celebrate for the same length of time.

use crate::sync::ConfettiCue;
use rand::Rng;
use std::time::{Duration, Instant};

const GRAVITY: f32 = 0.0006;
const GLYPHS: [char; 4] = ['*', '+', '•', '◆'];
pub const PARTICLE_COUNT: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Horizontal position, 0.0..1.0 across the screen
    pub x: f32,
    /// Vertical position, 0.0 at the top; starts above the screen
    pub y: f32,
    vx: f32,
    vy: f32,
    pub color: u8,
    pub glyph: char,
}

#[derive(Debug, Clone)]
pub struct Confetti {
    started: Instant,
    cue: ConfettiCue,
    particles: Vec<Particle>,
}

impl Confetti {
    pub fn new<R: Rng + ?Sized>(cue: ConfettiCue, now: Instant, rng: &mut R) -> Self {
        let particles = (0..PARTICLE_COUNT)
            .map(|_| Particle {
                x: rng.random_range(0.0..1.0),
                y: -rng.random_range(0.0..2.0),
                vx: rng.random_range(-0.004..0.004),
                vy: rng.random_range(0.008..0.03),
                color: rng.random_range(0..5),
                glyph: GLYPHS[rng.random_range(0..GLYPHS.len())],
            })
            .collect();
        Self {
            started: now,
            cue,
            particles,
        }
    }

    #[must_use]
    pub fn is_done(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= Duration::from_millis(self.cue.duration_ms)
    }

    /// 1.0 until the taper starts, then linearly down to 0.0 at the end
    #[must_use]
    pub fn intensity(&self, now: Instant) -> f32 {
        let elapsed = now.duration_since(self.started).as_millis() as f32;
        let duration = self.cue.duration_ms as f32;
        let taper = (self.cue.taper_ms as f32).min(duration);
        let taper_start = duration - taper;

        if elapsed >= duration {
            0.0
        } else if elapsed <= taper_start || taper <= 0.0 {
            1.0
        } else {
            1.0 - (elapsed - taper_start) / taper
        }
    }

    /// Advance one frame
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.x = (p.x + p.vx).rem_euclid(1.0);
            p.y += p.vy;
            p.vy += GRAVITY;
            if p.y > 1.0 {
                p.y -= 1.2;
                p.vy *= 0.5;
            }
        }
    }

    /// Particles on screen right now, thinned out during the taper
    pub fn visible(&self, now: Instant) -> impl Iterator<Item = &Particle> {
        let shown = (self.particles.len() as f32 * self.intensity(now)).round() as usize;
        self.particles
            .iter()
            .take(shown)
            .filter(|p| (0.0..1.0).contains(&p.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn confetti(now: Instant) -> Confetti {
        let cue = ConfettiCue {
            duration_ms: 1000,
            taper_ms: 400,
        };
        Confetti::new(cue, now, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn intensity_tapers_to_zero() {
        let start = Instant::now();
        let c = confetti(start);

        assert!((c.intensity(start) - 1.0).abs() < f32::EPSILON);
        assert!((c.intensity(start + Duration::from_millis(600)) - 1.0).abs() < f32::EPSILON);
        let mid = c.intensity(start + Duration::from_millis(800));
        assert!(mid > 0.4 && mid < 0.6);
        assert!(c.intensity(start + Duration::from_millis(1000)).abs() < f32::EPSILON);
    }

    #[test]
    fn finishes_after_duration() {
        let start = Instant::now();
        let c = confetti(start);
        assert!(!c.is_done(start + Duration::from_millis(999)));
        assert!(c.is_done(start + Duration::from_millis(1000)));
    }

    #[test]
    fn particles_fall_into_view() {
        let start = Instant::now();
        let mut c = confetti(start);
        for _ in 0..200 {
            c.step();
        }
        assert!(c.visible(start).count() > 0);
        assert!(c.visible(start).all(|p| (0.0..1.0).contains(&p.x)));
    }

    #[test]
    fn nothing_visible_once_done() {
        let start = Instant::now();
        let mut c = confetti(start);
        for _ in 0..200 {
            c.step();
        }
        assert_eq!(c.visible(start + Duration::from_secs(5)).count(), 0);
    }
}
