//! Cosmetic particle bursts

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{MAX_PARTICLES, Particle};

/// Life lost per tick (a burst lasts half a second)
const LIFE_DECAY: f32 = 1.0 / 30.0;

/// Spray `count` particles outward from `pos`
pub fn emit_burst(particles: &mut Vec<Particle>, rng: &mut Pcg32, pos: Vec2, count: u32) {
    for _ in 0..count {
        if particles.len() >= MAX_PARTICLES {
            break;
        }
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(1.5..5.0);
        particles.push(Particle {
            pos,
            vel: Vec2::from_angle(angle) * speed,
            life: 1.0,
            size: rng.random_range(2.0..5.0),
        });
    }
}

/// Move, slow and age particles, dropping dead ones
pub fn update_particles(particles: &mut Vec<Particle>, scroll: f32) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.pos.y += scroll;
        particle.vel *= 0.92;
        particle.life -= LIFE_DECAY;
        particle.size *= 0.97;
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_burst_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = Vec::new();
        emit_burst(&mut particles, &mut rng, Vec2::ZERO, 12);
        assert_eq!(particles.len(), 12);

        emit_burst(&mut particles, &mut rng, Vec2::ZERO, 1000);
        assert_eq!(particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_particles_expire() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = Vec::new();
        emit_burst(&mut particles, &mut rng, Vec2::new(100.0, 100.0), 8);
        for _ in 0..31 {
            update_particles(&mut particles, 5.0);
        }
        assert!(particles.is_empty());
    }
}
