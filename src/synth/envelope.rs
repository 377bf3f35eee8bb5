#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Linear ADSR envelope, advanced one sample at a time.
///
/// Segment times are in seconds. A zero-length segment completes in a single sample.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeGenerator {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
    sample_rate: f32,
    stage: Stage,
    value: f32,
    release_step: f32,
}

impl EnvelopeGenerator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.2,
            sample_rate,
            stage: Stage::Idle,
            value: 0.0,
            release_step: 0.0,
        }
    }

    pub fn set_params(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.set_attack(attack);
        self.set_decay(decay);
        self.set_sustain(sustain);
        self.set_release(release);
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.attack = seconds.max(0.0);
    }

    pub fn set_decay(&mut self, seconds: f32) {
        self.decay = seconds.max(0.0);
    }

    pub fn set_sustain(&mut self, level: f32) {
        self.sustain = level.clamp(0.0, 1.0);
    }

    /// Takes effect on the next `release()`; a release already running keeps its slope.
    pub fn set_release(&mut self, seconds: f32) {
        self.release = seconds.max(0.0);
    }

    pub fn attack(&self) -> f32 {
        self.attack
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    pub fn release_time(&self) -> f32 {
        self.release
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_idle(&self) -> bool {
        self.stage == Stage::Idle
    }

    /// Restarts the attack from the current value, so there is no jump.
    pub fn reset_soft(&mut self) {
        self.stage = Stage::Attack;
    }

    pub fn release(&mut self) {
        if self.stage == Stage::Idle {
            return;
        }
        if self.value <= 0.0 {
            self.finish();
            return;
        }
        self.release_step = self.value / self.samples(self.release);
        self.stage = Stage::Release;
    }

    /// Drops straight to idle at zero.
    pub fn finish(&mut self) {
        self.stage = Stage::Idle;
        self.value = 0.0;
        self.release_step = 0.0;
    }

    /// Advances one sample and returns the new value.
    pub fn next(&mut self) -> f32 {
        match self.stage {
            Stage::Idle => {}
            Stage::Attack => {
                self.value += 1.0 / self.samples(self.attack);
                if self.value >= 1.0 {
                    self.value = 1.0;
                    self.stage = Stage::Decay;
                }
            }
            Stage::Decay => {
                self.value -= (1.0 - self.sustain) / self.samples(self.decay);
                if self.value <= self.sustain {
                    self.value = self.sustain;
                    self.stage = Stage::Sustain;
                }
            }
            Stage::Sustain => self.value = self.sustain,
            Stage::Release => {
                self.value -= self.release_step;
                if self.value <= 0.0 {
                    self.finish();
                }
            }
        }
        self.value
    }

    fn samples(&self, seconds: f32) -> f32 {
        (seconds * self.sample_rate).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn run_while(env: &mut EnvelopeGenerator, stage: Stage) -> usize {
        let mut count = 0;
        while env.stage() == stage && count < 100_000 {
            env.next();
            count += 1;
        }
        count
    }

    #[test]
    fn runs_through_every_stage() {
        let mut env = EnvelopeGenerator::new(1000.0);
        env.set_params(0.01, 0.01, 0.5, 0.01);
        env.reset_soft();
        let attack_samples = run_while(&mut env, Stage::Attack);
        assert!((10..=11).contains(&attack_samples));
        assert_eq!(env.value(), 1.0);

        let decay_samples = run_while(&mut env, Stage::Decay);
        assert!((10..=11).contains(&decay_samples));
        assert_abs_diff_eq!(env.value(), 0.5, epsilon = 1e-6);
        assert_eq!(env.stage(), Stage::Sustain);

        env.release();
        let release_samples = run_while(&mut env, Stage::Release);
        assert!((10..=11).contains(&release_samples));
        assert!(env.is_idle());
        assert_eq!(env.value(), 0.0);
    }

    #[test]
    fn soft_reset_continues_from_current_value() {
        let mut env = EnvelopeGenerator::new(1000.0);
        env.set_params(0.1, 0.0, 1.0, 0.1);
        env.reset_soft();
        for _ in 0..50 {
            env.next();
        }
        let before = env.value();
        env.reset_soft();
        let after = env.next();
        assert!(after > before);
        assert!(after - before < 0.02);
    }

    #[test]
    fn zero_length_segments_complete_in_one_sample() {
        let mut env = EnvelopeGenerator::new(48000.0);
        env.set_params(0.0, 0.0, 0.25, 0.0);
        env.reset_soft();
        assert_eq!(env.next(), 1.0);
        assert_eq!(env.next(), 0.25);
        env.release();
        assert_eq!(env.next(), 0.0);
        assert!(env.is_idle());
    }

    #[test]
    fn release_from_idle_is_a_no_op() {
        let mut env = EnvelopeGenerator::new(48000.0);
        env.release();
        assert!(env.is_idle());
        assert_eq!(env.next(), 0.0);
    }
}
