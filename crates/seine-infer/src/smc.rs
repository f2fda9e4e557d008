//! Sequential importance resampling over a synchronized particle ensemble.

use seine_core::{
    logsumexp, multinomial_sample, Distribution, Erp, ErrorInfo, RngHandle, SeineError, Value,
};

use crate::engine::{Control, EngineCtx, Strategy};
use crate::marginal::MarginalBuilder;
use crate::step::{terminal, Computation, Cont, Resume, Step};

/// One in-flight execution of the user program.
///
/// Cloning a particle is the deep copy resampling requires: resumptions are
/// pure closures behind `Rc`, so a clone restarts from the same suspension
/// without sharing mutable state.
#[derive(Clone)]
struct Particle {
    resume: ParticleResume,
    log_weight: f64,
    value: Option<Value>,
}

#[derive(Clone)]
enum ParticleResume {
    /// The program entry has not been invoked for this particle yet.
    Start,
    /// Suspended at a factor barrier.
    Barrier(Resume),
    /// The execution exited.
    Done,
}

/// N interleaved copies of the user computation, advanced round-robin and
/// synchronized at each factor statement with residual resampling.
pub(crate) struct ParticleFilter {
    particles: Vec<Particle>,
    active: usize,
    program: Option<Computation>,
}

impl ParticleFilter {
    pub(crate) fn new(particles: usize) -> Result<Self, SeineError> {
        if particles == 0 {
            return Err(SeineError::DegenerateParameters(
                ErrorInfo::new(
                    "particles-zero",
                    "the particle filter requires at least one particle",
                )
                .in_strategy("particle-filter"),
            ));
        }
        Ok(Self {
            particles: vec![
                Particle {
                    resume: ParticleResume::Start,
                    log_weight: 0.0,
                    value: None,
                };
                particles
            ],
            active: 0,
            program: None,
        })
    }

    /// Resumes the active particle: enters the program for a fresh particle,
    /// or re-enters the continuation stored at its last barrier.
    fn resume_active(&self) -> Result<Step, SeineError> {
        let particle = &self.particles[self.active];
        match &particle.resume {
            ParticleResume::Start => {
                let program = self
                    .program
                    .as_ref()
                    .ok_or_else(|| desync_error("resumed before the filter was started", 0))?;
                Ok(program(terminal()))
            }
            ParticleResume::Barrier(resume) => Ok(resume()),
            ParticleResume::Done => Err(desync_error(
                "executions crossed different numbers of factor statements",
                self.active,
            )),
        }
    }

    fn is_last(&self) -> bool {
        self.active + 1 == self.particles.len()
    }

    /// Residual resampling (Liu 2001, section 3.4.4): retain deterministic
    /// integer multiples of each particle, fill the remainder by multinomial
    /// draws over the residual weights, then level every log-weight at the
    /// ensemble average so total mass is preserved.
    fn resample(&mut self, rng: &mut RngHandle) -> Result<(), SeineError> {
        let n = self.particles.len();
        let weights: Vec<f64> = self.particles.iter().map(|p| p.log_weight).collect();
        let total = logsumexp(&weights);
        if total == f64::NEG_INFINITY {
            return Err(SeineError::EmptyPosterior(
                ErrorInfo::new(
                    "all-particles-impossible",
                    "every particle scored minus infinity at a factor barrier",
                )
                .in_strategy("particle-filter")
                .with_detail("particles", n)
                .with_hint("check that the program's evidence is satisfiable"),
            ));
        }
        let log_n = (n as f64).ln();
        let mut residual = Vec::with_capacity(n);
        let mut next = Vec::with_capacity(n);
        for (index, &weight) in weights.iter().enumerate() {
            let expected = (log_n + weight - total).exp();
            let copies = expected.floor() as usize;
            residual.push(expected - copies as f64);
            for _ in 0..copies {
                next.push(self.particles[index].clone());
            }
        }
        while next.len() < n {
            let index = multinomial_sample(rng, &residual)?;
            next.push(self.particles[index].clone());
        }
        let leveled = total - log_n;
        for particle in &mut next {
            particle.log_weight = leveled;
        }
        debug_assert_eq!(next.len(), n);
        self.particles = next;
        Ok(())
    }
}

impl Strategy for ParticleFilter {
    fn name(&self) -> &'static str {
        "particle-filter"
    }

    fn start(
        &mut self,
        _ctx: &mut EngineCtx,
        program: &Computation,
    ) -> Result<Control, SeineError> {
        self.program = Some(program.clone());
        self.active = 0;
        Ok(Control::Resume(self.resume_active()?))
    }

    fn sample(
        &mut self,
        ctx: &mut EngineCtx,
        k: Cont,
        dist: Erp,
        params: Vec<Value>,
    ) -> Result<Control, SeineError> {
        // Prior sampling between factor barriers; weights move only at factor.
        let value = dist.sample(&params, &mut ctx.rng)?;
        Ok(Control::Resume(k(value)))
    }

    fn factor(
        &mut self,
        ctx: &mut EngineCtx,
        k: Resume,
        score: f64,
    ) -> Result<Control, SeineError> {
        {
            let particle = &mut self.particles[self.active];
            particle.log_weight += score;
            particle.resume = ParticleResume::Barrier(k);
        }
        if self.is_last() {
            self.resample(&mut ctx.rng)?;
            self.active = 0;
        } else {
            self.active += 1;
        }
        Ok(Control::Resume(self.resume_active()?))
    }

    fn exit(&mut self, _ctx: &mut EngineCtx, value: Value) -> Result<Control, SeineError> {
        {
            let particle = &mut self.particles[self.active];
            particle.value = Some(value);
            particle.resume = ParticleResume::Done;
        }
        if self.is_last() {
            // Resampling consumed the weights; values count once each.
            let mut builder = MarginalBuilder::new();
            for (index, particle) in self.particles.iter().enumerate() {
                match &particle.value {
                    Some(value) => builder.insert(value.clone(), 1.0),
                    None => {
                        return Err(desync_error(
                            "a particle never exited before the ensemble finished",
                            index,
                        ))
                    }
                }
            }
            Ok(Control::Done(builder.build()?))
        } else {
            self.active += 1;
            Ok(Control::Resume(self.resume_active()?))
        }
    }
}

fn desync_error(message: &str, particle: usize) -> SeineError {
    SeineError::Engine(
        ErrorInfo::new("particle-desync", message)
            .in_strategy("particle-filter")
            .with_detail("particle", particle)
            .with_hint("every execution path must pass the same factor statements"),
    )
}
