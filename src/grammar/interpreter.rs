//! Explicit-stack evaluation of a [`Grammar`].

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::geom::{ShapeInstance, Transform};

use super::{ENTRY_RULE, Grammar, GrammarResult, RuleVariant, StatementKind};

/// Instances between two progress notifications.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationOptions {
    pub seed: u64,
    /// Notify the progress observer whenever this many more instances have
    /// been produced. Zero disables notifications.
    pub progress_interval: usize,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl EvaluationOptions {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

/// Counters collected during one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationStats {
    pub frames_processed: usize,
    /// Frames discarded because the stack had reached the grammar's
    /// `max_depth`, or because their lineage had already been restarted by
    /// successors `max_depth` times.
    pub frames_dropped: usize,
    /// Frames that reached their depth limit, with or without a successor.
    pub frames_exhausted: usize,
    pub peak_stack: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub instances: Vec<ShapeInstance>,
    pub stats: EvaluationStats,
}

struct Frame<'g> {
    variant: &'g RuleVariant,
    depth: usize,
    /// Successor restarts along this frame's lineage.
    restarts: usize,
    transform: Transform,
}

/// One evaluation run: owns its generator, frame stack and output.
pub struct Interpreter<'g> {
    grammar: &'g Grammar,
    options: EvaluationOptions,
    observer: Option<Box<dyn FnMut(usize) + 'g>>,
}

impl<'g> Interpreter<'g> {
    #[must_use]
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_options(grammar, EvaluationOptions::default())
    }

    #[must_use]
    pub fn with_options(grammar: &'g Grammar, options: EvaluationOptions) -> Self {
        Self {
            grammar,
            options,
            observer: None,
        }
    }

    /// Called with the current instance count every `progress_interval`
    /// instances. Purely observational.
    #[must_use]
    pub fn on_progress(mut self, observer: impl FnMut(usize) + 'g) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn run(mut self) -> GrammarResult<Evaluation> {
        let grammar = self.grammar;
        let max_depth = grammar.max_depth();
        let mut rng = StdRng::seed_from_u64(self.options.seed);
        let mut stats = EvaluationStats::default();
        let mut instances = Vec::new();
        let mut reported = 0usize;

        log::debug!("evaluating grammar with seed {}", self.options.seed);

        let entry = grammar.pick(ENTRY_RULE, &mut rng)?;
        let mut stack = vec![Frame {
            variant: entry,
            depth: 0,
            restarts: 0,
            transform: Transform::identity(),
        }];

        while let Some(frame) = stack.pop() {
            stats.frames_processed += 1;
            self.report_progress(instances.len(), &mut reported);

            if stack.len() >= max_depth || frame.restarts >= max_depth {
                stats.frames_dropped += 1;
                continue;
            }

            let Frame {
                variant,
                depth,
                restarts,
                mut transform,
            } = frame;

            let limit = variant.max_depth.unwrap_or(max_depth);
            if depth >= limit {
                stats.frames_exhausted += 1;
                if let Some(successor) = &variant.successor {
                    stack.push(Frame {
                        variant: grammar.pick(successor, &mut rng)?,
                        depth: 0,
                        restarts: restarts + 1,
                        transform,
                    });
                }
                continue;
            }

            for statement in &variant.statements {
                for _ in 0..statement.count {
                    transform *= statement.transform;
                    match &statement.kind {
                        StatementKind::Call { rule } => stack.push(Frame {
                            variant: grammar.pick(rule, &mut rng)?,
                            depth: depth + 1,
                            restarts,
                            transform,
                        }),
                        StatementKind::Instance { shape } => {
                            instances.push(ShapeInstance::new(shape.clone(), transform));
                        }
                    }
                }
            }
            stats.peak_stack = stats.peak_stack.max(stack.len());
        }

        log::debug!(
            "generated {} shapes ({} frames, {} dropped)",
            instances.len(),
            stats.frames_processed,
            stats.frames_dropped
        );

        Ok(Evaluation { instances, stats })
    }

    fn report_progress(&mut self, produced: usize, reported: &mut usize) {
        let interval = self.options.progress_interval;
        if interval == 0 || produced < *reported + interval {
            return;
        }
        *reported = produced;
        log::debug!("{produced} shapes so far");
        if let Some(observer) = self.observer.as_mut() {
            observer(produced);
        }
    }
}

/// Evaluate `grammar` from its `entry` rule with the default options and
/// the given seed.
pub fn evaluate(grammar: &Grammar, seed: u64) -> GrammarResult<Vec<ShapeInstance>> {
    let evaluation = Interpreter::with_options(grammar, EvaluationOptions::with_seed(seed)).run()?;
    Ok(evaluation.instances)
}
