/// Progress of one render.
///
/// Steps are tiles for the worker pool and row batches for the
/// single-thread backend. `completed_steps` only ever increases.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderProgress {
    pub completed_steps: u32,
    pub total_steps: u32,
    pub elapsed_ms: f64,
    pub is_complete: bool,
}

impl RenderProgress {
    pub fn new(total_steps: u32) -> Self {
        Self {
            completed_steps: 0,
            total_steps,
            elapsed_ms: 0.0,
            is_complete: total_steps == 0,
        }
    }

    /// Record one finished step.
    pub fn complete_step(&mut self, elapsed_ms: f64) {
        self.completed_steps = (self.completed_steps + 1).min(self.total_steps);
        self.elapsed_ms = elapsed_ms;
        self.is_complete = self.completed_steps == self.total_steps;
    }

    /// Completed fraction in [0, 1]. An empty render counts as done.
    pub fn fraction(&self) -> f32 {
        if self.total_steps == 0 {
            1.0
        } else {
            self.completed_steps as f32 / self.total_steps as f32
        }
    }
}
