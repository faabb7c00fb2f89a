//! Worker thread loop.
//!
//! A worker owns its own palette cache, announces itself with `Ready`, then
//! serves `MainToWorker` messages until `Terminate` arrives or the engine
//! drops its sender. Every `Render` gets exactly one terminal reply.

use crate::palette::{PaletteCache, DEFAULT_CACHE_CAPACITY, DEFAULT_PALETTE_STEPS};
use crate::tile_render::{render_tile, TileOutput};
use crossbeam_channel::{Receiver, Sender};
use fractalforge_core::{
    FractalKind, FractalParameters, MainToWorker, RenderRegion, Resolution, TaskId, WorkerToMain,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Rows between `Progress` messages.
    pub progress_row_interval: u32,
    pub palette_steps: usize,
    pub palette_cache_capacity: usize,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            progress_row_interval: 10,
            palette_steps: DEFAULT_PALETTE_STEPS,
            palette_cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Run the worker loop on the current thread.
pub fn run_worker(
    worker: usize,
    inbox: Receiver<MainToWorker>,
    outbox: Sender<WorkerToMain>,
    settings: WorkerSettings,
) {
    let mut palettes = PaletteCache::new(settings.palette_cache_capacity);

    if outbox.send(WorkerToMain::Ready { worker }).is_err() {
        return;
    }

    for message in inbox.iter() {
        match message {
            MainToWorker::Render {
                id,
                fractal_kind,
                parameters,
                full_width,
                full_height,
                tile_x,
                tile_y,
                tile_width,
                tile_height,
                palette_name,
            } => {
                let task = RenderTask {
                    id,
                    kind: fractal_kind,
                    parameters: &parameters,
                    resolution: Resolution::new(full_width, full_height),
                    region: RenderRegion::new(tile_x, tile_y, tile_width, tile_height),
                    palette_name: &palette_name,
                };
                let reply = task.run(&mut palettes, &outbox, &settings);
                if outbox.send(reply).is_err() {
                    break;
                }
            }
            MainToWorker::ClearPalettes => {
                log::debug!("worker {worker}: clearing {} palettes", palettes.len());
                palettes.clear();
            }
            MainToWorker::Terminate => break,
        }
    }

    log::debug!("worker {worker}: exiting");
}

struct RenderTask<'a> {
    id: TaskId,
    kind: FractalKind,
    parameters: &'a FractalParameters,
    resolution: Resolution,
    region: RenderRegion,
    palette_name: &'a str,
}

impl RenderTask<'_> {
    /// Render the tile and build the terminal reply.
    fn run(
        &self,
        palettes: &mut PaletteCache,
        outbox: &Sender<WorkerToMain>,
        settings: &WorkerSettings,
    ) -> WorkerToMain {
        let start = Instant::now();

        let result = catch_unwind(AssertUnwindSafe(|| self.render(palettes, outbox, settings)))
            .unwrap_or_else(|_| Err("worker panicked while rendering".to_string()));

        match result {
            Ok(output) => {
                let elapsed_time_ms = start.elapsed().as_secs_f64() * 1000.0;
                log::debug!(
                    "task {}: {}x{} tile at ({}, {}) in {elapsed_time_ms:.2}ms",
                    self.id,
                    self.region.width,
                    self.region.height,
                    self.region.x,
                    self.region.y,
                );
                WorkerToMain::Complete {
                    id: self.id,
                    pixels: output.pixels,
                    iteration_matrix: output.iterations,
                    elapsed_time_ms,
                    tile_x: self.region.x,
                    tile_y: self.region.y,
                    tile_width: self.region.width,
                    tile_height: self.region.height,
                }
            }
            Err(reason) => {
                log::warn!("task {} failed: {reason}", self.id);
                WorkerToMain::Error {
                    id: self.id,
                    reason,
                }
            }
        }
    }

    fn render(
        &self,
        palettes: &mut PaletteCache,
        outbox: &Sender<WorkerToMain>,
        settings: &WorkerSettings,
    ) -> Result<TileOutput, String> {
        if self.parameters.kind() != self.kind {
            return Err(format!(
                "fractal kind {} does not match {} parameters",
                self.kind,
                self.parameters.kind()
            ));
        }
        self.parameters.validate().map_err(|e| e.to_string())?;
        if !self.region.fits_within(self.resolution) {
            return Err(format!(
                "tile {:?} lies outside {}x{}",
                self.region, self.resolution.width, self.resolution.height
            ));
        }

        let palette = palettes
            .get(self.palette_name, settings.palette_steps, self.parameters.root_count())
            .map_err(|e| e.to_string())?;

        let id = self.id;
        Ok(render_tile(
            self.parameters,
            self.resolution,
            self.region,
            &palette,
            settings.progress_row_interval,
            |progress| {
                log::trace!("task {id}: {:.0}%", progress * 100.0);
                // A closed outbox surfaces when the terminal reply is sent.
                let _ = outbox.send(WorkerToMain::Progress { id, progress });
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use fractalforge_core::{config_for, IterationMatrix, ViewParameters};
    use std::thread;

    fn spawn() -> (Sender<MainToWorker>, Receiver<WorkerToMain>, thread::JoinHandle<()>) {
        let (to_worker, inbox) = unbounded();
        let (outbox, from_worker) = unbounded();
        let handle = thread::spawn(move || run_worker(3, inbox, outbox, WorkerSettings::default()));
        (to_worker, from_worker, handle)
    }

    fn terminal(rx: &Receiver<WorkerToMain>) -> WorkerToMain {
        loop {
            let message = rx.recv().unwrap();
            if message.is_terminal() {
                return message;
            }
        }
    }

    #[test]
    fn announces_ready_then_terminates() {
        let (tx, rx, handle) = spawn();
        assert_eq!(rx.recv().unwrap(), WorkerToMain::Ready { worker: 3 });
        tx.send(MainToWorker::Terminate).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn exits_when_sender_is_dropped() {
        let (tx, _rx, handle) = spawn();
        drop(tx);
        handle.join().unwrap();
    }

    #[test]
    fn renders_a_tile_with_progress() {
        let (tx, rx, handle) = spawn();
        rx.recv().unwrap();

        let params = config_for(FractalKind::Mandelbrot).default_parameters();
        let tile = RenderRegion::new(0, 0, 16, 25);
        tx.send(MainToWorker::render(7, params, Resolution::new(64, 64), tile, "mandelbrot"))
            .unwrap();

        let mut progress = Vec::new();
        let complete = loop {
            match rx.recv().unwrap() {
                WorkerToMain::Progress { id, progress: p } => {
                    assert_eq!(id, 7);
                    progress.push(p);
                }
                other => break other,
            }
        };
        assert_eq!(progress.len(), 2);

        match complete {
            WorkerToMain::Complete {
                id,
                pixels,
                iteration_matrix,
                tile_width,
                tile_height,
                ..
            } => {
                assert_eq!(id, 7);
                assert_eq!((tile_width, tile_height), (16, 25));
                assert_eq!(pixels.len(), 16 * 25 * 4);
                assert_eq!(iteration_matrix.len(), 16 * 25);
            }
            other => panic!("expected complete, got {other:?}"),
        }

        tx.send(MainToWorker::Terminate).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn unknown_palette_is_an_error_reply() {
        let (tx, rx, _handle) = spawn();
        rx.recv().unwrap();

        let params = config_for(FractalKind::Julia).default_parameters();
        tx.send(MainToWorker::render(1, params, Resolution::new(8, 8), RenderRegion::new(0, 0, 8, 8), "plasma"))
            .unwrap();

        match terminal(&rx) {
            WorkerToMain::Error { id, reason } => {
                assert_eq!(id, 1);
                assert!(reason.contains("plasma"));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_parameters_are_an_error_reply() {
        let (tx, rx, _handle) = spawn();
        rx.recv().unwrap();

        let params = FractalParameters::newton(ViewParameters::new(0.0, 0.0, 1.0, 50, 4.0), 1e-6, vec![]);
        tx.send(MainToWorker::render(2, params, Resolution::new(8, 8), RenderRegion::new(0, 0, 8, 8), "newton"))
            .unwrap();

        assert!(matches!(terminal(&rx), WorkerToMain::Error { id: 2, .. }));
    }

    #[test]
    fn tile_outside_image_is_an_error_reply() {
        let (tx, rx, _handle) = spawn();
        rx.recv().unwrap();

        let params = config_for(FractalKind::Mandelbrot).default_parameters();
        tx.send(MainToWorker::render(4, params, Resolution::new(8, 8), RenderRegion::new(4, 4, 8, 8), "hot"))
            .unwrap();

        assert!(matches!(terminal(&rx), WorkerToMain::Error { id: 4, .. }));
    }

    #[test]
    fn worker_output_matches_direct_render() {
        let (tx, rx, _handle) = spawn();
        rx.recv().unwrap();

        let params = config_for(FractalKind::Newton).default_parameters();
        let resolution = Resolution::new(24, 24);
        let tile = RenderRegion::new(8, 8, 8, 8);
        tx.send(MainToWorker::render(5, params.clone(), resolution, tile, "newton"))
            .unwrap();

        let palette = crate::Palette::generate("newton", DEFAULT_PALETTE_STEPS, params.root_count()).unwrap();
        let direct = render_tile(&params, resolution, tile, &palette, 0, |_| {});

        match terminal(&rx) {
            WorkerToMain::Complete {
                pixels,
                iteration_matrix,
                ..
            } => {
                assert_eq!(pixels, direct.pixels);
                let expected: IterationMatrix = direct.iterations;
                assert_eq!(iteration_matrix, expected);
            }
            other => panic!("expected complete, got {other:?}"),
        }
    }
}
