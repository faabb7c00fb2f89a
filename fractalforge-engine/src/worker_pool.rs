//! Pool of native worker threads speaking the `MainToWorker` /
//! `WorkerToMain` protocol.
//!
//! Each worker owns an inbox. All workers share one outbox, drained by a
//! router thread that forwards every reply to the render that owns its
//! correlation id. A render registers its ids before sending any message,
//! so a reply can never arrive for an id the router does not know.

use crate::error::RenderError;
use crate::lock;
use crossbeam_channel::{select, Receiver, Sender};
use fractalforge_compute::{run_worker, WorkerSettings};
use fractalforge_core::{
    FractalParameters, IterationMatrix, MainToWorker, RenderRegion, Resolution, TaskId,
    WorkerToMain,
};
use futures::StreamExt;
use futures_channel::mpsc::{unbounded, UnboundedSender};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const THREAD_NAME_PREFIX: &str = "fractalforge-worker";

struct PendingTile {
    worker: usize,
    replies: UnboundedSender<WorkerToMain>,
}

type PendingMap = Arc<Mutex<HashMap<TaskId, PendingTile>>>;

/// Reports a worker's exit to the router when its thread ends, whether the
/// worker returned or panicked.
struct ExitNotice {
    worker: usize,
    exit: Sender<usize>,
}

impl Drop for ExitNotice {
    fn drop(&mut self) {
        let _ = self.exit.send(self.worker);
    }
}

/// Composited output of one tiled render.
#[derive(Debug)]
pub struct TiledImage {
    pub pixels: Vec<u8>,
    pub iterations: IterationMatrix,
}

pub struct WorkerPool {
    senders: Mutex<Vec<Sender<MainToWorker>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    router: Mutex<Option<JoinHandle<()>>>,
    pending: PendingMap,
    next_id: AtomicU64,
}

impl WorkerPool {
    /// Spawn up to `size` workers and wait for their `Ready` messages.
    ///
    /// Blocks for at most `ready_timeout`. Workers that have not answered by
    /// then are admitted anyway; workers whose thread could not be spawned
    /// are left out.
    pub fn spawn(size: usize, settings: WorkerSettings, ready_timeout: Duration) -> Self {
        Self::spawn_with(size, ready_timeout, move |worker, inbox, outbox| {
            run_worker(worker, inbox, outbox, settings)
        })
    }

    fn spawn_with<F>(size: usize, ready_timeout: Duration, body: F) -> Self
    where
        F: Fn(usize, Receiver<MainToWorker>, Sender<WorkerToMain>) + Clone + Send + 'static,
    {
        let (outbox_tx, outbox_rx) = crossbeam_channel::unbounded::<WorkerToMain>();
        let (exit_tx, exit_rx) = crossbeam_channel::unbounded::<usize>();
        let (ready_tx, ready_rx) = crossbeam_channel::unbounded::<usize>();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let router = {
            let pending = Arc::clone(&pending);
            thread::Builder::new()
                .name(format!("{THREAD_NAME_PREFIX}-router"))
                .spawn(move || route_replies(outbox_rx, exit_rx, ready_tx, pending))
        };
        let router = match router {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("Failed to spawn reply router, worker pool disabled: {e}");
                return Self::empty(pending);
            }
        };

        let mut senders = Vec::with_capacity(size);
        let mut handles = Vec::with_capacity(size);

        for _ in 0..size {
            let worker = senders.len();
            let (inbox_tx, inbox_rx) = crossbeam_channel::unbounded();
            let outbox = outbox_tx.clone();
            let exit = exit_tx.clone();
            let body = body.clone();

            let spawned = thread::Builder::new()
                .name(format!("{THREAD_NAME_PREFIX}-{worker}"))
                .spawn(move || {
                    let _notice = ExitNotice { worker, exit };
                    body(worker, inbox_rx, outbox);
                });

            match spawned {
                Ok(handle) => {
                    senders.push(inbox_tx);
                    handles.push(handle);
                }
                Err(e) => log::warn!("Failed to spawn worker thread: {e}"),
            }
        }
        drop(outbox_tx);
        drop(exit_tx);

        let deadline = Instant::now() + ready_timeout;
        let mut ready = 0;
        while ready < handles.len() {
            if ready_rx.recv_deadline(deadline).is_err() {
                break;
            }
            ready += 1;
        }
        if ready < handles.len() {
            log::warn!(
                "{} of {} workers not ready after {:?}, admitting them anyway",
                handles.len() - ready,
                handles.len(),
                ready_timeout
            );
        }

        log::info!("Worker pool started with {} workers", senders.len());

        Self {
            senders: Mutex::new(senders),
            handles: Mutex::new(handles),
            router: Mutex::new(router),
            pending,
            next_id: AtomicU64::new(1),
        }
    }

    fn empty(pending: PendingMap) -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
            handles: Mutex::new(Vec::new()),
            router: Mutex::new(None),
            pending,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn worker_count(&self) -> usize {
        lock(&self.senders).len()
    }

    /// Tell every worker to drop its palette cache.
    pub fn broadcast_clear_palettes(&self) {
        for sender in lock(&self.senders).iter() {
            let _ = sender.send(MainToWorker::ClearPalettes);
        }
    }

    /// Render `tiles` of a `resolution` image and composite the results.
    ///
    /// Tile `i` goes to worker `i % worker_count`. `on_progress` receives
    /// `completed / total` after each tile lands. The first failed tile
    /// fails the whole render.
    pub async fn render(
        &self,
        params: &FractalParameters,
        palette_name: &str,
        resolution: Resolution,
        tiles: &[RenderRegion],
        on_progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<TiledImage, RenderError> {
        let senders = lock(&self.senders).clone();
        if senders.is_empty() {
            return Err(RenderError::WorkerDisconnected);
        }

        let (replies_tx, mut replies) = unbounded();
        let mut batch = BatchGuard {
            pending: Arc::clone(&self.pending),
            ids: Vec::with_capacity(tiles.len()),
        };
        let mut tile_of = HashMap::with_capacity(tiles.len());

        for (i, &tile) in tiles.iter().enumerate() {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let worker = i % senders.len();

            lock(&self.pending).insert(
                id,
                PendingTile {
                    worker,
                    replies: replies_tx.clone(),
                },
            );
            batch.ids.push(id);
            tile_of.insert(id, tile);

            let message = MainToWorker::render(id, params.clone(), resolution, tile, palette_name);
            if senders[worker].send(message).is_err() {
                return Err(RenderError::WorkerDisconnected);
            }
        }
        drop(replies_tx);

        let mut image = TiledImage {
            pixels: vec![0; resolution.pixel_count() * 4],
            iterations: IterationMatrix::new(resolution.width, resolution.height),
        };
        let mut completed = 0;

        while completed < tiles.len() {
            let Some(reply) = replies.next().await else {
                return Err(RenderError::WorkerDisconnected);
            };

            match reply {
                WorkerToMain::Complete {
                    id,
                    pixels,
                    iteration_matrix,
                    elapsed_time_ms,
                    ..
                } => {
                    let Some(&tile) = tile_of.get(&id) else {
                        continue;
                    };
                    composite(&mut image, resolution, tile, &pixels, &iteration_matrix)?;
                    completed += 1;
                    log::debug!("Tile {tile:?} done in {elapsed_time_ms:.1}ms");
                    on_progress(completed as f32 / tiles.len() as f32);
                }
                WorkerToMain::Error { id, reason } => {
                    let tile = tile_of
                        .get(&id)
                        .copied()
                        .unwrap_or_else(|| resolution.full_region());
                    return Err(RenderError::TileFailure { tile, reason });
                }
                WorkerToMain::Progress { id, progress } => {
                    log::trace!("Task {id} at {:.0}%", progress * 100.0);
                }
                WorkerToMain::Ready { .. } => {}
            }
        }

        Ok(image)
    }

    /// Terminate and join every worker, then the router. Idempotent.
    pub fn shutdown(&self) {
        let senders = std::mem::take(&mut *lock(&self.senders));
        if senders.is_empty() && lock(&self.router).is_none() {
            return;
        }
        for sender in &senders {
            let _ = sender.send(MainToWorker::Terminate);
        }
        drop(senders);

        for handle in std::mem::take(&mut *lock(&self.handles)) {
            if handle.join().is_err() {
                log::warn!("Worker thread panicked during shutdown");
            }
        }
        if let Some(router) = lock(&self.router).take() {
            if router.join().is_err() {
                log::warn!("Reply router panicked during shutdown");
            }
        }
        log::info!("Worker pool shut down");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Removes a batch's ids from the routing table when its render ends,
/// however it ends.
struct BatchGuard {
    pending: PendingMap,
    ids: Vec<TaskId>,
}

impl Drop for BatchGuard {
    fn drop(&mut self) {
        let mut pending = lock(&self.pending);
        for id in &self.ids {
            pending.remove(id);
        }
    }
}

fn composite(
    image: &mut TiledImage,
    resolution: Resolution,
    tile: RenderRegion,
    pixels: &[u8],
    iterations: &IterationMatrix,
) -> Result<(), RenderError> {
    if pixels.len() != tile.area() * 4
        || iterations.width() != tile.width
        || iterations.height() != tile.height
        || !tile.fits_within(resolution)
    {
        return Err(RenderError::TileFailure {
            tile,
            reason: "reply does not match the tile size".to_string(),
        });
    }

    let row_bytes = tile.width as usize * 4;
    for (row, src) in pixels.chunks_exact(row_bytes.max(1)).enumerate() {
        let y = tile.y as usize + row;
        let start = (y * resolution.width as usize + tile.x as usize) * 4;
        image.pixels[start..start + row_bytes].copy_from_slice(src);
    }
    image.iterations.copy_region_from(iterations, tile);
    Ok(())
}

fn route_replies(
    outbox: Receiver<WorkerToMain>,
    exits: Receiver<usize>,
    ready: Sender<usize>,
    pending: PendingMap,
) {
    loop {
        select! {
            recv(outbox) -> reply => match reply {
                Ok(WorkerToMain::Ready { worker }) => {
                    let _ = ready.send(worker);
                }
                Ok(reply) => forward(&pending, reply),
                Err(_) => break,
            },
            recv(exits) -> worker => match worker {
                Ok(worker) => fail_worker(&pending, worker),
                Err(_) => {
                    // every worker thread has finished
                    for reply in outbox.try_iter() {
                        forward(&pending, reply);
                    }
                    break;
                }
            },
        }
    }

    lock(&pending).clear();
}

fn forward(pending: &PendingMap, reply: WorkerToMain) {
    let Some(id) = reply.task_id() else {
        return;
    };
    let mut pending = lock(pending);
    let target = if reply.is_terminal() {
        pending.remove(&id).map(|p| p.replies)
    } else {
        pending.get(&id).map(|p| p.replies.clone())
    };
    drop(pending);

    if let Some(replies) = target {
        let _ = replies.unbounded_send(reply);
    }
}

/// Fail every task still owned by a worker whose thread has exited.
fn fail_worker(pending: &PendingMap, worker: usize) {
    let mut pending = lock(pending);
    let orphaned: Vec<TaskId> = pending
        .iter()
        .filter(|(_, p)| p.worker == worker)
        .map(|(&id, _)| id)
        .collect();

    for id in orphaned {
        if let Some(tile) = pending.remove(&id) {
            log::warn!("Worker {worker} exited with task {id} pending");
            let _ = tile.replies.unbounded_send(WorkerToMain::Error {
                id,
                reason: format!("worker {worker} exited"),
            });
        }
    }
}
