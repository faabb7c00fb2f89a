//! Single-thread fallback. Renders the whole image on the calling task,
//! yielding to the executor between row batches.

use crate::progress::RenderProgress;
use fractalforge_compute::{Palette, RegionRenderer, TileOutput};
use fractalforge_core::{FractalParameters, Resolution};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

pub(crate) async fn render(
    params: &FractalParameters,
    resolution: Resolution,
    palette: &Palette,
    yield_rows: u32,
    on_progress: &(dyn Fn(f32) + Send + Sync),
) -> TileOutput {
    let renderer = RegionRenderer::new(params, resolution, resolution.full_region(), palette);
    let mut output = renderer.blank_output();

    let batch = yield_rows.max(1);
    let mut progress = RenderProgress::new(resolution.height.div_ceil(batch));
    let start = Instant::now();

    for row in 0..resolution.height {
        renderer.render_row(row, &mut output);

        let done = row + 1;
        if done % batch == 0 || done == resolution.height {
            progress.complete_step(start.elapsed().as_secs_f64() * 1000.0);
            on_progress(progress.fraction());
            if !progress.is_complete {
                YieldNow::default().await;
            }
        }
    }

    output
}

/// Returns `Pending` once after waking itself, handing the thread back to
/// the executor.
#[derive(Default)]
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
