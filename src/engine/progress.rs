//! Progress counter on stderr for `-p`. The total is never known up front, so it is a plain counter.

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

pub type ProgressBar = Arc<Mutex<Bar>>;

/// Callback fed with the number of results received since the last call.
pub type OnReceived = Box<dyn Fn(usize) + Send>;

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " files"
    )))
}

/// Force a refresh of the bar (e.g. so counter shows "0 files" immediately).
pub fn refresh_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.refresh();
    }
}

/// Uses try_lock so a contended bar skips the update instead of stalling the sink.
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Final refresh, then move stderr past the counter line.
pub fn finish_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.lock() {
        let _ = bar.refresh();
    }
    eprintln!();
}

/// Bar for `-p`, or None. The counter is drawn at zero right away.
pub fn setup_progress(enabled: bool) -> Option<ProgressBar> {
    enabled.then(|| {
        let bar = create_counter("Listing");
        refresh_bar(&bar);
        bar
    })
}

/// Create a progress callback function that updates the progress bar.
pub fn progress_callback(bar: &Option<ProgressBar>) -> Option<OnReceived> {
    bar.as_ref().map(|bar| {
        let bar = Arc::clone(bar);
        Box::new(move |n: usize| update_progress_bar(&bar, n)) as OnReceived
    })
}
