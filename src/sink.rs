//! Result sink: drain the walk channel, streaming or sorted, and write presented lines.

use crossbeam_channel::Receiver;
use std::ffi::OsString;
use std::io::Write;

use crate::engine::progress::OnReceived;
use crate::error::FilesError;
use crate::present::Presenter;
use crate::utils::config::ProgressConsts;

/// Feeds the progress callback in batches of [`ProgressConsts::PROGRESS_UPDATE_BATCH_SIZE`].
pub struct BatchedProgress {
    on_received: Option<OnReceived>,
    pending: usize,
}

impl BatchedProgress {
    fn new(on_received: Option<OnReceived>) -> Self {
        Self {
            on_received,
            pending: 0,
        }
    }

    fn tick(&mut self) {
        if self.on_received.is_none() {
            return;
        }
        self.pending += 1;
        if self.pending >= ProgressConsts::PROGRESS_UPDATE_BATCH_SIZE {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.pending == 0 {
            return;
        }
        if let Some(cb) = &self.on_received {
            cb(self.pending);
        }
        self.pending = 0;
    }
}

/// Raw root-relative paths in output order. Ends when the walk closes the channel.
pub enum Drain {
    /// Yields each path as it arrives; order is arrival order.
    Streaming {
        rx: crossbeam_channel::IntoIter<OsString>,
        progress: BatchedProgress,
    },
    /// Everything, byte-wise ascending. Built only after the channel closed.
    Sorted(std::vec::IntoIter<OsString>),
}

impl Iterator for Drain {
    type Item = OsString;

    fn next(&mut self) -> Option<OsString> {
        match self {
            Drain::Streaming { rx, progress } => match rx.next() {
                Some(path) => {
                    progress.tick();
                    Some(path)
                }
                None => {
                    progress.flush();
                    None
                }
            },
            Drain::Sorted(paths) => paths.next(),
        }
    }
}

/// Turn the result channel into an iterator. In sorted mode this blocks until the walk is done.
pub fn drain(rx: Receiver<OsString>, sorted: bool, on_received: Option<OnReceived>) -> Drain {
    let mut progress = BatchedProgress::new(on_received);
    if !sorted {
        return Drain::Streaming {
            rx: rx.into_iter(),
            progress,
        };
    }
    let mut paths = Vec::new();
    for path in rx {
        progress.tick();
        paths.push(path);
    }
    progress.flush();
    // Byte-wise on Unix; WTF-8 order elsewhere.
    paths.sort_unstable();
    Drain::Sorted(paths.into_iter())
}

/// Present and write one line per path, name bytes as they are on disk.
/// Stops at the first write failure.
pub fn write_paths<I, W>(paths: I, presenter: &Presenter, out: &mut W) -> Result<usize, FilesError>
where
    I: IntoIterator<Item = OsString>,
    W: Write,
{
    let mut written = 0_usize;
    for rel in paths {
        let line = presenter.present(&rel);
        out.write_all(line.as_encoded_bytes())
            .map_err(FilesError::Output)?;
        out.write_all(b"\n").map_err(FilesError::Output)?;
        written += 1;
    }
    out.flush().map_err(FilesError::Output)?;
    Ok(written)
}
