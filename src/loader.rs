// Loads the source picture off the event loop and hands it over once.
// Visual: the window stays blank (inert) until the picture arrives.

use crate::error::Error;
use image::RgbaImage;
use log::{debug, warn};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Single-shot handoff of a decoded picture.
pub struct PendingImage {
    rx: Option<Receiver<Result<RgbaImage, Error>>>,
}

impl PendingImage {
    /// Already-decoded result (tests, hosts that decode themselves).
    pub fn ready(result: Result<RgbaImage, Error>) -> Self {
        let (tx, rx) = mpsc::channel();
        // The receiver is alive right here, so the send cannot fail
        let _ = tx.send(result);
        Self { rx: Some(rx) }
    }

    /// Take the result if it has arrived. Yields `Some` exactly once.
    pub fn try_take(&mut self) -> Option<Result<RgbaImage, Error>> {
        let rx = self.rx.as_ref()?;
        let out = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                Err(Error::ImageLoad("loader stopped before delivering".into()))
            }
        };
        self.rx = None;
        Some(out)
    }
}

/// Turns a `source` setting into a picture.
pub trait ImageLoader {
    fn load(&self, source: &str) -> PendingImage;
}

/// Decodes files (plain paths or `file://` URLs) on a worker thread with `image`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileImageLoader;

impl ImageLoader for FileImageLoader {
    fn load(&self, source: &str) -> PendingImage {
        let path = source.strip_prefix("file://").unwrap_or(source).to_string();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            debug!("decoding {path}");
            let result = image::open(&path)
                .map(|img| img.to_rgba8())
                .map_err(|e| Error::ImageLoad(format!("{path}: {e}")));
            if tx.send(result).is_err() {
                warn!("picture {path} decoded after its request was dropped");
            }
        });
        PendingImage { rx: Some(rx) }
    }
}
