//! Decodes picked photos on a worker thread so the window stays responsive.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, mpsc::Sender},
    thread,
};

use egui::ColorImage;
use image::DynamicImage;

use crate::classify::{
    Notifier,
    pixels::{self, ImageLoadError},
};
use crate::egui_app::state::PREVIEW_MAX_EDGE;

pub(super) struct PhotoLoadJob {
    pub generation: u64,
    pub path: PathBuf,
}

pub(super) struct PhotoLoadOutcome {
    pub image: Arc<DynamicImage>,
    pub preview: ColorImage,
}

pub(super) struct PhotoLoadResult {
    pub generation: u64,
    pub path: PathBuf,
    pub result: Result<PhotoLoadOutcome, ImageLoadError>,
}

/// Decode `job.path` on its own thread and post the result to `tx`.
pub(super) fn spawn_photo_load(
    job: PhotoLoadJob,
    tx: Sender<PhotoLoadResult>,
    notifier: Option<Notifier>,
) -> std::io::Result<()> {
    thread::Builder::new()
        .name(format!("photo-load-{}", job.generation))
        .spawn(move || {
            let result = load_photo(&job.path);
            let _ = tx.send(PhotoLoadResult {
                generation: job.generation,
                path: job.path,
                result,
            });
            if let Some(notify) = notifier {
                notify();
            }
        })
        .map(|_| ())
}

fn load_photo(path: &Path) -> Result<PhotoLoadOutcome, ImageLoadError> {
    let image = pixels::load_image(path)?;
    let preview = preview_image(&image);
    Ok(PhotoLoadOutcome {
        image: Arc::new(image),
        preview,
    })
}

/// RGBA copy of `image` for display, no larger than [`PREVIEW_MAX_EDGE`].
pub(super) fn preview_image(image: &DynamicImage) -> ColorImage {
    let rgba = if image.width() > PREVIEW_MAX_EDGE || image.height() > PREVIEW_MAX_EDGE {
        image.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE).to_rgba8()
    } else {
        image.to_rgba8()
    };
    let size = [rgba.width() as usize, rgba.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, rgba.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::time::Duration;

    #[test]
    fn preview_keeps_small_photos_at_full_size() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(30, 20, Rgb([1, 2, 3])));
        assert_eq!(preview_image(&image).size, [30, 20]);
    }

    #[test]
    fn loader_posts_decode_failure_with_its_generation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, b"not a png").unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        spawn_photo_load(
            PhotoLoadJob {
                generation: 7,
                path: path.clone(),
            },
            tx,
            None,
        )
        .unwrap();
        let loaded = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(loaded.generation, 7);
        assert_eq!(loaded.path, path);
        assert!(loaded.result.is_err());
    }
}
