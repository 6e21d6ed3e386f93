//! Saving drawings before they are cleared
//!
//! The kiosk saves the current drawing whenever a gesture clears the canvas
//! and once more when the app quits. Files land in a dedicated folder under
//! the pictures directory and are named after the local time of the save.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::config::ArchiveConfig;
use crate::error::Result;
use crate::monitor::{GestureEvent, GestureListener};

/// Host-side drawing canvas
pub trait DrawingSurface {
    /// Current drawing encoded as PNG, or `None` before the canvas has a bitmap
    fn snapshot_png(&self) -> Option<Vec<u8>>;

    /// Wipe the canvas back to blank
    fn clear(&mut self);
}

pub struct DrawingArchive {
    dir: PathBuf,
    file_name_format: String,
}

impl DrawingArchive {
    pub fn new(config: &ArchiveConfig) -> Self {
        Self {
            dir: config.drawings_dir(),
            file_name_format: config.file_name_format.clone(),
        }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Path a drawing saved at `time` is written to.
    pub fn path_for(&self, time: &DateTime<Local>) -> PathBuf {
        let stem = time.format(&self.file_name_format).to_string();
        self.dir.join(format!("{}.png", stem))
    }

    /// Write `png` to the archive, creating the folder on first use.
    pub fn save_at(&self, png: &[u8], time: &DateTime<Local>) -> Result<PathBuf> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let path = self.path_for(time);
        fs::write(&path, png)?;
        Ok(path)
    }

    pub fn save(&self, png: &[u8]) -> Result<PathBuf> {
        self.save_at(png, &Local::now())
    }

    /// Save whatever `surface` currently shows. Failures are logged, not
    /// returned: losing a drawing must never keep the canvas from clearing.
    pub fn save_surface<S: DrawingSurface + ?Sized>(&self, surface: &S) -> Option<PathBuf> {
        let Some(png) = surface.snapshot_png() else {
            log::error!("Cannot save drawing: canvas has no bitmap");
            return None;
        };

        match self.save(&png) {
            Ok(path) => {
                log::info!("Drawing saved to {}", path.display());
                Some(path)
            }
            Err(e) => {
                log::warn!("Cannot save drawing to {}: {}", self.dir.display(), e);
                None
            }
        }
    }
}

/// Gesture listener that archives the drawing and then clears the canvas
pub struct ClearAndArchive<S: DrawingSurface> {
    surface: S,
    archive: DrawingArchive,
    saved: Vec<PathBuf>,
}

impl<S: DrawingSurface> ClearAndArchive<S> {
    pub fn new(surface: S, archive: DrawingArchive) -> Self {
        Self {
            surface,
            archive,
            saved: Vec::new(),
        }
    }

    /// Persist the drawing one last time when the kiosk shuts down.
    pub fn save_on_quit(mut self) -> (S, Vec<PathBuf>) {
        if let Some(path) = self.archive.save_surface(&self.surface) {
            self.saved.push(path);
        }
        (self.surface, self.saved)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }
}

impl<S: DrawingSurface> GestureListener for ClearAndArchive<S> {
    fn on_gesture_detected(&mut self, event: &GestureEvent) {
        log::info!("Clearing the drawing (gesture #{})", event.sequence);
        if let Some(path) = self.archive.save_surface(&self.surface) {
            self.saved.push(path);
        }
        self.surface.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::Orientation;
    use chrono::TimeZone;

    struct FakeCanvas {
        strokes: Vec<u8>,
        has_bitmap: bool,
        clears: usize,
    }

    impl DrawingSurface for FakeCanvas {
        fn snapshot_png(&self) -> Option<Vec<u8>> {
            self.has_bitmap.then(|| self.strokes.clone())
        }

        fn clear(&mut self) {
            self.strokes.clear();
            self.clears += 1;
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "shakeclear-archive-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn event() -> GestureEvent {
        GestureEvent {
            sequence: 1,
            timestamp_ns: 0,
            orientation: Orientation::default(),
            far_distance: 1.3,
            near_distance: 0.1,
            duration_ns: 2_000_000_000,
            samples_scanned: 3,
        }
    }

    #[test]
    fn test_file_name_from_local_time() {
        let config = ArchiveConfig {
            directory: PathBuf::from("/pictures"),
            ..ArchiveConfig::default()
        };
        let archive = DrawingArchive::new(&config);
        let time = Local.with_ymd_and_hms(2018, 7, 14, 9, 5, 3).unwrap();
        assert_eq!(
            archive.path_for(&time),
            PathBuf::from("/pictures/DrawingForKids/20180714-090503.png")
        );
    }

    #[test]
    fn test_gesture_saves_then_clears() {
        let config = ArchiveConfig {
            directory: scratch_dir("clear"),
            ..ArchiveConfig::default()
        };
        let canvas = FakeCanvas {
            strokes: vec![1, 2, 3],
            has_bitmap: true,
            clears: 0,
        };
        let mut listener = ClearAndArchive::new(canvas, DrawingArchive::new(&config));

        listener.on_gesture_detected(&event());

        assert_eq!(listener.surface().clears, 1);
        assert!(listener.surface().strokes.is_empty());
        assert_eq!(listener.saved().len(), 1);
        assert_eq!(fs::read(&listener.saved()[0]).unwrap(), vec![1, 2, 3]);

        let _ = fs::remove_dir_all(&config.directory);
    }

    #[test]
    fn test_missing_bitmap_still_clears() {
        let config = ArchiveConfig {
            directory: scratch_dir("nobitmap"),
            ..ArchiveConfig::default()
        };
        let canvas = FakeCanvas {
            strokes: Vec::new(),
            has_bitmap: false,
            clears: 0,
        };
        let mut listener = ClearAndArchive::new(canvas, DrawingArchive::new(&config));

        listener.on_gesture_detected(&event());

        assert_eq!(listener.surface().clears, 1);
        assert!(listener.saved().is_empty());
        assert!(!config.drawings_dir().exists());
    }

    #[test]
    fn test_save_on_quit() {
        let config = ArchiveConfig {
            directory: scratch_dir("quit"),
            ..ArchiveConfig::default()
        };
        let canvas = FakeCanvas {
            strokes: vec![9],
            has_bitmap: true,
            clears: 0,
        };
        let listener = ClearAndArchive::new(canvas, DrawingArchive::new(&config));

        let (canvas, saved) = listener.save_on_quit();
        assert_eq!(canvas.clears, 0);
        assert_eq!(saved.len(), 1);
        assert!(saved[0].starts_with(config.drawings_dir()));

        let _ = fs::remove_dir_all(&config.directory);
    }
}
