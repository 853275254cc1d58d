//! Frame-file projector output
//!
//! The projector output is driven by a fullscreen viewer that watches a
//! single SVG file. Each frame is written to a temporary file and renamed
//! over the watched one so the viewer never sees a partial frame.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::PathBuf;

use stratum_core::config::ProjectorGeometry;
use stratum_core::traits::Projector;
use tracing::{trace, warn};

use crate::media::SvgLayer;

pub struct FrameFileProjector {
    path: PathBuf,
    geometry: ProjectorGeometry,
}

impl FrameFileProjector {
    pub fn new(path: impl Into<PathBuf>, geometry: ProjectorGeometry) -> Self {
        Self {
            path: path.into(),
            geometry,
        }
    }

    /// Geometry from the job's settings file applies to the next frame
    pub fn set_geometry(&mut self, geometry: ProjectorGeometry) {
        self.geometry = geometry;
    }

    /// Full-resolution frame with the layer centred on black
    pub fn layer_frame(&self, layer: &SvgLayer) -> String {
        let (width, height) = self.size();
        let scale = self.geometry.pixels_per_mm();
        let dx = (f64::from(width) - layer.part_width_mm * scale) / 2.0;
        let dy = (f64::from(height) - layer.part_height_mm * scale) / 2.0;
        format!(
            "{}<g transform=\"translate({dx:.3} {dy:.3}) scale({scale:.6})\" style=\"fill:white\">{}</g>\n</svg>\n",
            self.frame_open(),
            layer.markup
        )
    }

    pub fn black_frame(&self) -> String {
        format!("{}</svg>\n", self.frame_open())
    }

    fn size(&self) -> (u32, u32) {
        (self.geometry.width_px, self.geometry.height_px)
    }

    fn frame_open(&self) -> String {
        let (width, height) = self.size();
        format!(
            concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" ",
                "xmlns:slic3r=\"http://slic3r.org/namespaces/slic3r\" ",
                "width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
                "<rect width=\"{w}\" height=\"{h}\" fill=\"black\"/>\n",
            ),
            w = width,
            h = height
        )
    }

    fn write_frame(&self, contents: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = OsString::from(self.path.as_os_str());
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)
    }

    fn publish(&self, contents: &str, what: &str) {
        match self.write_frame(contents) {
            Ok(()) => trace!(frame = what, "frame written"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "frame write failed"),
        }
    }
}

impl Projector for FrameFileProjector {
    type Image = SvgLayer;

    fn show(&mut self, image: &SvgLayer) {
        self.publish(&self.layer_frame(image), "layer");
    }

    fn hide(&mut self) {
        self.publish(&self.black_frame(), "black");
    }
}
