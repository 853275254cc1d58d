//! Job import from removable media
//!
//! The newest SVG on the stick is copied into a staging directory along
//! with its settings file, then parsed from there. Slic3r writes one
//! `<g slic3r:z="…">` group per layer directly under the root `<svg>`,
//! whose `width`/`height` give the part size in millimetres.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use stratum_core::config::{parse_settings, PrinterSettings, SettingsError};
use stratum_core::job::{Job, JobError, Layer};
use stratum_core::traits::JobSource;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::MediaConfig;

const Z_ATTRIBUTE: &[u8] = b"slic3r:z";

/// One layer's vector data, ready to be framed by the projector
#[derive(Debug, Clone, PartialEq)]
pub struct SvgLayer {
    /// Children of the layer group, verbatim
    pub markup: String,
    pub part_width_mm: f64,
    pub part_height_mm: f64,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media directory {path} unavailable")]
    NoMedia {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no .{extension} job in {dir}")]
    NoJob { dir: PathBuf, extension: String },
    #[error("failed to copy {from} to {to}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed SVG: {0}")]
    Xml(String),
    #[error("SVG has no root <svg> element")]
    NoRoot,
    #[error("missing attribute {0}")]
    MissingAttribute(&'static str),
    #[error("attribute {attribute} is not a number: {value:?}")]
    InvalidNumber {
        attribute: &'static str,
        value: String,
    },
    #[error("settings file: {0}")]
    Settings(SettingsError),
}

impl From<MediaError> for JobError {
    fn from(e: MediaError) -> Self {
        match e {
            MediaError::NoMedia { .. } | MediaError::NoJob { .. } | MediaError::Copy { .. } => {
                JobError::NoMedia
            }
            MediaError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                JobError::NotFound
            }
            _ => JobError::ParseFailure,
        }
    }
}

/// Job source over an automounted USB stick
pub struct MediaJobSource {
    config: MediaConfig,
}

impl MediaJobSource {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Newest job on the media by creation time, else modification time
    pub fn newest_job(&self) -> Result<PathBuf, MediaError> {
        let dir = &self.config.mount_dir;
        let entries = fs::read_dir(dir).map_err(|source| MediaError::NoMedia {
            path: dir.clone(),
            source,
        })?;

        entries
            .filter_map(Result::ok)
            .filter(|entry| self.is_job(&entry.path()))
            .filter_map(|entry| {
                let meta = entry.metadata().ok()?;
                if !meta.is_file() {
                    return None;
                }
                let stamp = meta
                    .created()
                    .or_else(|_| meta.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                Some((stamp, entry.path()))
            })
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
            .map(|(_, path)| path)
            .ok_or_else(|| MediaError::NoJob {
                dir: dir.clone(),
                extension: self.config.job_extension.clone(),
            })
    }

    fn is_job(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.config.job_extension))
    }

    /// Copy the newest job and its settings file into staging
    pub fn import_media(&self) -> Result<PathBuf, MediaError> {
        let job = self.newest_job()?;
        copy_file(&job, &self.config.staged_job)?;
        info!(job = %job.display(), "job imported");

        let settings = self.config.mount_dir.join(&self.config.settings_file);
        if settings.is_file() {
            copy_file(&settings, &self.config.staged_settings)?;
            debug!(path = %settings.display(), "settings imported");
        } else {
            // A settings file from an earlier job must not apply to this one
            match fs::remove_file(&self.config.staged_settings) {
                Ok(()) => debug!("stale staged settings removed"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(error = %e, "could not remove staged settings"),
            }
        }
        Ok(job)
    }

    pub fn read_settings(&self, base: PrinterSettings) -> Result<PrinterSettings, MediaError> {
        let path = &self.config.staged_settings;
        match fs::read_to_string(path) {
            Ok(text) => parse_settings(&text, base).map_err(MediaError::Settings),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(base),
            Err(source) => Err(MediaError::Read {
                path: path.clone(),
                source,
            }),
        }
    }
}

impl JobSource for MediaJobSource {
    type Image = SvgLayer;
    type Path = Path;

    fn import(&mut self) -> Result<(), JobError> {
        self.import_media().map(|_| ()).map_err(|e| {
            warn!(error = %e, "job import failed");
            e.into()
        })
    }

    fn staged_path(&self) -> &Path {
        &self.config.staged_job
    }

    fn load(&self, path: &Path, fallback_thickness_mm: f64) -> Result<Job<SvgLayer>, JobError> {
        load_job(path, fallback_thickness_mm).map_err(|e| {
            warn!(path = %path.display(), error = %e, "job load failed");
            e.into()
        })
    }

    fn settings(&self, base: PrinterSettings) -> Result<PrinterSettings, JobError> {
        self.read_settings(base).map_err(|e| {
            warn!(error = %e, "settings rejected");
            e.into()
        })
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<(), MediaError> {
    let copy_err = |source| MediaError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(copy_err)?;
    }
    fs::copy(from, to).map_err(copy_err)?;
    Ok(())
}

/// Read and parse a job file
pub fn load_job(path: &Path, fallback_thickness_mm: f64) -> Result<Job<SvgLayer>, MediaError> {
    let text = fs::read_to_string(path).map_err(|source| MediaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let job = Job::new(parse_layers(&text)?, fallback_thickness_mm);
    info!(
        layers = job.layer_count(),
        thickness_mm = job.layer_thickness_mm(),
        "job loaded"
    );
    Ok(job)
}

/// Split a Slic3r SVG into its layers
pub fn parse_layers(svg: &str) -> Result<Vec<Layer<SvgLayer>>, MediaError> {
    let mut reader = Reader::from_str(svg);
    let mut part: Option<(f64, f64)> = None;
    let mut depth = 0usize;
    let mut layers = Vec::new();

    loop {
        let event = reader.read_event().map_err(xml_error)?;
        match event {
            Event::Start(e) if depth == 0 => {
                part = Some(root_size(&e)?);
                depth = 1;
            }
            Event::Start(e) if depth == 1 && e.name().as_ref() == b"g" => {
                let z_mm = layer_z(&e)?;
                let markup = reader.read_text(e.name()).map_err(xml_error)?;
                layers.push((z_mm, markup.into_owned()));
            }
            Event::Empty(e) if depth == 1 && e.name().as_ref() == b"g" => {
                layers.push((layer_z(&e)?, String::new()));
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    let (part_width_mm, part_height_mm) = part.ok_or(MediaError::NoRoot)?;
    Ok(layers
        .into_iter()
        .enumerate()
        .map(|(i, (z_mm, markup))| Layer {
            image: SvgLayer {
                markup,
                part_width_mm,
                part_height_mm,
            },
            sequence_index: i as u32,
            z_mm,
        })
        .collect())
}

fn xml_error(e: impl ToString) -> MediaError {
    MediaError::Xml(e.to_string())
}

fn root_size(root: &BytesStart<'_>) -> Result<(f64, f64), MediaError> {
    if root.local_name().as_ref() != b"svg" {
        return Err(MediaError::NoRoot);
    }
    let width = attribute(root, b"width", "width")?;
    let height = attribute(root, b"height", "height")?;
    Ok((
        millimetres(&width, "width")?,
        millimetres(&height, "height")?,
    ))
}

fn layer_z(group: &BytesStart<'_>) -> Result<f64, MediaError> {
    let z = attribute(group, Z_ATTRIBUTE, "slic3r:z")?;
    z.trim().parse().map_err(|_| MediaError::InvalidNumber {
        attribute: "slic3r:z",
        value: z,
    })
}

fn attribute(
    element: &BytesStart<'_>,
    key: &[u8],
    name: &'static str,
) -> Result<String, MediaError> {
    let attr = element
        .try_get_attribute(key)
        .map_err(xml_error)?
        .ok_or(MediaError::MissingAttribute(name))?;
    let value = attr.unescape_value().map_err(xml_error)?;
    Ok(value.into_owned())
}

/// Parse a length such as `"40.5mm"` or `"40.5"`
fn millimetres(value: &str, attribute: &'static str) -> Result<f64, MediaError> {
    let number = value.trim();
    let number = number.strip_suffix("mm").unwrap_or(number);
    number
        .trim()
        .parse()
        .map_err(|_| MediaError::InvalidNumber {
            attribute,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::TempDir;

    const JOB: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<svg width="40.5mm" height="20mm" xmlns="http://www.w3.org/2000/svg" xmlns:svg="http://www.w3.org/2000/svg" xmlns:slic3r="http://slic3r.org/namespaces/slic3r">
  <!-- Generated by Slic3r -->
  <g id="layer0" slic3r:z="0.1">
    <polygon slic3r:type="contour" points="0,0 10,0 10,10" style="fill: white" />
  </g>
  <g id="layer1" slic3r:z="0.2">
    <polygon slic3r:type="contour" points="1,1 9,1 9,9" style="fill: white" />
  </g>
  <g id="layer2" slic3r:z="0.3"><g><polygon points="2,2 8,2 8,8" /></g></g>
</svg>
"#;

    fn media(dir: &TempDir) -> MediaConfig {
        MediaConfig {
            mount_dir: dir.path().join("usb"),
            job_extension: "svg".into(),
            settings_file: "config.txt".into(),
            staged_job: dir.path().join("staging/job.svg"),
            staged_settings: dir.path().join("staging/config.txt"),
        }
    }

    #[test]
    fn test_parse_layers() {
        let layers = parse_layers(JOB).unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].z_mm, 0.1);
        assert_eq!(layers[2].z_mm, 0.3);
        assert_eq!(layers[1].sequence_index, 1);
        assert_eq!(layers[0].image.part_width_mm, 40.5);
        assert_eq!(layers[0].image.part_height_mm, 20.0);
        assert!(layers[0].image.markup.contains("points=\"0,0 10,0 10,10\""));
        assert!(!layers[0].image.markup.contains("layer1"));
        // Nested groups belong to their layer
        assert!(layers[2].image.markup.contains("<g><polygon"));
    }

    #[test]
    fn test_thickness_from_layers() {
        let job = Job::new(parse_layers(JOB).unwrap(), 0.5);
        assert!((job.layer_thickness_mm() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            parse_layers(r#"<svg height="1mm"></svg>"#),
            Err(MediaError::MissingAttribute("width"))
        ));
        assert!(matches!(
            parse_layers(r#"<svg width="1mm" height="1mm"><g slic3r:z="high"></g></svg>"#),
            Err(MediaError::InvalidNumber { attribute: "slic3r:z", .. })
        ));
        assert!(matches!(
            parse_layers(r#"<svg width="1mm" height="1mm"><g></g></svg>"#),
            Err(MediaError::MissingAttribute("slic3r:z"))
        ));
        assert!(matches!(parse_layers(""), Err(MediaError::NoRoot)));
        assert!(matches!(
            parse_layers(r#"<html width="1" height="1"></html>"#),
            Err(MediaError::NoRoot)
        ));
    }

    #[test]
    fn test_empty_svg_has_no_layers() {
        let layers = parse_layers(r#"<svg width="10" height="10"></svg>"#).unwrap();
        assert!(layers.is_empty());
    }

    #[test]
    fn test_missing_media() {
        let dir = TempDir::new().unwrap();
        let mut source = MediaJobSource::new(media(&dir));
        assert_eq!(source.import(), Err(JobError::NoMedia));
    }

    #[test]
    fn test_media_without_job() {
        let dir = TempDir::new().unwrap();
        let config = media(&dir);
        fs::create_dir_all(&config.mount_dir).unwrap();
        fs::write(config.mount_dir.join("notes.txt"), "hello").unwrap();

        let mut source = MediaJobSource::new(config);
        assert!(matches!(source.newest_job(), Err(MediaError::NoJob { .. })));
        assert_eq!(source.import(), Err(JobError::NoMedia));
    }

    #[test]
    fn test_newest_job_wins() {
        let dir = TempDir::new().unwrap();
        let config = media(&dir);
        fs::create_dir_all(&config.mount_dir).unwrap();
        fs::write(config.mount_dir.join("old.svg"), "old").unwrap();
        sleep(Duration::from_millis(20));
        fs::write(config.mount_dir.join("NEW.SVG"), JOB).unwrap();

        let source = MediaJobSource::new(config);
        let newest = source.newest_job().unwrap();
        assert_eq!(newest.file_name().unwrap(), "NEW.SVG");
    }

    #[test]
    fn test_acquire_stages_job_and_settings() {
        let dir = TempDir::new().unwrap();
        let config = media(&dir);
        fs::create_dir_all(&config.mount_dir).unwrap();
        fs::write(config.mount_dir.join("part.svg"), JOB).unwrap();
        fs::write(
            config.mount_dir.join("config.txt"),
            "set project_tiempo_exposicion 4.5\nset project_x 1920\n",
        )
        .unwrap();

        let staged = config.staged_job.clone();
        let mut source = MediaJobSource::new(config);
        let (job, settings) = source.acquire(PrinterSettings::default()).unwrap();

        assert!(staged.is_file());
        assert_eq!(job.layer_count(), 3);
        assert_eq!(settings.exposure.interval_s, 4.5);
        assert_eq!(settings.projector.width_px, 1920);
    }

    #[test]
    fn test_stale_settings_dropped() {
        let dir = TempDir::new().unwrap();
        let config = media(&dir);
        fs::create_dir_all(&config.mount_dir).unwrap();
        fs::create_dir_all(config.staged_settings.parent().unwrap()).unwrap();
        fs::write(&config.staged_settings, "set project_pausa 9\n").unwrap();
        fs::write(config.mount_dir.join("part.svg"), JOB).unwrap();

        let mut source = MediaJobSource::new(config);
        let (_, settings) = source.acquire(PrinterSettings::default()).unwrap();
        assert_eq!(settings, PrinterSettings::default());
    }

    #[test]
    fn test_bad_settings_rejected() {
        let dir = TempDir::new().unwrap();
        let config = media(&dir);
        fs::create_dir_all(&config.mount_dir).unwrap();
        fs::write(config.mount_dir.join("part.svg"), JOB).unwrap();
        fs::write(config.mount_dir.join("config.txt"), "set project_pausa soon\n").unwrap();

        let mut source = MediaJobSource::new(config);
        assert_eq!(
            source.acquire(PrinterSettings::default()).map(|_| ()),
            Err(JobError::ParseFailure)
        );
    }

    #[test]
    fn test_load_missing_staged_job() {
        let dir = TempDir::new().unwrap();
        let source = MediaJobSource::new(media(&dir));
        assert_eq!(
            source.load(source.staged_path(), 0.1).map(|_| ()),
            Err(JobError::NotFound)
        );
    }
}
