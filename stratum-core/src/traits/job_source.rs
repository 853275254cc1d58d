//! Job import and loading

use crate::config::PrinterSettings;
use crate::job::{Job, JobError};

/// Supplies jobs from removable media
pub trait JobSource {
    /// Image handle type for the layers
    type Image;
    /// Location type of a staged job
    type Path: ?Sized;

    /// Copy the newest job (and its settings file) from the media into
    /// the staging area
    fn import(&mut self) -> Result<(), JobError>;

    /// Where [`import`](Self::import) leaves the job
    fn staged_path(&self) -> &Self::Path;

    /// Parse the job at `path`
    ///
    /// `fallback_thickness_mm` is used when the layers do not determine
    /// their own spacing.
    fn load(&self, path: &Self::Path, fallback_thickness_mm: f64)
        -> Result<Job<Self::Image>, JobError>;

    /// Read the staged settings file on top of `base`; a missing file
    /// yields `base` unchanged
    fn settings(&self, base: PrinterSettings) -> Result<PrinterSettings, JobError>;

    /// Import, then load the staged settings and job
    fn acquire(
        &mut self,
        base: PrinterSettings,
    ) -> Result<(Job<Self::Image>, PrinterSettings), JobError> {
        self.import()?;
        let settings = self.settings(base)?;
        let job = self.load(self.staged_path(), settings.exposure.thickness_mm)?;
        Ok((job, settings))
    }
}
