//! Layer image output

/// Renders layer images onto the vat floor
///
/// Both calls are fire-and-forget; failures are the implementation's to
/// report.
pub trait Projector {
    /// Image handle type produced by the job source
    type Image;

    /// Replace the projected frame with `image`
    fn show(&mut self, image: &Self::Image);

    /// Project black
    fn hide(&mut self);
}
