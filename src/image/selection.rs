use super::Image;
use crate::color::{Color, HsiColor, HsiRange};
use crate::Result;

impl Image {
    /// Keeps the pixels whose HSI value lies within `tolerance` of `reference`
    /// on every axis and blackens the rest.
    pub fn select_color(&self, reference: &Color, tolerance: &HsiColor) -> Result<Image> {
        self.ensure_valid()?;
        let range = HsiRange::around(&HsiColor::from(reference), tolerance);
        self.keep_within(&range)
    }

    /// Keeps the pixels whose HSI value lies in the box spanned by `a` and `b`
    /// and blackens the rest.
    pub fn select_color_range(&self, a: &Color, b: &Color) -> Result<Image> {
        self.ensure_valid()?;
        let range = HsiRange::spanning(&HsiColor::from(a), &HsiColor::from(b));
        self.keep_within(&range)
    }

    fn keep_within(&self, range: &HsiRange) -> Result<Image> {
        let mut output = self.allocate_like()?;
        let mut kept = 0;
        for index in 0..self.red.dots.len() {
            let color = self.color_at(index);
            if range.contains(&HsiColor::from(&color)) {
                output.set_color_at(index, color);
                kept += 1;
            }
        }
        log::debug!(
            "Kept {} of {} pixels in HSI range {:?}",
            kept,
            self.red.dots.len(),
            range
        );
        Ok(output)
    }
}
