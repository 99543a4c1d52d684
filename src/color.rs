use std::f32::consts::PI;
use std::str::FromStr;

/// Channel spread below which a color counts as gray and carries no hue.
const NEAR_GRAY_THRESHOLD: u8 = 10;
const MAX_CHANNEL_SUM: f32 = 3.0 * 255.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Color { red, green, blue }
    }

    /// Perceived brightness `0.299 R + 0.587 G + 0.114 B`, truncated.
    pub fn luminance(&self) -> u8 {
        let weighted = 299 * self.red as u32 + 587 * self.green as u32 + 114 * self.blue as u32;
        (weighted / 1000) as u8
    }

    fn max_component(&self) -> u8 {
        self.red.max(self.green).max(self.blue)
    }

    fn min_component(&self) -> u8 {
        self.red.min(self.green).min(self.blue)
    }

    fn component_sum(&self) -> u16 {
        self.red as u16 + self.green as u16 + self.blue as u16
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parses `"R,G,B"` with every component in `0..=255`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [red, green, blue] = split_triple::<u8>(s, "color")?;
        Ok(Color { red, green, blue })
    }
}

/// Hue in radians `[0, 2π)`, saturation and intensity in `[0, 1]`.
///
/// Also used as a per axis tolerance for [`HsiRange::around`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HsiColor {
    pub hue: f32,
    pub saturation: f32,
    pub intensity: f32,
}

impl HsiColor {
    pub const fn new(hue: f32, saturation: f32, intensity: f32) -> Self {
        HsiColor {
            hue,
            saturation,
            intensity,
        }
    }
}

impl From<&Color> for HsiColor {
    fn from(value: &Color) -> Self {
        let max = value.max_component();
        let min = value.min_component();
        let delta = max - min;
        let intensity = value.component_sum() as f32 / MAX_CHANNEL_SUM;
        if delta < NEAR_GRAY_THRESHOLD {
            return HsiColor {
                hue: 0.0,
                saturation: 0.0,
                intensity,
            };
        }
        let saturation = 1.0 - (min as f32 / 255.0) / intensity;
        let hue = hue_sector(value, max, delta as f32) * PI / 3.0;
        HsiColor {
            hue,
            saturation,
            intensity,
        }
    }
}

impl From<Color> for HsiColor {
    fn from(value: Color) -> Self {
        HsiColor::from(&value)
    }
}

impl FromStr for HsiColor {
    type Err = String;

    /// Parses `"H,S,I"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [hue, saturation, intensity] = split_triple::<f32>(s, "HSI value")?;
        Ok(HsiColor {
            hue,
            saturation,
            intensity,
        })
    }
}

/// Position of the hue on the six sector color wheel, in `[0, 6)`.
fn hue_sector(color: &Color, max: u8, delta: f32) -> f32 {
    let red = color.red as f32;
    let green = color.green as f32;
    let blue = color.blue as f32;
    let sector = if max == color.red {
        (green - blue) / delta
    } else if max == color.green {
        2.0 + (blue - red) / delta
    } else {
        4.0 + (red - green) / delta
    };
    if sector < 0.0 {
        sector + 6.0
    } else {
        sector
    }
}

fn split_triple<T: FromStr>(s: &str, name: &str) -> Result<[T; 3], String> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<T>())
        .collect::<Result<Vec<T>, _>>()
        .map_err(|_| format!("'{}' is not a valid {}", s, name))?;
    <[T; 3]>::try_from(parts)
        .map_err(|parts| format!("A {} needs 3 components, but got {}", name, parts.len()))
}

/// Inclusive axis aligned box in HSI space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HsiRange {
    min: HsiColor,
    max: HsiColor,
}

impl HsiRange {
    /// Symmetric window of `tolerance` around `reference` on every axis.
    pub fn around(reference: &HsiColor, tolerance: &HsiColor) -> Self {
        HsiRange {
            min: HsiColor {
                hue: reference.hue - tolerance.hue,
                saturation: reference.saturation - tolerance.saturation,
                intensity: reference.intensity - tolerance.intensity,
            },
            max: HsiColor {
                hue: reference.hue + tolerance.hue,
                saturation: reference.saturation + tolerance.saturation,
                intensity: reference.intensity + tolerance.intensity,
            },
        }
    }

    /// Smallest box containing both colors.
    pub fn spanning(a: &HsiColor, b: &HsiColor) -> Self {
        HsiRange {
            min: HsiColor {
                hue: a.hue.min(b.hue),
                saturation: a.saturation.min(b.saturation),
                intensity: a.intensity.min(b.intensity),
            },
            max: HsiColor {
                hue: a.hue.max(b.hue),
                saturation: a.saturation.max(b.saturation),
                intensity: a.intensity.max(b.intensity),
            },
        }
    }

    pub fn min(&self) -> &HsiColor {
        &self.min
    }

    pub fn max(&self) -> &HsiColor {
        &self.max
    }

    pub fn contains(&self, hsi: &HsiColor) -> bool {
        (self.min.hue..=self.max.hue).contains(&hsi.hue)
            && (self.min.saturation..=self.max.saturation).contains(&hsi.saturation)
            && (self.min.intensity..=self.max.intensity).contains(&hsi.intensity)
    }
}

#[cfg(test)]
mod test {
    use std::f32::consts::PI;

    use super::{Color, HsiColor, HsiRange};

    const EPSILON: f32 = 1e-5;

    fn assert_close(actual: f32, expected: f32, name: &str) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "{} is wrong, expected {} but was {}",
            name,
            expected,
            actual
        );
    }

    #[test]
    fn luminance_of_colors() {
        assert_eq!(Color::new(255, 255, 255).luminance(), 255);
        assert_eq!(Color::BLACK.luminance(), 0);
        assert_eq!(Color::new(255, 0, 0).luminance(), 76, "0.299 * 255 = 76.245");
        assert_eq!(Color::new(0, 255, 0).luminance(), 149, "0.587 * 255 = 149.685");
        assert_eq!(Color::new(0, 0, 255).luminance(), 29, "0.114 * 255 = 29.07");
        assert_eq!(Color::new(10, 20, 30).luminance(), 18, "2.99 + 11.74 + 3.42 = 18.15");
    }

    #[test]
    fn luminance_of_gray_is_unchanged() {
        for value in 0..=255_u8 {
            assert_eq!(Color::new(value, value, value).luminance(), value);
        }
    }

    #[test]
    fn convert_gray_to_hsi() {
        for value in [0_u8, 1, 77, 128, 254, 255] {
            let hsi = HsiColor::from(Color::new(value, value, value));
            assert_eq!(hsi.hue, 0.0, "hue of gray {} must be zero", value);
            assert_eq!(hsi.saturation, 0.0, "saturation of gray {} must be zero", value);
            assert_close(hsi.intensity, value as f32 / 255.0, "intensity");
        }
    }

    #[test]
    fn convert_almost_gray_to_hsi() {
        let hsi = HsiColor::from(Color::new(100, 109, 105));
        assert_eq!(hsi.hue, 0.0, "hue is wrong");
        assert_eq!(hsi.saturation, 0.0, "saturation is wrong");
        assert_close(hsi.intensity, 314.0 / 765.0, "intensity");
    }

    #[test]
    fn convert_primaries_to_hsi() {
        let red = HsiColor::from(Color::new(255, 0, 0));
        assert_close(red.hue, 0.0, "red hue");
        assert_close(red.saturation, 1.0, "red saturation");
        assert_close(red.intensity, 1.0 / 3.0, "red intensity");

        let green = HsiColor::from(Color::new(0, 255, 0));
        assert_close(green.hue, 2.0 * PI / 3.0, "green hue");
        assert_close(green.saturation, 1.0, "green saturation");

        let blue = HsiColor::from(Color::new(0, 0, 255));
        assert_close(blue.hue, 4.0 * PI / 3.0, "blue hue");
        assert_close(blue.saturation, 1.0, "blue saturation");
    }

    #[test]
    fn negative_sector_wraps_into_full_circle() {
        let hsi = HsiColor::from(Color::new(128, 0, 127));
        assert!(
            hsi.hue > 5.0 * PI / 3.0 && hsi.hue < 2.0 * PI,
            "hue should lie in the last sector, was {}",
            hsi.hue
        );
    }

    #[test]
    fn convert_reference_yellow_to_hsi() {
        let hsi = HsiColor::from(Color::new(254, 254, 183));
        assert_close(hsi.hue, PI / 3.0, "hue");
        assert_close(hsi.intensity, 691.0 / 765.0, "intensity");
        assert_close(
            hsi.saturation,
            1.0 - (183.0 / 255.0) / (691.0 / 765.0),
            "saturation",
        );
    }

    #[test]
    fn window_around_reference_is_inclusive() {
        let reference = HsiColor::new(1.0, 0.5, 0.5);
        let tolerance = HsiColor::new(0.25, 0.25, 0.25);
        let range = HsiRange::around(&reference, &tolerance);
        assert!(range.contains(&reference));
        assert!(range.contains(&HsiColor::new(1.25, 0.75, 0.25)));
        assert!(!range.contains(&HsiColor::new(1.3, 0.5, 0.5)));
        assert!(!range.contains(&HsiColor::new(1.0, 0.5, 0.8)));
    }

    #[test]
    fn spanning_box_orders_components() {
        let a = HsiColor::new(4.0, 0.2, 0.9);
        let b = HsiColor::new(1.0, 0.8, 0.1);
        let range = HsiRange::spanning(&a, &b);
        assert_eq!(*range.min(), HsiColor::new(1.0, 0.2, 0.1));
        assert_eq!(*range.max(), HsiColor::new(4.0, 0.8, 0.9));
    }

    #[test]
    fn parse_color() {
        let color: Color = "254, 254,183".parse().unwrap();
        assert_eq!(color, Color::new(254, 254, 183));
        assert!("1,2".parse::<Color>().is_err(), "two components accepted");
        assert!("1,2,256".parse::<Color>().is_err(), "overflow accepted");
    }

    #[test]
    fn parse_hsi_color() {
        let hsi: HsiColor = "0.8,0.1,0.5".parse().unwrap();
        assert_eq!(hsi, HsiColor::new(0.8, 0.1, 0.5));
        assert!("0.8,x,0.5".parse::<HsiColor>().is_err());
    }
}
