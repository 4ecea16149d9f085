//! 256-entry colormap tables

use lidarvis_core::Rgb;

/// Viridis sampled at nine evenly spaced positions (matplotlib values)
const VIRIDIS_STOPS: [Rgb; 9] = [
    [68, 1, 84],
    [71, 45, 123],
    [59, 82, 139],
    [44, 114, 142],
    [33, 145, 140],
    [40, 174, 128],
    [94, 201, 98],
    [173, 220, 48],
    [253, 231, 37],
];

/// A lookup table from an 8-bit intensity to a color
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    table: Vec<Rgb>,
}

impl Colormap {
    /// Build a 256-entry table by linear interpolation between evenly spaced stops
    pub fn from_stops(stops: &[Rgb]) -> Self {
        let table = match stops {
            [] => vec![[0, 0, 0]; 256],
            [only] => vec![*only; 256],
            _ => (0..256)
                .map(|i| {
                    let t = i as f32 / 255.0 * (stops.len() - 1) as f32;
                    let lo = (t.floor() as usize).min(stops.len() - 2);
                    let frac = t - lo as f32;
                    let (a, b) = (stops[lo], stops[lo + 1]);
                    [0, 1, 2].map(|c| {
                        (a[c] as f32 + (b[c] as f32 - a[c] as f32) * frac).round() as u8
                    })
                })
                .collect(),
        };
        Self { table }
    }

    pub fn viridis() -> Self {
        Self::from_stops(&VIRIDIS_STOPS)
    }

    pub fn lookup(&self, index: u8) -> Rgb {
        self.table[index as usize]
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self::viridis()
    }
}
