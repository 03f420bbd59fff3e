//! Per-part volume analysis
//!
//! Slicers label the moves belonging to each object with
//! `; printing object NAME` / `; stop printing object NAME` comments. A single
//! pass over the file accumulates the bounding box of every labelled object;
//! each object's share of the summed box volume is then used to split the
//! job's energy between its parts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

const OBJECT_START: &str = "; printing object";
const OBJECT_STOP: &str = "; stop printing object";

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    fn at(point: [f64; 3]) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Grow the box to contain `point`
    pub fn include(&mut self, point: [f64; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(point[axis]);
            self.max[axis] = self.max[axis].max(point[axis]);
        }
    }

    /// Width, depth and height
    pub fn extents(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Box volume; zero when any extent is not positive
    pub fn volume(&self) -> f64 {
        let [w, d, h] = self.extents();
        if w > 0.0 && d > 0.0 && h > 0.0 {
            w * d * h
        } else {
            0.0
        }
    }
}

/// Bounding box of one named object
#[derive(Debug, Clone, PartialEq)]
pub struct PartBounds {
    pub name: String,
    pub bounds: BoundingBox,
}

/// A part's share of the job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartShare {
    pub name: String,
    /// Fraction of the total bounding-box volume, rounded to 4 decimals
    pub energy_percentage: f64,
}

/// Result of the per-part analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerPartAnalysis {
    pub total_bounding_box_volume: f64,
    pub parts: Vec<PartShare>,
}

/// Modal machine position used while scanning
#[derive(Debug, Default)]
struct Position {
    axes: [Option<f64>; 3],
    relative: bool,
}

impl Position {
    fn current(&self) -> Option<[f64; 3]> {
        match self.axes {
            [Some(x), Some(y), Some(z)] => Some([x, y, z]),
            _ => None,
        }
    }

    fn apply(&mut self, axis: usize, value: f64, relative: bool) {
        self.axes[axis] = if relative {
            self.axes[axis].map(|p| p + value)
        } else {
            Some(value)
        };
    }
}

fn axis_index(letter: char) -> Option<usize> {
    match letter {
        'X' => Some(0),
        'Y' => Some(1),
        'Z' => Some(2),
        _ => None,
    }
}

/// Split a G-code line into `(letter, value)` words, dropping any comment
fn words(line: &str) -> impl Iterator<Item = (char, &str)> {
    let code = line.split(';').next().unwrap_or("");
    code.split_whitespace().filter_map(|word| {
        let mut chars = word.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        Some((letter, chars.as_str()))
    })
}

fn command_number(value: &str) -> Option<u32> {
    value.parse::<f64>().ok().map(|v| v as u32)
}

/// Accumulate the bounding box of every labelled object, in first-seen order
///
/// Positions are tracked modally across `G0`/`G1` moves with `G90`/`G91`
/// distance modes and `G92` resets. A move updates the active object's box
/// once all three axes are known.
pub fn scan_part_bounds(content: &str) -> Vec<PartBounds> {
    let mut parts: Vec<PartBounds> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut current: Option<String> = None;
    let mut position = Position::default();

    for line in content.lines() {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix(OBJECT_STOP) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                current = None;
                continue;
            }
        }
        if let Some(rest) = trimmed.strip_prefix(OBJECT_START) {
            let name = rest.trim();
            current = (!name.is_empty()).then(|| name.to_string());
            continue;
        }

        let mut tokens = words(trimmed);
        let Some((letter, number)) = tokens.next() else {
            continue;
        };
        if letter != 'G' {
            continue;
        }

        match command_number(number) {
            Some(90) => position.relative = false,
            Some(91) => position.relative = true,
            Some(92) => {
                for (letter, value) in tokens {
                    if let (Some(axis), Ok(v)) = (axis_index(letter), value.parse()) {
                        position.apply(axis, v, false);
                    }
                }
            }
            Some(0) | Some(1) => {
                let relative = position.relative;
                let mut moved = false;
                for (letter, value) in tokens {
                    if let (Some(axis), Ok(v)) = (axis_index(letter), value.parse::<f64>()) {
                        position.apply(axis, v, relative);
                        moved = true;
                    }
                }

                let (Some(name), Some(point), true) = (&current, position.current(), moved)
                else {
                    continue;
                };
                match index.get(name) {
                    Some(&i) => parts[i].bounds.include(point),
                    None => {
                        index.insert(name.clone(), parts.len());
                        parts.push(PartBounds {
                            name: name.clone(),
                            bounds: BoundingBox::at(point),
                        });
                    }
                }
            }
            _ => {}
        }
    }

    parts
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Split the job between its labelled objects by bounding-box volume
///
/// Returns `None` when the file has no labelled moves or every box is flat.
pub fn analyze_per_part_volume(content: &str) -> Option<PerPartAnalysis> {
    let parts = scan_part_bounds(content);
    if parts.is_empty() {
        debug!("No labelled objects found");
        return None;
    }

    let volumes: Vec<f64> = parts.iter().map(|p| p.bounds.volume()).collect();
    let total: f64 = volumes.iter().sum();
    if total <= 0.0 {
        debug!(parts = parts.len(), "All object bounding boxes are flat");
        return None;
    }

    let shares = parts
        .into_iter()
        .zip(volumes)
        .map(|(part, volume)| PartShare {
            name: part.name,
            energy_percentage: round4(volume / total),
        })
        .collect();

    Some(PerPartAnalysis {
        total_bounding_box_volume: total,
        parts: shares,
    })
}
