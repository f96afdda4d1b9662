//! Synthetic scenes
//!
//! Deterministic linear RGBA test frames standing in for decoded captures in
//! the CLI, tests and benchmarks. All channel values lie in [0, 1] with alpha
//! fixed at 1.0.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a generated scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    /// Left-to-right ramp from near black to near white
    Gradient,
    /// Flat grey one stop under the midtone
    Midtone,
    /// Saturated sky over a dark foreground subject
    Backlit,
    /// High-key frame with a saturated band
    Bright,
    /// Low-key frame barely above the noise floor
    Dark,
    /// Dark surround with a lit disc in the center
    Spotlit,
}

impl SceneKind {
    pub const ALL: [SceneKind; 6] = [
        SceneKind::Gradient,
        SceneKind::Midtone,
        SceneKind::Backlit,
        SceneKind::Bright,
        SceneKind::Dark,
        SceneKind::Spotlit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SceneKind::Gradient => "gradient",
            SceneKind::Midtone => "midtone",
            SceneKind::Backlit => "backlit",
            SceneKind::Bright => "bright",
            SceneKind::Dark => "dark",
            SceneKind::Spotlit => "spotlit",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        SceneKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| {
                let valid: Vec<&str> = SceneKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("Unknown scene '{}'. Valid: {}", s, valid.join(", "))
            })
    }
}

/// An interleaved linear RGBA frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<f32>,
}

impl Scene {
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

/// Render `kind` at `width` x `height`.
pub fn generate_scene(kind: SceneKind, width: usize, height: usize) -> Scene {
    let mut rgba = Vec::with_capacity(width * height * 4);

    for y in 0..height {
        let v = (y as f32 + 0.5) / height.max(1) as f32;
        for x in 0..width {
            let u = (x as f32 + 0.5) / width.max(1) as f32;
            let [r, g, b] = sample(kind, u, v);
            rgba.extend_from_slice(&[r, g, b, 1.0]);
        }
    }

    Scene {
        width,
        height,
        rgba,
    }
}

/// Linear RGB at normalized coordinates (u right, v down).
fn sample(kind: SceneKind, u: f32, v: f32) -> [f32; 3] {
    match kind {
        SceneKind::Gradient => {
            let level = 0.02 + 0.9 * u;
            [level, level, level * 0.95]
        }
        SceneKind::Midtone => [0.09, 0.09, 0.09],
        SceneKind::Backlit => {
            let du = u - 0.5;
            let dv = v - 0.7;
            if du * du + dv * dv < 0.04 {
                // Subject in silhouette
                [0.03, 0.025, 0.02]
            } else if v < 0.45 {
                [1.0, 1.0, 1.0]
            } else {
                [0.22, 0.2, 0.16]
            }
        }
        SceneKind::Bright => {
            if v < 0.3 {
                [1.0, 1.0, 1.0]
            } else {
                let level = 0.6 + 0.3 * u;
                [level, level, level]
            }
        }
        SceneKind::Dark => {
            let level = 0.004 + 0.02 * u * v;
            [level, level, level * 1.1]
        }
        SceneKind::Spotlit => {
            let du = u - 0.5;
            let dv = v - 0.5;
            if du * du + dv * dv < 0.01 {
                [0.6, 0.55, 0.5]
            } else {
                [0.008, 0.008, 0.01]
            }
        }
    }
}
