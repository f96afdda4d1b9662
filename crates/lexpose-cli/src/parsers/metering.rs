//! Metering mode, preference and scene parsing functions.

use lexpose_core::models::{MeteringMode, Preference};
use lexpose_core::scenes::SceneKind;

/// Parse a metering mode with optional parameters
///
/// Supported values:
/// - "matrix": whole frame
/// - "center" or "center:SIGMA": center-weighted, sigma as a fraction of the short side
/// - "spot", "spot:X,Y" or "spot:X,Y,RADIUS": spot at normalized coordinates
pub fn parse_metering(mode_str: &str) -> Result<MeteringMode, String> {
    let (name, params) = match mode_str.split_once(':') {
        Some((name, params)) => (name, Some(params)),
        None => (mode_str, None),
    };
    let mode: MeteringMode = name.trim().parse()?;

    let Some(params) = params else {
        return Ok(mode);
    };
    let values = params
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| format!("Invalid metering parameter '{}' in '{}'", p, mode_str))
        })
        .collect::<Result<Vec<f64>, String>>()?;

    match (mode, values.as_slice()) {
        (MeteringMode::CenterWeighted { .. }, [sigma]) if *sigma > 0.0 => {
            Ok(MeteringMode::CenterWeighted { sigma: *sigma })
        }
        (MeteringMode::Spot { radius, .. }, [x, y]) => Ok(MeteringMode::Spot {
            center_x: x.min(1.0),
            center_y: y.min(1.0),
            radius,
        }),
        (MeteringMode::Spot { .. }, [x, y, r]) => Ok(MeteringMode::Spot {
            center_x: x.min(1.0),
            center_y: y.min(1.0),
            radius: r.min(1.0),
        }),
        _ => Err(format!(
            "Unsupported metering parameters '{}'. Use center:SIGMA or spot:X,Y[,RADIUS]",
            mode_str
        )),
    }
}

/// Parse an allocation preference (shutter, aperture, iso, balanced)
pub fn parse_preference(preference_str: &str) -> Result<Preference, String> {
    preference_str.trim().parse()
}

/// Parse a synthetic scene name
pub fn parse_scene(scene_str: &str) -> Result<SceneKind, String> {
    scene_str.trim().parse()
}
