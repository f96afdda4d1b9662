//! Parsing functions for EV values and camera settings.

use lexpose_core::models::CapturedExposure;

/// Parse an EV value such as "1.5", "+2", "-1/3" or "-2/3"
pub fn parse_ev(ev_str: &str) -> Result<f64, String> {
    let trimmed = ev_str.trim();
    let (sign, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let value = parse_ratio(body).ok_or_else(|| {
        format!(
            "Invalid EV '{}'. Use a number or fraction (e.g., 1.5, -2/3)",
            ev_str
        )
    })?;
    Ok(sign * value)
}

/// Parse a shutter duration in seconds: "1/125", "0.5", "2s" or "30"
pub fn parse_shutter(shutter_str: &str) -> Result<f64, String> {
    let trimmed = shutter_str.trim();
    let body = trimmed.strip_suffix('s').unwrap_or(trimmed);

    match parse_ratio(body) {
        Some(value) if value > 0.0 => Ok(value),
        _ => Err(format!(
            "Invalid shutter '{}'. Use seconds or a fraction (e.g., 1/125, 2s)",
            shutter_str
        )),
    }
}

/// Parse an aperture f-number: "8", "f/8" or "F5.6"
pub fn parse_aperture(aperture_str: &str) -> Result<f64, String> {
    let lower = aperture_str.trim().to_lowercase();
    let body = lower
        .strip_prefix("f/")
        .or_else(|| lower.strip_prefix('f'))
        .unwrap_or(&lower);

    match body.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(format!(
            "Invalid aperture '{}'. Use an f-number (e.g., 8, f/5.6)",
            aperture_str
        )),
    }
}

/// Parse a sensitivity such as "400" or "ISO800"
pub fn parse_iso(iso_str: &str) -> Result<f64, String> {
    let lower = iso_str.trim().to_lowercase();
    let body = lower.strip_prefix("iso").unwrap_or(&lower);

    match body.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(format!("Invalid ISO '{}'", iso_str)),
    }
}

/// Parse captured exposure metadata in format "SHUTTER,APERTURE,ISO"
///
/// # Arguments
/// * `reference_str` - A string such as "1/125,8,400"
///
/// # Returns
/// The exposure the scene was captured at
pub fn parse_reference(reference_str: &str) -> Result<CapturedExposure, String> {
    let parts: Vec<&str> = reference_str.split(',').collect();
    if parts.len() != 3 {
        return Err(format!(
            "Reference must be in format SHUTTER,APERTURE,ISO (e.g., 1/125,8,400), got: {}",
            reference_str
        ));
    }

    Ok(CapturedExposure {
        shutter_seconds: parse_shutter(parts[0])?,
        aperture: parse_aperture(parts[1])?,
        iso: parse_iso(parts[2])?,
    })
}

/// A plain number or "a/b"; `None` when malformed or non-finite.
fn parse_ratio(text: &str) -> Option<f64> {
    let value = match text.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => text.trim().parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}
