//! EV arithmetic for the three exposure controls.
//!
//! All conversions are relative to the base exposure 1/60 s, f/2.8, ISO 100.
//! Positive EV always means more light: a longer shutter, a wider aperture
//! (smaller f-number) or a higher sensitivity.

/// Base shutter duration in seconds
pub const BASE_SHUTTER: f64 = 1.0 / 60.0;
/// Base aperture f-number
pub const BASE_APERTURE: f64 = 2.8;
/// Base sensitivity
pub const BASE_ISO: f64 = 100.0;

/// Full-stop f-numbers as marked on lenses.
pub const APERTURE_STOPS: [f64; 11] = [1.0, 1.4, 2.0, 2.8, 4.0, 5.6, 8.0, 11.0, 16.0, 22.0, 32.0];

/// Standard sensitivity settings.
pub const ISO_STOPS: [f64; 11] = [
    50.0, 64.0, 100.0, 200.0, 400.0, 800.0, 1600.0, 3200.0, 6400.0, 12800.0, 25600.0,
];

/// Round `ev` to the nearest multiple of `step`.
///
/// A non-positive or non-finite step leaves `ev` unchanged.
pub fn quantize_ev(ev: f64, step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 || !ev.is_finite() {
        return ev;
    }
    (ev / step).round() * step
}

#[inline]
pub fn shutter_from_ev(ev: f64) -> f64 {
    BASE_SHUTTER * 2f64.powf(ev)
}

#[inline]
pub fn aperture_from_ev(ev: f64) -> f64 {
    BASE_APERTURE / std::f64::consts::SQRT_2.powf(ev)
}

#[inline]
pub fn iso_from_ev(ev: f64) -> f64 {
    BASE_ISO * 2f64.powf(ev)
}

#[inline]
pub fn ev_from_shutter(shutter_seconds: f64) -> f64 {
    (shutter_seconds / BASE_SHUTTER).log2()
}

#[inline]
pub fn ev_from_aperture(aperture: f64) -> f64 {
    (BASE_APERTURE / aperture).log2() / std::f64::consts::SQRT_2.log2()
}

#[inline]
pub fn ev_from_iso(iso: f64) -> f64 {
    (iso / BASE_ISO).log2()
}

/// Snap `value` to the nearest entry of `stops` lying within `[min, max]`.
///
/// Distance is measured in stops (log ratio) rather than linear difference.
/// When no entry lies within the bounds the value is clamped instead.
pub fn snap_to_stops(value: f64, stops: &[f64], min: f64, max: f64) -> f64 {
    let clamped = value.clamp(min, max);
    if !clamped.is_finite() || clamped <= 0.0 {
        return clamped;
    }

    let mut best: Option<(f64, f64)> = None;
    for &stop in stops.iter().filter(|&&s| s >= min && s <= max) {
        let distance = (stop / clamped).log2().abs();
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((stop, distance)),
        }
    }

    best.map(|(stop, _)| stop).unwrap_or(clamped)
}

/// Lowest entry of `stops` within `[min, max]`, or `min` when none fits.
pub fn floor_stop(stops: &[f64], min: f64, max: f64) -> f64 {
    stops
        .iter()
        .copied()
        .find(|&s| s >= min && s <= max)
        .unwrap_or(min)
}
