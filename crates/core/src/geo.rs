//! Great-circle helpers for nearest-monitoring-site lookup.

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two WGS84 coordinates, in kilometres.
pub fn haversine_km(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let d_lat = (lat_b - lat_a).to_radians();
    let d_lon = (lon_b - lon_a).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat_a.to_radians().cos() * lat_b.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Index of the `(lat, lon)` point nearest to the given coordinates.
///
/// Returns `None` for an empty slice.
pub fn nearest_point(lat: f64, lon: f64, points: &[(f64, f64)]) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, (p_lat, p_lon))| (i, haversine_km(lat, lon, *p_lat, *p_lon)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}
