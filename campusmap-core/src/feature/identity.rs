//! Content-addressed feature identifiers and output rounding.
#![expect(
    clippy::float_arithmetic,
    reason = "rounding scales floating-point values"
)]

use geo::Coord;
use sha2::{Digest, Sha256};

/// Decimal places kept for centroids.
pub const CENTROID_PRECISION: i32 = 6;
/// Decimal places kept for areas.
pub const AREA_PRECISION: i32 = 2;

/// Hex digits of the centroid digest appended to the slug.
const DIGEST_BYTES: usize = 3;

/// Round `value` to `places` decimal places.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    (value * scale).round() / scale
}

/// Centroid as `[lon, lat]` rounded to [`CENTROID_PRECISION`] places.
#[must_use]
pub fn round_centroid(centroid: Coord<f64>) -> [f64; 2] {
    [
        round_to(centroid.x, CENTROID_PRECISION),
        round_to(centroid.y, CENTROID_PRECISION),
    ]
}

/// Lowercase, with every run of non-alphanumeric ASCII collapsed to `-`.
///
/// # Examples
/// ```
/// use campusmap_core::slugify;
///
/// assert_eq!(slugify("  Pauley Pavilion (East) "), "pauley-pavilion-east");
/// assert_eq!(slugify("Café 1919"), "caf-1919");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    for word in lowered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
    {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(word);
    }
    slug
}

/// Stable identifier derived from the display name and rounded centroid.
///
/// The centroid is formatted to five decimal places before hashing, so the
/// identifier survives sub-metre coordinate jitter between runs.
///
/// # Examples
/// ```
/// use campusmap_core::stable_id;
///
/// let id = stable_id("Powell Library", [-118.442181, 34.071603]);
/// assert!(id.starts_with("powell-library-"));
/// assert_eq!(id.len(), "powell-library-".len() + 6);
/// assert_eq!(id, stable_id("Powell Library", [-118.4421812, 34.0716028]));
/// ```
#[must_use]
pub fn stable_id(name: &str, centroid: [f64; 2]) -> String {
    let [lon, lat] = centroid;
    let digest = Sha256::digest(format!("{lon:.5},{lat:.5}").as_bytes());
    let suffix: String = digest
        .iter()
        .take(DIGEST_BYTES)
        .map(|byte| format!("{byte:02x}"))
        .collect();
    let slug = slugify(name);
    if slug.is_empty() {
        format!("feature-{suffix}")
    } else {
        format!("{slug}-{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(12.345_678_9, 2, 12.35)]
    #[case(-118.442_181_49, 6, -118.442_181)]
    #[case(0.5, 0, 1.0)]
    fn rounds_half_away_from_zero(#[case] value: f64, #[case] places: i32, #[case] expected: f64) {
        assert!((round_to(value, places) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case("Powell Library", "powell-library")]
    #[case("--Ackerman--Union--", "ackerman-union")]
    #[case("!!!", "")]
    fn slugs(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(slugify(text), expected);
    }

    #[rstest]
    fn ids_differ_by_location() {
        let here = stable_id("Parking Structure", [-118.44, 34.07]);
        let there = stable_id("Parking Structure", [-118.45, 34.07]);
        assert_ne!(here, there);
        assert!(here.starts_with("parking-structure-"));
    }

    #[rstest]
    fn nameless_slugs_fall_back_to_a_generic_prefix() {
        assert!(stable_id("???", [0.0, 0.0]).starts_with("feature-"));
    }
}
