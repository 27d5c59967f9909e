//! Mechanical advantage, bite force and stress.

/// mm² to m².
pub const MM2_TO_M2: f64 = 1e-6;

/// `in_lever / out_lever`, or `None` for a zero out-lever.
pub fn mechanical_advantage(in_lever: f64, out_lever: f64) -> Option<f64> {
    (out_lever != 0.0).then(|| in_lever / out_lever)
}

/// Force delivered at the tooth (N).
pub fn tooth_force(muscle_force: f64, mechanical_advantage: f64) -> f64 {
    muscle_force * mechanical_advantage
}

/// Tooth force over surface area in N/m², or `None` unless `area_mm2 > 0`.
pub fn stress(tooth_force: f64, area_mm2: f64) -> Option<f64> {
    (area_mm2.is_finite() && area_mm2 > 0.0).then(|| tooth_force / (area_mm2 * MM2_TO_M2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mechanical_advantage() {
        assert_eq!(mechanical_advantage(3.0, 6.0), Some(0.5));
        assert_eq!(mechanical_advantage(0.0, 6.0), Some(0.0));
        assert_eq!(mechanical_advantage(3.0, 0.0), None);
    }

    #[test]
    fn test_tooth_force_is_plain_product() {
        let ma = 1.0 / 3.0;
        assert_eq!(tooth_force(7.0, ma), 7.0 * ma);
    }

    #[test]
    fn test_stress_units() {
        // 2 N over 4 mm² = 2 / 4e-6 N/m²
        let s = stress(2.0, 4.0).unwrap();
        assert!((s - 500_000.0).abs() < 1e-6);
        assert_eq!(s, 2.0 / (4.0 * 1e-6));
    }

    #[test]
    fn test_stress_rejects_bad_area() {
        assert_eq!(stress(1.0, 0.0), None);
        assert_eq!(stress(1.0, -2.0), None);
        assert_eq!(stress(1.0, f64::NAN), None);
    }
}
