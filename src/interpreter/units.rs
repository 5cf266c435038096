use std::f64::consts::PI;

/// Applies one of the fixed unit-conversion formulas to `value`. Returns
/// `None` for an unknown mode; the evaluator turns that into the fatal
/// unknown-conversion error.
pub fn convert(value: f64, mode: &str) -> Option<f64> {
    let result = match mode {
        // Length
        "in_cm" => value * 2.54,
        "cm_in" => value / 2.54,

        // Power
        "hp_kw" => value * 0.7457,
        "kw_hp" => value / 0.7457,

        // Temperature
        "f_c" => (value - 32.0) * 5.0 / 9.0,
        "c_f" => (value * 9.0 / 5.0) + 32.0,

        // Pressure
        "psi_bar" => value * 0.0689476,
        "bar_psi" => value / 0.0689476,

        // Digital storage
        "mb_gb" => value / 1024.0,
        "gb_mb" => value * 1024.0,

        // Energy
        "j_cal" => value / 4184.0,
        "cal_j" => value * 4184.0,

        // Angles
        "deg_rad" => value * (PI / 180.0),
        "rad_deg" => value * (180.0 / PI),

        // Mass
        "lb_kg" => value * 0.453592,
        "kg_lb" => value / 0.453592,

        // Currency
        "usd_bdt" => value * 122.0,
        "bdt_usd" => value / 122.0,
        "usd_eur" => value * 0.92,
        "eur_usd" => value / 0.92,

        // Speed
        "mph_kmph" => value * 1.60934,
        "kmph_mph" => value / 1.60934,

        // Torque
        "nm_ftlb" => value * 0.737562,
        "ftlb_nm" => value / 0.737562,

        // G-force
        "g_ms2" => value * 9.80665,
        "ms2_g" => value / 9.80665,

        _ => return None,
    };
    Some(result)
}
