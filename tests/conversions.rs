mod common;

use common::run_program;

#[test]
fn test_length_conversion() {
    assert_eq!(run_program(r#"wake(conv(1, "in_cm"))"#), "2.54\n");
    assert_eq!(run_program(r#"wake(conv(2.54, "cm_in"))"#), "1.0\n");
}

#[test]
fn test_temperature_conversion() {
    assert_eq!(run_program(r#"wake(conv(212, "f_c"))"#), "100.0\n");
    assert_eq!(run_program(r#"wake(conv(100, "c_f"))"#), "212.0\n");
}

#[test]
fn test_storage_conversion() {
    assert_eq!(run_program(r#"wake(conv(2048, "mb_gb"))"#), "2.0\n");
    assert_eq!(run_program(r#"wake(conv(2, "gb_mb"))"#), "2048.0\n");
}

#[test]
fn test_angle_conversion_uses_pi() {
    let source = r#"wake(conv(180, "deg_rad") > 3.141592 and conv(180, "deg_rad") < 3.141593)"#;
    assert_eq!(run_program(source), "1\n");
}

#[test]
fn test_currency_conversion() {
    assert_eq!(run_program(r#"wake(conv(10, "usd_bdt"))"#), "1220.0\n");
}

#[test]
fn test_speed_conversion_scales() {
    let source = r#"wake(conv(100, "mph_kmph") > 160 and conv(100, "mph_kmph") < 161)"#;
    assert_eq!(run_program(source), "1\n");
}

#[test]
fn test_result_is_always_float() {
    assert_eq!(run_program(r#"type(conv(1, "in_cm"))"#), "<type 'float'>\n");
    assert_eq!(run_program(r#"type(conv(1.0, "in_cm"))"#), "<type 'float'>\n");
}

#[test]
fn test_mode_can_come_from_a_variable() {
    let source = r#"
        m = "c_f"
        wake(conv(100, m))
    "#;
    assert_eq!(run_program(source), "212.0\n");
}

#[test]
fn test_value_can_be_an_expression() {
    assert_eq!(run_program(r#"wake(conv(2 * 1024, "mb_gb"))"#), "2.0\n");
}

#[test]
fn test_conversions_nest() {
    assert_eq!(
        run_program(r#"wake(conv(conv(1, "in_cm"), "cm_in"))"#),
        "1.0\n"
    );
}

#[test]
fn test_conversion_result_feeds_arithmetic() {
    assert_eq!(run_program(r#"wake(conv(1, "gb_mb") + 1)"#), "1025.0\n");
}
