mod common;

use common::run_program;

#[test]
fn test_if_takes_then_branch_on_truthy_condition() {
    assert_eq!(run_program(r#"if 1 { wake("x") } else { wake("y") }"#), "x\n");
}

#[test]
fn test_if_takes_else_branch_on_falsy_condition() {
    assert_eq!(run_program(r#"if 0 { wake("x") } else { wake("y") }"#), "y\n");
}

#[test]
fn test_if_without_else_can_run_nothing() {
    assert_eq!(run_program(r#"if 0 { wake("never") } wake("after")"#), "after\n");
}

#[test]
fn test_logical_condition_gates_then_branch() {
    assert_eq!(
        run_program(r#"if 1 and 0 { wake("then") } else { wake("else") }"#),
        "else\n"
    );
    assert_eq!(
        run_program(r#"if 0 or 1 { wake("then") } else { wake("else") }"#),
        "then\n"
    );
}

#[test]
fn test_string_truthiness_in_condition() {
    assert_eq!(run_program(r#"if "" { wake(1) } else { wake(2) }"#), "2\n");
    assert_eq!(run_program(r#"if "x" { wake(1) } else { wake(2) }"#), "1\n");
}

#[test]
fn test_float_truthiness_in_condition() {
    assert_eq!(run_program("if 0.0 { wake(1) } else { wake(2) }"), "2\n");
    assert_eq!(run_program("if 0.1 { wake(1) } else { wake(2) }"), "1\n");
}

#[test]
fn test_else_if_chain_picks_first_truthy_arm() {
    let source = r#"
        x = 2
        if x == 1 { wake("one") }
        else if x == 2 { wake("two") }
        else if x == 3 { wake("three") }
        else { wake("many") }
    "#;
    assert_eq!(run_program(source), "two\n");
}

#[test]
fn test_else_if_chain_falls_through_to_else() {
    let source = r#"
        x = 9
        if x == 1 { wake("one") }
        else if x == 2 { wake("two") }
        else { wake("many") }
    "#;
    assert_eq!(run_program(source), "many\n");
}

#[test]
fn test_nested_if() {
    let source = r#"
        x = 5
        if x > 0 {
            if x > 3 { wake("big") } else { wake("small") }
        }
    "#;
    assert_eq!(run_program(source), "big\n");
}

#[test]
fn test_statements_execute_in_order() {
    assert_eq!(run_program("wake(1) wake(2) wake(3)"), "1\n2\n3\n");
}

// ============================================================================
// Scoping: blocks and branches share the enclosing scope
// ============================================================================

#[test]
fn test_assignment_inside_branch_leaks_outward() {
    let source = r#"
        if 1 { x = 5 }
        wake(x)
    "#;
    assert_eq!(run_program(source), "5\n");
}

#[test]
fn test_assignment_inside_block_leaks_outward() {
    assert_eq!(run_program("{ y = 3 } wake(y)"), "3\n");
}

#[test]
fn test_branch_assignment_mutates_existing_binding() {
    let source = r#"
        x = 1
        if 1 { x = x + 10 }
        wake(x)
    "#;
    assert_eq!(run_program(source), "11\n");
}

#[test]
fn test_reassignment_changes_value_and_type() {
    let source = r#"
        x = 1
        wake(x)
        x = "now text"
        wake(x)
        type(x)
    "#;
    assert_eq!(run_program(source), "1\nnow text\n<type 'string'>\n");
}

#[test]
fn test_variable_reference_in_expressions() {
    let source = r#"
        a = 2
        b = a * 3
        wake(a + b)
    "#;
    assert_eq!(run_program(source), "8\n");
}
