mod common;

use common::assert_failure;

#[test]
fn calling_a_number_is_a_runtime_error() {
    assert_failure("var x = 1; x();", 70, "Can only call functions and classes.\n[line 1]\n");
}

#[test]
fn calling_a_string_is_a_runtime_error() {
    assert_failure(r#"var x = "str"; x();"#, 70, "Can only call functions and classes.\n[line 1]\n");
}

#[test]
fn calling_nil_is_a_runtime_error() {
    assert_failure("var x = nil; x();", 70, "Can only call functions and classes.\n[line 1]\n");
}

#[test]
fn calling_a_bool_is_a_runtime_error() {
    assert_failure("var x = true; x();", 70, "Can only call functions and classes.\n[line 1]\n");
}

#[test]
fn wrong_argument_count_is_a_runtime_error() {
    assert_failure(
        "fun f(a, b) { return a + b; } f(1);",
        70,
        "Expected 2 arguments but got 1.\n[line 1]\n",
    );
}
