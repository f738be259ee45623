mod common;

use common::{assert_failure, assert_stdout};

#[test]
fn redeclaring_a_local_in_the_same_scope_is_a_resolve_error() {
    assert_failure(
        r#"
        {
            var a = "first";
            var a = "second";
        }
        "#,
        65,
        "[line 4] Error: Already a variable with this name in this scope.\n",
    );
}

#[test]
fn redeclaring_a_global_is_allowed() {
    assert_stdout(
        r#"
        var a = "first";
        var a = "second";
        print a;
        "#,
        "second\n",
    );
}

#[test]
fn a_variable_is_visible_in_nested_blocks() {
    assert_stdout(
        r#"
        var outer = "outer";
        {
            {
                print outer;
            }
        }
        "#,
        "outer\n",
    );
}

#[test]
fn shadowing_a_global_with_a_local_restores_the_global_after_the_block() {
    assert_stdout(
        r#"
        var a = "global";
        {
            var a = "shadow";
            print a;
        }
        print a;
        "#,
        "shadow\nglobal\n",
    );
}

#[test]
fn an_uninitialized_variable_defaults_to_nil() {
    assert_stdout("var a; print a;", "nil\n");
}

#[test]
fn reading_an_undefined_global_is_a_runtime_error() {
    assert_failure("print notDefined;", 70, "Undefined variable 'notDefined'.\n[line 1]\n");
}

#[test]
fn reading_a_variable_in_its_own_initializer_is_a_resolve_error() {
    assert_failure(
        r#"
        var a = "outer";
        {
            var a = a;
        }
        "#,
        65,
        "[line 4] Error: Can't read local variable in its own initializer.\n",
    );
}

#[test]
fn using_a_reserved_word_as_a_variable_name_is_a_syntax_error() {
    assert_failure("var this = 1;", 65, "[line 1] Error at 'this': Expect variable name.\n");
}
