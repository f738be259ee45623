mod common;

use common::{assert_failure, assert_stdout};

#[test]
fn printing_a_class_prints_its_name() {
    assert_stdout("class Foo {} print Foo;", "Foo\n");
}

#[test]
fn a_class_can_reference_itself_inside_a_method() {
    assert_stdout(
        r#"
        class Foo {
            whoAmI() { return Foo; }
        }
        print Foo().whoAmI();
        "#,
        "Foo\n",
    );
}

#[test]
fn inheriting_from_itself_is_a_resolve_error() {
    assert_failure("class Foo < Foo {}", 65, "[line 1] Error: A class can't inherit from itself.\n");
}

#[test]
fn subclass_methods_override_base_methods_but_can_still_be_inherited() {
    assert_stdout(
        r#"
        class Base {
            greet() { print "base"; }
        }
        class Derived < Base {}
        Derived().greet();
        "#,
        "base\n",
    );
}
