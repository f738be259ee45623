mod common;

use common::{assert_failure, assert_stdout};

#[test]
fn this_refers_to_the_receiving_instance() {
    assert_stdout(
        r#"
        class Foo {
            bar() { return this; }
        }
        print Foo().bar();
        "#,
        "Foo instance\n",
    );
}

#[test]
fn a_closure_declared_in_a_method_still_sees_this() {
    assert_stdout(
        r#"
        class Foo {
            init() { this.value = "value"; }
            getter() {
                fun get() { return this.value; }
                return get();
            }
        }
        print Foo().getter();
        "#,
        "value\n",
    );
}

#[test]
fn this_at_the_top_level_is_a_resolve_error() {
    assert_failure("print this;", 65, "[line 1] Error: Can't use 'this' outside of a class.\n");
}

#[test]
fn this_inside_a_plain_function_is_a_resolve_error() {
    assert_failure(
        r#"
        fun notAMethod() {
            print this;
        }
        "#,
        65,
        "[line 3] Error: Can't use 'this' outside of a class.\n",
    );
}

#[test]
fn each_instance_binds_its_own_this() {
    assert_stdout(
        r#"
        class Foo {
            init(name) { this.name = name; }
            identify() { return this.name; }
        }
        var a = Foo("a");
        var b = Foo("b");
        print a.identify();
        print b.identify();
        "#,
        "a\nb\n",
    );
}
