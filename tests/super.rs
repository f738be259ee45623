mod common;

use common::{assert_failure, assert_stdout};

#[test]
fn super_dispatches_to_the_overridden_base_method() {
    assert_stdout(
        r#"
        class Base {
            cook() { print "base"; }
        }
        class Derived < Base {
            cook() {
                super.cook();
                print "derived";
            }
        }
        Derived().cook();
        "#,
        "base\nderived\n",
    );
}

#[test]
fn super_reaches_past_an_intermediate_class_that_does_not_override() {
    assert_stdout(
        r#"
        class A {
            foo() { print "A.foo"; }
        }
        class B < A {}
        class C < B {
            foo() {
                super.foo();
            }
        }
        C().foo();
        "#,
        "A.foo\n",
    );
}

#[test]
fn super_binds_this_to_the_original_receiver() {
    assert_stdout(
        r#"
        class Base {
            name() { return "base"; }
            describe() { print this.name(); }
        }
        class Derived < Base {
            name() { return "derived"; }
        }
        Derived().describe();
        "#,
        "derived\n",
    );
}

#[test]
fn super_outside_a_class_is_a_resolve_error() {
    assert_failure("super.foo();", 65, "[line 1] Error: Can't use 'super' outside of a class.\n");
}

#[test]
fn super_in_a_class_with_no_superclass_is_a_resolve_error() {
    assert_failure(
        r#"
        class A {
            foo() { super.foo(); }
        }
        "#,
        65,
        "[line 3] Error: Can't use 'super' in a class with no superclass.\n",
    );
}

#[test]
fn calling_an_undefined_superclass_method_is_a_runtime_error() {
    assert_failure(
        r#"
        class A {}
        class B < A {
            foo() { super.foo(); }
        }
        B().foo();
        "#,
        70,
        "Undefined property 'foo'.\n[line 4]\n",
    );
}

#[test]
fn a_closure_over_super_still_dispatches_to_the_base_method() {
    assert_stdout(
        r#"
        class Base {
            foo() { print "base"; }
        }
        class Derived < Base {
            foo() {
                fun closure() { super.foo(); }
                closure();
            }
        }
        Derived().foo();
        "#,
        "base\n",
    );
}
