mod common;

use common::{assert_failure, assert_stdout};

#[test]
fn get_and_set_a_field_on_an_instance() {
    assert_stdout(
        r#"
        class Box {}
        var box = Box();
        box.value = 1;
        print box.value;
        box.value = 2;
        print box.value;
        "#,
        "1\n2\n",
    );
}

#[test]
fn fields_shadow_methods_of_the_same_name() {
    assert_stdout(
        r#"
        class Box {
            value() { return "method"; }
        }
        var box = Box();
        print box.value();
        box.value = "field";
        print box.value;
        "#,
        "method\nfield\n",
    );
}

#[test]
fn getting_an_undefined_property_is_a_runtime_error() {
    assert_failure(
        r#"
        class Box {}
        Box().missing;
        "#,
        70,
        "Undefined property 'missing'.\n[line 3]\n",
    );
}

#[test]
fn getting_a_property_on_a_non_instance_is_a_runtime_error() {
    assert_failure("var n = 1; n.foo;", 70, "Only instances have properties.\n[line 1]\n");
}

#[test]
fn setting_a_property_on_a_non_instance_is_a_runtime_error() {
    assert_failure("var n = 1; n.foo = 2;", 70, "Only instances have fields.\n[line 1]\n");
}

#[test]
fn each_instance_has_its_own_fields() {
    assert_stdout(
        r#"
        class Box {}
        var a = Box();
        var b = Box();
        a.value = "a";
        b.value = "b";
        print a.value;
        print b.value;
        "#,
        "a\nb\n",
    );
}
