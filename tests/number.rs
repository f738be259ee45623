mod common;

use common::{assert_failure, assert_stdout};

#[test]
fn a_trailing_dot_with_no_following_digit_is_not_part_of_the_number() {
    assert_stdout("print 1.;", "1\n");
}

#[test]
fn a_leading_dot_is_a_syntax_error() {
    assert_failure(".5;", 65, "[line 1] Error at '.': Expect expression.\n");
}

#[test]
fn integer_and_decimal_literals() {
    assert_stdout(
        r#"
        print 123;
        print 987654;
        print 0;
        print 123.456;
        print 0.001;
        "#,
        "123\n987654\n0\n123.456\n0.001\n",
    );
}

#[test]
fn nan_compares_unequal_to_itself() {
    assert_stdout(
        r#"
        var nan = 0.0 / 0.0;
        print nan == nan;
        print nan != nan;
        "#,
        "false\ntrue\n",
    );
}
