mod common;

use common::assert_stdout;

#[test]
fn scope_ends_at_the_closing_brace() {
    assert_stdout(
        r#"
        var a = "outer";
        {
            var a = "inner";
            print a;
        }
        print a;
        "#,
        "inner\nouter\n",
    );
}

#[test]
fn empty_block_is_a_no_op() {
    assert_stdout(
        r#"
        {}
        print "ok";
        "#,
        "ok\n",
    );
}

#[test]
fn nested_blocks_each_get_their_own_scope() {
    assert_stdout(
        r#"
        var a = "a";
        {
            var b = "b";
            {
                var c = "c";
                print a + b + c;
            }
        }
        "#,
        "abc\n",
    );
}
