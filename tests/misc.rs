mod common;

use common::{assert_failure, assert_stdout};

#[test]
fn an_empty_file_runs_successfully_with_no_output() {
    assert_stdout("", "");
}

#[test]
fn operator_precedence_matches_the_grammar() {
    assert_stdout(
        r#"
        print 2 + 3 * 4;
        print (2 + 3) * 4;
        print 2 * 3 - 4 / 2;
        print !true == false;
        "#,
        "14\n20\n4\ntrue\n",
    );
}

#[test]
fn an_unexpected_character_is_a_scan_error() {
    assert_failure("var a = 1;\nvar b = 2 | 3;", 65, "[line 2] Error: Unexpected character '|'\n");
}
