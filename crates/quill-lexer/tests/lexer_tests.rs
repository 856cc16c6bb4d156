use insta::assert_yaml_snapshot;
use quill_lexer::tokenize;

#[test]
fn keywords_snapshot() {
    assert_yaml_snapshot!(tokenize("if then else while do var true false and or not").unwrap());
}

#[test]
fn operators_snapshot() {
    assert_yaml_snapshot!(tokenize("+ - * / % < <= > >= == != =").unwrap());
}

#[test]
fn arithmetic_precedence_snapshot() {
    assert_yaml_snapshot!(tokenize("1 + 2 * 3 - 4 / 2").unwrap());
}

#[test]
fn block_snapshot() {
    assert_yaml_snapshot!(tokenize("{ var x = 1; x + 1 }").unwrap());
}

#[test]
fn function_call_snapshot() {
    assert_yaml_snapshot!(tokenize("f(a, b + 1)").unwrap());
}
