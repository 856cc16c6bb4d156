//! Golden IR-listing snapshots for representative programs.

use insta::assert_snapshot;

fn lower(source: &str) -> String {
    let tokens = quill_lexer::tokenize(source).expect("tokenize failed");
    let expr = quill_parser::parse(&tokens).expect("parse failed");
    quill_typeck::typecheck(&expr).expect("typecheck failed");
    let ins = quill_ir::generate_ir(&expr).expect("ir generation failed");
    ins.iter().map(|i| i.to_string()).collect::<Vec<_>>().join("\n")
}

#[test]
fn arithmetic_precedence() {
    assert_snapshot!(lower("1 + 2 * 3"));
}

#[test]
fn if_else() {
    assert_snapshot!(lower("if 2 < 3 then 10 else 20"));
}

#[test]
fn while_loop() {
    assert_snapshot!(lower("{ var i = 0; while i < 3 do i = i + 1; i }"));
}

#[test]
fn short_circuit_and() {
    assert_snapshot!(lower("true and false"));
}
