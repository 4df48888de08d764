use bel::config::Config;
use bel::error::BelError;
use bel::eval::Machine;
use bel::lexer::tokenize;
use bel::value::{BelValue, FrameId};

fn machine() -> (Machine, FrameId) {
    let mut m = Machine::new(&Config::default());
    let env = m.global_env().unwrap();
    (m, env)
}

fn eval(src: &str) -> Result<BelValue, BelError> {
    let (mut m, env) = machine();
    m.run(src, env)
}

fn eval_printed(src: &str) -> String {
    let (mut m, env) = machine();
    let val = m.run(src, env).unwrap();
    m.print(val)
}

fn read_printed(src: &str) -> String {
    let (mut m, _) = machine();
    let exprs = m.read(src).unwrap();
    assert_eq!(exprs.len(), 1, "{:?} should read as one expression", src);
    m.print(exprs[0])
}

#[test]
fn tokenizing_a_call() {
    assert_eq!(tokenize("(+ 1 1)").unwrap(), vec!["(", "+", "1", "1", ")"]);
}

#[test]
fn reading_pairs_lists_and_nil() {
    assert_eq!(read_printed("(1 . 2)"), "(1 . 2)");
    assert_eq!(read_printed("(1 2 3)"), "(1 2 3)");
    assert_eq!(read_printed("()"), "()");
    assert_eq!(read_printed("nil"), "()");

    let (mut m, _) = machine();
    let both = m.read("() nil").unwrap();
    assert_eq!(both, vec![BelValue::Nil, BelValue::Nil]);
}

#[test]
fn quote_sugar_reads_like_the_long_form() {
    let (mut m, _) = machine();
    let exprs = m.read("'a (quote a)").unwrap();
    assert!(m.equal(exprs[0], exprs[1]));
}

#[test]
fn strings_round_trip() {
    assert_eq!(read_printed(r#""hi""#), r#""hi""#);
    assert_eq!(read_printed(r#""\"""#), r#""\"""#);

    let (mut m, _) = machine();
    let exprs = m.read(r#""\"""#).unwrap();
    let chars = m.heap.list_to_vec(exprs[0]).unwrap();
    assert_eq!(chars, vec![BelValue::Char('"')]);
}

#[test]
fn print_read_print_preserves_structure() {
    let (mut m, _) = machine();
    for src in ["(1 2 3)", "(a . b)", "((1 . 2) (3 . 4) . 5)", "(x (y (z)) ())", "-3"] {
        let original = m.read(src).unwrap()[0];
        let printed = m.print(original);
        let reread = m.read(&printed).unwrap()[0];
        assert!(m.equal(original, reread), "{} -> {}", src, printed);
    }
}

#[test]
fn arithmetic() {
    assert_eq!(eval("(+ 1 2 3 4 5)"), Ok(BelValue::Int(15)));
    assert_eq!(eval("(+)"), Ok(BelValue::Int(0)));
    assert_eq!(eval("(- 20 2 2 2)"), Ok(BelValue::Int(14)));
    assert_eq!(eval("(- 1)"), Ok(BelValue::Int(-1)));
}

#[test]
fn if_only_evaluates_the_winning_branch() {
    assert_eq!(eval("(if nil rubbish 7)"), Ok(BelValue::Int(7)));
    assert_eq!(eval("(if nil rubbish)"), Ok(BelValue::Nil));
    assert_eq!(eval("(if nil a nil b nil c)"), Ok(BelValue::Nil));
}

#[test]
fn set_then_lookup() {
    assert_eq!(eval("(set x 1) x"), Ok(BelValue::Int(1)));
}

#[test]
fn lambda_and_define() {
    assert_eq!(eval("((lambda (x y) (+ x y)) 3 4)"), Ok(BelValue::Int(7)));
    assert_eq!(eval("(define double (x) (+ x x)) (double 4)"), Ok(BelValue::Int(8)));
}

#[test]
fn fixed_arity_closures_check_argument_counts() {
    let err = eval("((lambda (x y) (+ x y)) 3)").unwrap_err();
    assert!(err.is_arity());
    assert_eq!(err, BelError::UnderArgs);

    let err = eval("((lambda (x y) (+ x y)) 3 4 5)").unwrap_err();
    assert_eq!(err, BelError::OverArgs);
}

#[test]
fn definitions_persist_across_runs_in_one_environment() {
    let (mut m, env) = machine();
    m.run("(define pair-up (a b) (cons a b))", env).unwrap();
    m.run("(set one 1)", env).unwrap();
    let val = m.run("(pair-up one '(2 3))", env).unwrap();
    assert_eq!(m.print(val), "(1 2 3)");
}

#[test]
fn strings_are_data() {
    assert_eq!(eval_printed(r#"(car "abc")"#), r"\a");
    assert_eq!(eval_printed(r#"(cdr "abc")"#), r#""bc""#);
    assert_eq!(eval_printed(r#"(cons \x "yz")"#), r#""xyz""#);
    assert_eq!(eval_printed(r#"(cons 1 "yz")"#), r"(1 \y \z)");
}

#[test]
fn list_printing_mode() {
    let mut m = Machine::new(&Config::default().with_print_strings(false));
    let env = m.global_env().unwrap();
    let val = m.run(r#""ab""#, env).unwrap();
    assert_eq!(m.print(val), r"(\a \b)");
}

#[test]
fn errors_carry_useful_messages() {
    assert_eq!(
        eval("(if nil 1 missing)").unwrap_err().to_string(),
        "Error: unbound variable 'missing'"
    );
    assert!(matches!(eval("(car 5)"), Err(BelError::TypeError(_))));
    assert!(matches!(eval("(5 5)"), Err(BelError::NotAProcedure(_))));
    assert!(matches!(eval("(1 2"), Err(BelError::ReadError(_))));
}

#[test]
fn comments_are_ignored() {
    let src = "
        ; add things up
        (+ 1   ; one
           2)  ; two";
    assert_eq!(eval(src), Ok(BelValue::Int(3)));
}

#[test]
fn deeply_nested_lists_round_trip() {
    let worker = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let src = format!("{}x{}", "(".repeat(1100), ")".repeat(1100));
            let (mut m, _) = machine();
            let original = m.read(&src).unwrap()[0];
            let printed = m.print(original);
            assert_eq!(printed, src);
            let reread = m.read(&printed).unwrap()[0];
            assert!(m.equal(original, reread));
        })
        .unwrap();
    worker.join().unwrap();
}
