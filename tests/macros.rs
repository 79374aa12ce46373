#[cfg(test)]
mod macro_tests {
    use monkey::ast::{Expression, Program, Statement};
    use monkey::environment::Environment;
    use monkey::error::MonkeyError;
    use monkey::interpreter::Interpreter;
    use monkey::macros::{define_macros, expand_macros};
    use monkey::parser::parse_source;
    use monkey::value::Value;

    fn eval(source: &str) -> Value {
        Interpreter::new()
            .run(source)
            .unwrap_or_else(|e| panic!("failed to run {:?}: {}", source, e))
            .unwrap_or_else(|| panic!("{:?} produced no value", source))
    }

    fn quoted(source: &str) -> String {
        match eval(source) {
            Value::Quote(node) => node.to_string(),
            other => panic!("expected QUOTE for {:?}, got {}", source, other),
        }
    }

    fn expand(source: &str) -> Program {
        let env = Environment::new();
        let mut program = parse_source(source).unwrap();

        define_macros(&mut program, &env);
        expand_macros(program, &env).unwrap()
    }

    fn let_names(program: &Program) -> Vec<&str> {
        program
            .statements
            .iter()
            .map(|stmt| match stmt {
                Statement::Let { name, .. } => name.as_str(),
                other => panic!("expected let statement, got {:?}", other),
            })
            .collect()
    }

    // ── quote / unquote ─────────────────────────────────────────────────

    #[test]
    fn test_quote_leaves_syntax_unevaluated() {
        assert_eq!(quoted("quote(5)"), "5");
        assert_eq!(quoted("quote(5 + 8)"), "(5 + 8)");
        assert_eq!(quoted("quote(foobar)"), "foobar");
        assert_eq!(quoted("quote(foobar + barfoo)"), "(foobar + barfoo)");
        assert_eq!(quoted("quote(fn(x) { y })"), "fn(x) { y }");

        match eval("quote(5)") {
            Value::Quote(node) => assert_eq!(*node, Expression::IntegerLiteral(5)),
            other => panic!("expected QUOTE, got {}", other),
        }
    }

    #[test]
    fn test_unquote_splices_values() {
        assert_eq!(quoted("quote(unquote(4))"), "4");
        assert_eq!(quoted("quote(unquote(4 + 4))"), "8");
        assert_eq!(quoted("quote(8 + unquote(4 + 4))"), "(8 + 8)");
        assert_eq!(quoted("quote(unquote(4 + 4) + 8)"), "(8 + 8)");
        assert_eq!(quoted("let foobar = 8; quote(foobar)"), "foobar");
        assert_eq!(quoted("let foobar = 8; quote(unquote(foobar))"), "8");
        assert_eq!(quoted("quote(unquote(true))"), "true");
        assert_eq!(quoted("quote(unquote(true == false))"), "false");
        assert_eq!(quoted("quote(unquote(quote(4 + 4)))"), "(4 + 4)");
        assert_eq!(
            quoted("let quotedInfix = quote(4 + 4); quote(unquote(4 + 4) + unquote(quotedInfix))"),
            "(8 + (4 + 4))"
        );
        assert_eq!(
            quoted("quote(if (x) { unquote(1 + 1) } else { f(unquote(2 * 2)) })"),
            "if (x) { 2 } else { f(4) }"
        );
    }

    #[test]
    fn test_unquote_requires_single_argument_call() {
        assert_eq!(quoted("quote(unquote(1, 2))"), "unquote(1, 2)");
        assert_eq!(quoted("quote(f(unquote))"), "f(unquote)");
        assert_eq!(quoted("quote(unquote)"), "unquote");
    }

    #[test]
    fn test_quote_faults_are_error_values() {
        match eval("quote(unquote(missing))") {
            Value::Error(message) => assert_eq!(message, "identifier not found: missing"),
            other => panic!("expected ERROR, got {}", other),
        }
        match eval("quote(unquote(fn(x) { x }))") {
            Value::Error(message) => assert_eq!(message, "cannot unquote FUNCTION into syntax"),
            other => panic!("expected ERROR, got {}", other),
        }
        match eval("quote(1, 2)") {
            Value::Error(message) => {
                assert_eq!(message, "wrong number of arguments to quote: want=1, got=2")
            }
            other => panic!("expected ERROR, got {}", other),
        }
    }

    // ── definition pass ─────────────────────────────────────────────────

    #[test]
    fn test_define_macros_binds_and_removes() {
        let env = Environment::new();
        let mut program = parse_source(
            "let number = 1; let function = fn(x, y) { x + y }; let mymacro = macro(x, y) { x + y; };",
        )
        .unwrap();

        define_macros(&mut program, &env);

        assert_eq!(let_names(&program), vec!["number", "function"]);
        assert!(env.borrow().get("number").is_none());
        assert!(env.borrow().get("function").is_none());

        match env.borrow().get("mymacro") {
            Some(Value::Macro(mac)) => {
                assert_eq!(mac.parameters, vec!["x".to_string(), "y".to_string()]);
                assert_eq!(mac.body.to_string(), "{ (x + y) }");
            }
            other => panic!("expected MACRO, got {:?}", other),
        };
    }

    #[test]
    fn test_define_macros_preserves_order() {
        let env = Environment::new();
        let mut program = parse_source(
            "let a = 1; let m1 = macro() { quote(1) }; let b = 2; let m2 = macro() { quote(2) }; let c = 3;",
        )
        .unwrap();

        define_macros(&mut program, &env);

        assert_eq!(let_names(&program), vec!["a", "b", "c"]);
        assert!(matches!(env.borrow().get("m1"), Some(Value::Macro(_))));
        assert!(matches!(env.borrow().get("m2"), Some(Value::Macro(_))));
    }

    #[test]
    fn test_define_macros_only_looks_at_top_level() {
        let env = Environment::new();
        let mut program = parse_source(
            "let f = fn() { let inner = macro() { quote(1) }; 1 }; macro() { quote(2) };",
        )
        .unwrap();

        define_macros(&mut program, &env);

        assert_eq!(program.statements.len(), 2);
        assert!(env.borrow().get("inner").is_none());
    }

    // ── expansion pass ──────────────────────────────────────────────────

    #[test]
    fn test_expand_simple_macros() {
        assert_eq!(
            expand("let infixExpression = macro() { quote(1 + 2); }; infixExpression();"),
            parse_source("(1 + 2)").unwrap()
        );
        assert_eq!(
            expand("let reverse = macro(a, b) { quote(unquote(b) - unquote(a)); }; reverse(2 + 2, 10 - 5);"),
            parse_source("(10 - 5) - (2 + 2)").unwrap()
        );
    }

    #[test]
    fn test_expand_unless_macro() {
        let expanded = expand(
            r#"
            let unless = macro(condition, consequence, alternative) {
                quote(if (!(unquote(condition))) {
                    unquote(consequence);
                } else {
                    unquote(alternative);
                });
            };

            unless(10 > 5, puts(1), puts(2));
            "#,
        );

        assert_eq!(
            expanded,
            parse_source("if (!(10 > 5)) { puts(1) } else { puts(2) }").unwrap()
        );
    }

    #[test]
    fn test_expand_inside_nested_syntax() {
        let expanded = expand(
            "let two = macro() { quote(2) }; let f = fn(x) { if (x) { two() } else { 1 + two() } };",
        );

        assert_eq!(
            expanded,
            parse_source("let f = fn(x) { if (x) { 2 } else { 1 + 2 } };").unwrap()
        );
    }

    #[test]
    fn test_expand_macro_calls_in_generated_syntax() {
        let source = "let one = macro() { quote(1) }; let two = macro() { quote(one() + one()) }; two()";

        assert_eq!(expand(source), parse_source("1 + 1").unwrap());
        assert!(matches!(eval(source), Value::Integer(2)));
    }

    #[test]
    fn test_expand_leaves_ordinary_calls() {
        let source = "let add = fn(a, b) { a + b }; add(1, 2)";

        assert_eq!(expand(source), parse_source(source).unwrap());
    }

    #[test]
    fn test_macro_arguments_are_not_evaluated() {
        assert!(matches!(
            eval("let ignore = macro(x) { quote(1) }; ignore(undefined_name)"),
            Value::Integer(1)
        ));
        assert!(matches!(
            eval("let unless = macro(c, a, b) { quote(if (!(unquote(c))) { unquote(a) } else { unquote(b) }) }; unless(10 > 5, 1, 2)"),
            Value::Integer(2)
        ));
    }

    #[test]
    fn test_non_quote_result_is_fatal() {
        let mut interpreter = Interpreter::new();

        for source in [
            "let bad = macro() { 1 }; bad()",
            "let empty = macro() { }; empty()",
            "let broken = macro() { nope }; broken()",
        ] {
            match interpreter.run(source) {
                Err(MonkeyError::Macro(_)) => {}
                other => panic!("expected macro error for {:?}, got {:?}", source, other),
            }
        }
    }

    #[test]
    fn test_macro_arity_mismatch_is_fatal() {
        match Interpreter::new().run("let m = macro(a) { quote(1) }; m()") {
            Err(MonkeyError::Macro(message)) => assert!(message.contains("takes 1"), "{}", message),
            other => panic!("expected macro error, got {:?}", other),
        }
    }

    #[test]
    fn test_macros_persist_across_session_lines() {
        let mut interpreter = Interpreter::new();

        assert!(interpreter
            .run("let twice = macro(a) { quote(unquote(a) * 2) };")
            .unwrap()
            .is_none());

        match interpreter.run("twice(21)").unwrap() {
            Some(Value::Integer(42)) => {}
            other => panic!("expected 42, got {:?}", other),
        }
    }

    #[test]
    fn test_macro_value_is_not_callable_at_runtime() {
        match eval("let m = macro() { quote(1) }; let f = m; f()") {
            Value::Error(message) => assert_eq!(message, "not a function: MACRO"),
            other => panic!("expected ERROR, got {}", other),
        }
    }
}
