#[cfg(test)]
mod parser_tests {
    use rox as lox;

    use lox::ast::{Expr, Stmt};
    use lox::ast_printer::AstPrinter;
    use lox::parser::Parser;
    use lox::scanner::scan_tokens;

    /// Parse `source` and return the printed statements and rendered errors.
    fn parse(source: &str) -> (Vec<String>, Vec<String>) {
        let (tokens, scan_errors) = scan_tokens(source);
        assert!(scan_errors.is_empty(), "unexpected scan errors: {:?}", scan_errors);

        let mut parser = Parser::new(&tokens);
        let statements = parser.parse();

        let printed = statements.iter().map(AstPrinter::print_stmt).collect();
        let errors = parser.errors().iter().map(|e| e.to_string()).collect();

        (printed, errors)
    }

    fn parse_ok(source: &str) -> Vec<String> {
        let (printed, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);
        printed
    }

    #[test]
    fn test_parser_01_precedence() {
        assert_eq!(parse_ok("1 + 2 * 3;"), vec!["(; (+ 1.0 (* 2.0 3.0)))"]);
        assert_eq!(parse_ok("(1 + 2) * 3;"), vec!["(; (* (group (+ 1.0 2.0)) 3.0))"]);
        assert_eq!(parse_ok("-1 - -2;"), vec!["(; (- (- 1.0) (- 2.0)))"]);
        assert_eq!(
            parse_ok("1 < 2 == !false;"),
            vec!["(; (== (< 1.0 2.0) (! false)))"]
        );
    }

    #[test]
    fn test_parser_02_left_associativity() {
        assert_eq!(parse_ok("1 - 2 - 3;"), vec!["(; (- (- 1.0 2.0) 3.0))"]);
        assert_eq!(parse_ok("8 / 4 / 2;"), vec!["(; (/ (/ 8.0 4.0) 2.0))"]);
    }

    #[test]
    fn test_parser_03_logical_operators() {
        assert_eq!(
            parse_ok("a or b and c;"),
            vec!["(; (or a (and b c)))"]
        );
    }

    #[test]
    fn test_parser_04_assignment_is_right_associative() {
        assert_eq!(parse_ok("a = b = 1;"), vec!["(; (= a (= b 1.0)))"]);
    }

    #[test]
    fn test_parser_05_calls_and_properties() {
        assert_eq!(parse_ok("a.b(c).d;"), vec!["(; (. (call (. a b) c) d))"]);
        assert_eq!(parse_ok("f()(1, 2);"), vec!["(; (call (call f) 1.0 2.0))"]);
        assert_eq!(parse_ok("a.b = 1;"), vec!["(; (= (. a b) 1.0))"]);
        assert_eq!(parse_ok("super.m;"), vec!["(; (super m))"]);
    }

    #[test]
    fn test_parser_06_for_desugars_to_while() {
        assert_eq!(
            parse_ok("for (var i = 0; i < 3; i = i + 1) print i;"),
            vec!["(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"]
        );
    }

    #[test]
    fn test_parser_07_empty_for_clauses() {
        assert_eq!(parse_ok("for (;;) print 1;"), vec!["(while true (print 1.0))"]);

        let (tokens, _) = scan_tokens("for (;;) {}");
        let statements = Parser::new(&tokens).parse();

        match &statements[0] {
            Stmt::While { condition, .. } => {
                assert!(matches!(condition, Expr::Literal(_)));
            }
            other => panic!("expected a while loop, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_08_dangling_else_binds_nearest_if() {
        assert_eq!(
            parse_ok("if (a) if (b) print 1; else print 2;"),
            vec!["(if a (if-else b (print 1.0) (print 2.0)))"]
        );
    }

    #[test]
    fn test_parser_09_declarations() {
        assert_eq!(
            parse_ok("fun add(a, b) { return a + b; }"),
            vec!["(fun add(a b) (return (+ a b)))"]
        );
        assert_eq!(
            parse_ok("class B < A { init() { this.x = 1; } }"),
            vec!["(class B < A (fun init() (; (= (. this x) 1.0))))"]
        );
        assert_eq!(parse_ok("var a;"), vec!["(var a)"]);
    }

    #[test]
    fn test_parser_10_error_format() {
        let (_, errors) = parse("print ;");
        assert_eq!(errors, vec!["[line 1] Error at ';': Expect expression."]);

        let (_, errors) = parse("print 1");
        assert_eq!(errors, vec!["[line 1] Error at end: Expect ';' after value."]);
    }

    #[test]
    fn test_parser_11_recovers_at_statement_boundaries() {
        let (printed, errors) = parse("var = 1;\nprint 2;\nvar x = ;");

        assert_eq!(printed, vec!["(print 2.0)"]);
        assert_eq!(
            errors,
            vec![
                "[line 1] Error at '=': Expect variable name.",
                "[line 3] Error at ';': Expect expression.",
            ]
        );
    }

    #[test]
    fn test_parser_12_invalid_assignment_target_does_not_unwind() {
        let (printed, errors) = parse("1 = 2;\nprint 3;");

        assert_eq!(printed, vec!["(; 1.0)", "(print 3.0)"]);
        assert_eq!(errors, vec!["[line 1] Error at '=': Invalid assignment target."]);

        let (_, errors) = parse("a + b = c;");
        assert_eq!(errors, vec!["[line 1] Error at '=': Invalid assignment target."]);
    }

    #[test]
    fn test_parser_13_argument_limit() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});", args.join(", "));

        let (printed, errors) = parse(&source);

        assert_eq!(printed.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Can't have more than 255 arguments."));

        let args: Vec<String> = (0..255).map(|i| i.to_string()).collect();
        parse_ok(&format!("f({});", args.join(", ")));
    }

    #[test]
    fn test_parser_14_parameter_limit() {
        let params: Vec<String> = (0..256).map(|i| format!("p{i}")).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));

        let (printed, errors) = parse(&source);

        assert_eq!(printed.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Can't have more than 255 parameters."));
    }

    #[test]
    fn test_parser_15_class_cannot_inherit_from_itself() {
        let (_, errors) = parse("class A < A {}");

        assert_eq!(
            errors,
            vec!["[line 1] Error at 'A': A class can't inherit from itself."]
        );
    }

    #[test]
    fn test_parser_16_unclosed_block() {
        let (_, errors) = parse("{ print 1;");

        assert_eq!(errors, vec!["[line 1] Error at end: Expect '}' after block."]);
    }

    #[test]
    fn test_parser_17_single_expression() {
        let (tokens, _) = scan_tokens("1 + 2 * 3");
        let expr = Parser::new(&tokens).parse_expression().unwrap();
        assert_eq!(AstPrinter::print(&expr), "(+ 1.0 (* 2.0 3.0))");

        let (tokens, _) = scan_tokens("1 2");
        let err = Parser::new(&tokens).parse_expression().unwrap_err();
        assert_eq!(
            err.to_string(),
            "[line 1] Error at '2': Expect end of expression."
        );
    }

    #[test]
    fn test_parser_18_expression_ids_are_unique() {
        let (tokens, _) = scan_tokens("a = b; c;");

        let mut parser = Parser::new(&tokens).with_first_id(10);
        let statements = parser.parse();

        let mut ids = Vec::new();
        for stmt in &statements {
            if let Stmt::Expression(expr) = stmt {
                match expr {
                    Expr::Assign { id, value, .. } => {
                        ids.push(*id);
                        if let Expr::Variable { id, .. } = value.as_ref() {
                            ids.push(*id);
                        }
                    }
                    Expr::Variable { id, .. } => ids.push(*id),
                    _ => {}
                }
            }
        }

        // `a` (dropped when turned into an assignment), `b`, the assignment, `c`.
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| id.0 >= 10));
        let mut sorted = ids.clone();
        sorted.sort_by_key(|id| id.0);
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
        assert_eq!(parser.next_id(), 14);
    }

    #[test]
    fn test_parser_19_token_slice_without_eof() {
        let mut parser = Parser::new(&[]);
        assert!(parser.parse().is_empty());
        assert!(!parser.had_error());

        let err = Parser::new(&[]).parse_expression().unwrap_err();
        assert_eq!(err.to_string(), "[line 1] Error at end: Expect expression.");

        // A truncated stream ends as if `EOF` followed it.
        let (tokens, _) = scan_tokens("print 1 +");
        let mut parser = Parser::new(&tokens[..tokens.len() - 1]);
        assert!(parser.parse().is_empty());
        assert_eq!(
            parser.errors()[0].to_string(),
            "[line 1] Error at end: Expect expression."
        );
    }
}
