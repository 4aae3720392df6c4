mod common;

#[cfg(test)]
mod resolver_tests {
    use rox as lox;

    use lox::interpreter::Interpreter;
    use lox::lox::{Lox, RunStatus};
    use lox::parser::Parser;
    use lox::resolver::Resolver;
    use lox::scanner::scan_tokens;

    use super::common;

    /// Resolve `source` against a fresh interpreter and return rendered errors.
    fn resolve_errors(source: &str) -> Vec<String> {
        let (tokens, scan_errors) = scan_tokens(source);
        assert!(scan_errors.is_empty());

        let mut parser = Parser::new(&tokens);
        let statements = parser.parse();
        assert!(!parser.had_error(), "unexpected parse errors: {:?}", parser.errors());

        let mut interpreter = Interpreter::new();
        let mut resolver = Resolver::new(&mut interpreter);
        resolver.resolve(&statements);

        resolver.errors().iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_resolver_01_clean_program() {
        let errors = resolve_errors(
            "var a = 1;
             fun f(x) { var y = x; { var y = y + 1; } return y; }
             class A { init() { this.a = a; } m() { return this.a; } }
             class B < A { m() { return super.m(); } }",
        );

        // `var y = y + 1` reads the outer y while the inner one is declared.
        assert_eq!(
            errors,
            vec!["[line 2] Error at 'y': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn test_resolver_02_top_level_return() {
        assert_eq!(
            resolve_errors("return 1;"),
            vec!["[line 1] Error at 'return': Can't return from top-level code."]
        );
    }

    #[test]
    fn test_resolver_03_duplicate_local() {
        assert_eq!(
            resolve_errors("{ var a = 1; var a = 2; }"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );

        assert_eq!(
            resolve_errors("fun f(a, a) {}"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn test_resolver_04_globals_may_be_redeclared() {
        assert!(resolve_errors("var a = 1; var a = 2; var b = b;").is_empty());
    }

    #[test]
    fn test_resolver_05_own_initializer() {
        assert_eq!(
            resolve_errors("{ var a = a; }"),
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn test_resolver_06_this_outside_class() {
        assert_eq!(
            resolve_errors("print this;"),
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );

        assert_eq!(
            resolve_errors("fun f() { return this; }"),
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );
    }

    #[test]
    fn test_resolver_07_super_misuse() {
        assert_eq!(
            resolve_errors("super.m();"),
            vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
        );

        assert_eq!(
            resolve_errors("class A { m() { super.m(); } }"),
            vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn test_resolver_08_initializer_return() {
        assert_eq!(
            resolve_errors("class A { init() { return 1; } }"),
            vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
        );

        // A bare return is allowed.
        assert!(resolve_errors("class A { init() { return; } }").is_empty());
    }

    #[test]
    fn test_resolver_09_reports_every_error() {
        let errors = resolve_errors("return;\nprint this;\n{ var a; var a; }");

        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("[line 1]"));
        assert!(errors[1].starts_with("[line 2]"));
        assert!(errors[2].starts_with("[line 3]"));
    }

    #[test]
    fn test_resolver_10_errors_block_execution() {
        let outcome = common::run("print 1;\nreturn 2;");

        assert_eq!(outcome.status, RunStatus::CompileError);
        assert_eq!(outcome.stdout, "");
        assert_eq!(
            outcome.stderr,
            "[line 2] Error at 'return': Can't return from top-level code.\n"
        );
    }

    #[test]
    fn test_resolver_11_binding_is_fixed_at_resolution() {
        let output = common::output_of(
            "var a = \"global\";
             {
               fun showA() { print a; }
               showA();
               var a = \"block\";
               showA();
             }",
        );

        assert_eq!(output, "global\nglobal\n");
    }

    #[test]
    fn test_resolver_12_shadowing_in_nested_blocks() {
        let output = common::output_of(
            "var a = 1;
             {
               var a = 2;
               {
                 var a = 3;
                 print a;
               }
               print a;
             }
             print a;",
        );

        assert_eq!(output, "3\n2\n1\n");
    }

    #[test]
    fn test_resolver_13_compile_without_running() {
        let mut lox = Lox::new();

        let statements = lox.compile("var x = 1; print x;").unwrap();
        assert_eq!(statements.len(), 2);

        let errors = lox.compile("{ var x = x; }").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_compile());
    }
}
