mod common;

#[cfg(test)]
mod driver_tests {
    use std::io::{self, Write};

    use rox::lox::{Lox, RunStatus};

    use super::common::{self, Session, SharedBuffer};

    /// An output sink whose every write fails.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_driver_01_exit_codes() {
        assert_eq!(RunStatus::Success.exit_code(), 0);
        assert_eq!(RunStatus::CompileError.exit_code(), 65);
        assert_eq!(RunStatus::RuntimeError.exit_code(), 70);
    }

    #[test]
    fn test_driver_02_scan_errors_block_execution() {
        let outcome = common::run("print 1;\nprint @;");

        assert_eq!(outcome.status, RunStatus::CompileError);
        assert_eq!(outcome.stdout, "");
        assert!(outcome
            .stderr
            .starts_with("[line 2] Error: Unexpected character: @\n"));
    }

    #[test]
    fn test_driver_03_all_compile_errors_are_reported() {
        let outcome = common::run("print ;\n\"open");

        assert_eq!(outcome.status, RunStatus::CompileError);
        assert_eq!(
            outcome.stderr,
            "[line 2] Error: Unterminated string.\n[line 1] Error at ';': Expect expression.\n"
        );
    }

    #[test]
    fn test_driver_04_empty_program() {
        let outcome = common::run("");

        assert_eq!(outcome.status, RunStatus::Success);
        assert_eq!(outcome.stdout, "");
        assert_eq!(outcome.stderr, "");
    }

    #[test]
    fn test_driver_05_globals_persist_across_runs() {
        let mut session = Session::new();

        assert_eq!(session.run("var a = 1;"), RunStatus::Success);
        assert_eq!(session.run("a = a + 1;"), RunStatus::Success);
        assert_eq!(session.run("print a;"), RunStatus::Success);

        assert_eq!(session.out.contents(), "2\n");
    }

    #[test]
    fn test_driver_06_closures_survive_later_runs() {
        let mut session = Session::new();

        session.run("fun make() { var n = 10; fun get() { return n; } return get; }");
        session.run("var get = make();");
        session.run("{ var n = 1; var m = 2; print get() + n + m; }");

        assert_eq!(session.out.contents(), "13\n");
        assert_eq!(session.err.contents(), "");
    }

    #[test]
    fn test_driver_07_session_recovers_after_errors() {
        let mut session = Session::new();

        assert_eq!(session.run("print ;"), RunStatus::CompileError);
        assert!(session.lox.reporter().had_error());

        session.lox.reset_errors();
        assert!(!session.lox.reporter().had_error());

        assert_eq!(session.run("print nope;"), RunStatus::RuntimeError);
        assert!(session.lox.reporter().had_runtime_error());

        session.lox.reset_errors();
        assert_eq!(session.run("{ var x = 3; print x; }"), RunStatus::Success);
        assert_eq!(session.out.contents(), "3\n");
    }

    #[test]
    fn test_driver_08_runtime_error_inside_block_restores_scope() {
        let mut session = Session::new();

        session.run("var a = \"global\";");
        assert_eq!(
            session.run("{ var a = \"local\"; print nil + 1; }"),
            RunStatus::RuntimeError
        );
        session.run("print a;");

        assert_eq!(session.out.contents(), "global\n");
    }

    #[test]
    fn test_driver_09_failed_print_is_a_runtime_error() {
        let err = SharedBuffer::default();
        let mut lox = Lox::with_sinks(Box::new(ClosedPipe), Box::new(err.clone()));

        assert_eq!(lox.run("print 1;"), RunStatus::RuntimeError);
        assert!(lox.reporter().had_runtime_error());
        assert!(!lox.reporter().had_error());
        assert_eq!(err.contents(), "pipe closed\n");
    }
}
