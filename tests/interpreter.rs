#[cfg(test)]
mod interpreter_tests {
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    use lox_interpreter as lox;

    use lox::interpreter::Interpreter;
    use lox::parser::Parser;
    use lox::resolver::Resolver;
    use lox::scanner::Scanner;
    use lox::token::Token;
    use lox::LoxError;

    /// Shared capture buffer handed to the interpreter as its writer.
    #[derive(Clone, Default)]
    struct CapturedOutput(Rc<RefCell<Vec<u8>>>);

    impl CapturedOutput {
        fn into_string(self) -> String {
            String::from_utf8(self.0.borrow().clone()).expect("program output should be utf-8")
        }
    }

    impl Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);

            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run the full pipeline on `source`, asserting it scans, parses, and
    /// resolves cleanly.  Returns the evaluation result and the captured
    /// stdout.
    fn run(source: &str) -> (Result<(), LoxError>, String) {
        let out = CapturedOutput::default();
        let mut interpreter = Interpreter::with_writer(Box::new(out.clone()));

        let tokens: Vec<Token> = Scanner::new(source.as_bytes())
            .collect::<lox::Result<_>>()
            .expect("test source should scan");

        let (statements, parse_errors) = Parser::new(tokens).parse();

        assert!(
            parse_errors.is_empty(),
            "unexpected parse errors: {:?}",
            parse_errors
        );

        let resolved = Resolver::new(&mut interpreter).resolve(&statements);

        assert!(resolved.is_ok(), "unexpected resolve errors: {:?}", resolved);

        let result = interpreter.interpret(&statements);

        (result, out.into_string())
    }

    /// Run and require success; returns stdout.
    fn output_of(source: &str) -> String {
        let (result, output) = run(source);

        assert!(result.is_ok(), "unexpected runtime error: {:?}", result);

        output
    }

    /// Run and require a runtime error; returns its rendered form.
    fn error_of(source: &str) -> String {
        let (result, _) = run(source);

        result.expect_err("expected a runtime error").to_string()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Expressions and statements
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn arithmetic() {
        assert_eq!(output_of("print 1 + 2;"), "3\n");
        assert_eq!(output_of("print 7 / 2;"), "3.5\n");
        assert_eq!(output_of("print -(1 + 2) * 3;"), "-9\n");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(output_of("print \"foo\" + \"bar\";"), "foobar\n");
    }

    #[test]
    fn comparison_and_equality() {
        assert_eq!(output_of("print 1 < 2;"), "true\n");
        assert_eq!(output_of("print 2 <= 1;"), "false\n");
        assert_eq!(output_of("print nil == nil;"), "true\n");
        assert_eq!(output_of("print nil == false;"), "false\n");
        assert_eq!(output_of("print \"a\" == \"a\";"), "true\n");
        assert_eq!(output_of("print 1 != 2;"), "true\n");
    }

    #[test]
    fn print_formats() {
        assert_eq!(output_of("print nil;"), "nil\n");
        assert_eq!(output_of("print true;"), "true\n");
        assert_eq!(output_of("print 3.0;"), "3\n");
        assert_eq!(output_of("print clock;"), "<native fn>\n");
        assert_eq!(output_of("fun f() {} print f;"), "<fn f>\n");
        assert_eq!(output_of("class A {} print A;"), "A\n");
        assert_eq!(output_of("class A {} print A();"), "A instance\n");
    }

    #[test]
    fn global_redeclaration_takes_the_last_value() {
        assert_eq!(output_of("var a = \"hi\"; var a = \"bye\"; print a;"), "bye\n");
    }

    #[test]
    fn uninitialized_global_reads_as_nil() {
        assert_eq!(output_of("var x; print x;"), "nil\n");
    }

    #[test]
    fn logical_operators_return_the_deciding_operand() {
        assert_eq!(output_of("print 1 or 2;"), "1\n");
        assert_eq!(output_of("print nil or \"x\";"), "x\n");
        assert_eq!(output_of("print 1 and 2;"), "2\n");
        assert_eq!(output_of("print false and 1;"), "false\n");
    }

    #[test]
    fn and_short_circuits_without_evaluating_the_right_side() {
        let source = "\
fun crash() { print \"boom\"; return 1; }
print nil and crash();";

        assert_eq!(output_of(source), "nil\n");
    }

    #[test]
    fn if_else_uses_truthiness() {
        assert_eq!(output_of("if (0) print \"yes\"; else print \"no\";"), "yes\n");
        assert_eq!(output_of("if (nil) print \"yes\"; else print \"no\";"), "no\n");
        assert_eq!(output_of("if (\"\") print \"yes\";"), "yes\n");
    }

    #[test]
    fn while_loop() {
        let source = "\
var i = 0;
while (i < 3) {
  print i;
  i = i + 1;
}";

        assert_eq!(output_of(source), "0\n1\n2\n");
    }

    #[test]
    fn for_loop_matches_its_while_desugaring() {
        let for_form = "for (var i = 0; i < 3; i = i + 1) print i;";

        let while_form = "\
{
  var i = 0;
  while (i < 3) {
    print i;
    i = i + 1;
  }
}";

        assert_eq!(output_of(for_form), output_of(while_form));
    }

    #[test]
    fn assignment_is_an_expression() {
        assert_eq!(output_of("var a = 1; print a = 2;"), "2\n");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Scoping and closures
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn block_shadowing_restores_the_outer_binding() {
        let source = "\
var a = \"outer\";
{
  var a = \"inner\";
  print a;
}
print a;";

        assert_eq!(output_of(source), "inner\nouter\n");
    }

    #[test]
    fn closures_capture_their_definition_environment() {
        let source = "\
fun makeCounter() {
  var i = 0;
  fun count() {
    i = i + 1;
    return i;
  }
  return count;
}
var c = makeCounter();
print c();
print c();
var d = makeCounter();
print d();";

        assert_eq!(output_of(source), "1\n2\n1\n");
    }

    #[test]
    fn closures_bind_lexically_not_dynamically() {
        // The classic resolver test: `a` inside show must keep meaning the
        // global even after the block declares a local one.
        let source = "\
var a = \"global\";
{
  fun show() {
    print a;
  }
  show();
  var a = \"block\";
  show();
}";

        assert_eq!(output_of(source), "global\nglobal\n");
    }

    #[test]
    fn recursion() {
        let source = "\
fun fib(n) {
  if (n < 2) return n;
  return fib(n - 1) + fib(n - 2);
}
print fib(10);";

        assert_eq!(output_of(source), "55\n");
    }

    #[test]
    fn arguments_evaluate_left_to_right() {
        let source = "\
fun tag(n) {
  print n;
  return n;
}
fun sum(a, b, c) {
  return a + b + c;
}
print sum(tag(1), tag(2), tag(3));";

        assert_eq!(output_of(source), "1\n2\n3\n6\n");
    }

    #[test]
    fn function_with_no_return_yields_nil() {
        assert_eq!(output_of("fun f() {} print f();"), "nil\n");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Classes
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn methods_bind_their_receiver() {
        let source = "\
class Greeter {
  greet(name) {
    print \"hi \" + name;
  }
}
Greeter().greet(\"world\");";

        assert_eq!(output_of(source), "hi world\n");
    }

    #[test]
    fn fields_shadow_methods() {
        let source = "\
class A {
  m() { print \"method\"; }
}
var a = A();
fun field() { print \"field\"; }
a.m = field;
a.m();";

        assert_eq!(output_of(source), "field\n");
    }

    #[test]
    fn this_survives_method_extraction() {
        let source = "\
class Cake {
  taste() {
    print \"The \" + this.flavor + \" cake is delicious!\";
  }
}
var cake = Cake();
cake.flavor = \"chocolate\";
var taste = cake.taste;
taste();";

        assert_eq!(output_of(source), "The chocolate cake is delicious!\n");
    }

    #[test]
    fn initializer_runs_on_construction() {
        let source = "\
class Point {
  init(x, y) {
    this.x = x;
    this.y = y;
  }
}
var p = Point(3, 4);
print p.x + p.y;";

        assert_eq!(output_of(source), "7\n");
    }

    #[test]
    fn initializer_always_returns_its_instance() {
        let source = "\
class A {
  init() { return; }
}
var a = A();
print a.init() == a;";

        assert_eq!(output_of(source), "true\n");
    }

    #[test]
    fn methods_on_the_superclass_chain() {
        let source = "\
class A {
  m() { print \"A\"; }
}
class B < A {}
B().m();";

        assert_eq!(output_of(source), "A\n");
    }

    #[test]
    fn super_dispatches_past_the_override() {
        let source = "\
class A {
  m() { print \"A\"; }
}
class B < A {
  m() {
    super.m();
    print \"B\";
  }
}
B().m();";

        assert_eq!(output_of(source), "A\nB\n");
    }

    #[test]
    fn super_binds_this_to_the_original_receiver() {
        let source = "\
class A {
  name() { return \"A\"; }
  describe() { print \"instance of \" + this.name(); }
}
class B < A {
  name() { return \"B\"; }
  describe() { super.describe(); }
}
B().describe();";

        // super.describe() runs A's body, but this.name() still finds B's.
        assert_eq!(output_of(source), "instance of B\n");
    }

    #[test]
    fn inherited_initializer_sets_fields() {
        let source = "\
class A {
  init(x) { this.x = x; }
}
class B < A {}
print B(9).x;";

        assert_eq!(output_of(source), "9\n");
    }

    #[test]
    fn class_can_refer_to_itself_inside_methods() {
        let source = "\
class Factory {
  make() { return Factory; }
}
print Factory().make();";

        assert_eq!(output_of(source), "Factory\n");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Runtime errors
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn unary_operand_must_be_a_number() {
        assert_eq!(error_of("print -\"x\";"), "Operand must be a number.\n[line 1]");
    }

    #[test]
    fn arithmetic_operands_must_be_numbers() {
        assert_eq!(
            error_of("print 1 * \"x\";"),
            "Operands must be numbers.\n[line 1]"
        );
        assert_eq!(
            error_of("\nprint 1 < \"x\";"),
            "Operands must be numbers.\n[line 2]"
        );
    }

    #[test]
    fn plus_wants_two_numbers_or_two_strings() {
        assert_eq!(
            error_of("print 1 + \"x\";"),
            "Operands must be two numbers or two strings.\n[line 1]"
        );
    }

    #[test]
    fn undefined_variable_read_and_write() {
        assert_eq!(
            error_of("print missing;"),
            "Undefined variable 'missing'.\n[line 1]"
        );
        assert_eq!(
            error_of("missing = 1;"),
            "Undefined variable 'missing'.\n[line 1]"
        );
    }

    #[test]
    fn only_callables_can_be_called() {
        assert_eq!(
            error_of("\"not a fn\"();"),
            "Can only call functions and classes.\n[line 1]"
        );
    }

    #[test]
    fn arity_is_checked() {
        assert_eq!(
            error_of("fun f(a, b) {} f(1);"),
            "Expected 2 arguments but got 1.\n[line 1]"
        );
        assert_eq!(
            error_of("class A { init(x) {} } A();"),
            "Expected 1 arguments but got 0.\n[line 1]"
        );
    }

    #[test]
    fn property_access_requires_an_instance() {
        assert_eq!(
            error_of("print 4.x;"),
            "Only instances have properties.\n[line 1]"
        );
        assert_eq!(
            error_of("true.x = 1;"),
            "Only instances have fields.\n[line 1]"
        );
    }

    #[test]
    fn missing_property_is_reported() {
        assert_eq!(
            error_of("class A {} print A().missing;"),
            "Undefined property 'missing'.\n[line 1]"
        );
    }

    #[test]
    fn missing_super_method_is_reported() {
        let source = "\
class A {}
class B < A {
  m() { super.missing(); }
}
B().m();";

        assert_eq!(error_of(source), "Undefined property 'missing'.\n[line 3]");
    }

    #[test]
    fn superclass_must_be_a_class() {
        assert_eq!(
            error_of("var NotAClass = 1; class A < NotAClass {}"),
            "Superclass must be a class.\n[line 1]"
        );
    }

    #[test]
    fn runtime_error_aborts_the_rest_of_the_program() {
        let (result, output) = run("print 1; print missing; print 2;");

        assert!(result.is_err());
        assert_eq!(output, "1\n");
    }
}
