use super::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn summary(source: &str) -> String {
    summarize_source(source).unwrap().to_string()
}

#[test]
fn test_function_with_return() {
    assert_eq!(
        summary("def add(a, b):\n    return a + b\n"),
        "Function: add(a, b)\n  Body: return a + b"
    );
}

#[test]
fn test_class_with_documented_methods() {
    let source = r#"class Greeter:
    """Says hello."""

    def __init__(self, name):
        """Store the name."""
        self.name = name

    def greet(self, loud=False):
        msg = "Hello " + self.name
        if loud:
            print(msg)
        return msg
"#;
    assert_eq!(
        summary(source),
        "Class: Greeter\n\
         Function: __init__(self, name)\n  Body: self.name = name\n\
         Function: greet(self, loud)\n  Body: msg = Hello  + self.name | if loud: ... | return msg"
    );
}

#[test]
fn test_unrecognized_statements_are_skipped() {
    let source = "def worker(queue):\n    while True:\n        item = queue.get()\n    del item\n    queue.close()\n    if queue.failed:\n        raise ValueError('x')\n    return len(queue)\n";
    assert_eq!(
        summary(source),
        "Function: worker(queue)\n  Body: queue.close() | if queue.failed: ... | return len"
    );
}

#[test]
fn test_nested_definitions_follow_their_parent() {
    let source = "def outer(x):\n    def inner(y):\n        return y\n    return inner(x)\n\nclass Box:\n    class Meta:\n        pass\n";
    assert_eq!(
        summary(source),
        "Function: outer(x)\n  Body: return inner\n\
         Function: inner(y)\n  Body: return y\n\
         Class: Box\n\
         Class: Meta"
    );
}

#[test]
fn test_loop_and_chained_assignment() {
    let source = "def loop(items):\n    total = count = 0\n    for i, item in enumerate(items):\n        total = total + item\n    return total\n";
    assert_eq!(
        summary(source),
        "Function: loop(items)\n  Body: total, count = 0 | for ... in enumerate: ... | return total"
    );
}

#[test]
fn test_conditions_and_unary_values_render_as_ellipsis() {
    let source = "def check(x):\n    if x > 0:\n        return x\n    return -x\n";
    assert_eq!(
        summary(source),
        "Function: check(x)\n  Body: if ...: ... | return ..."
    );
}

#[test]
fn test_call_arguments_use_python_str() {
    let source = "def configure():\n    setup(0x10, 1e16, None, b'\\x00', 'text', x ** 2, flag=True)\n";
    assert_eq!(
        summary(source),
        "Function: configure()\n  Body: setup(16, 1e+16, None, b'\\x00', text, x ? 2)"
    );
}

#[test]
fn test_only_positional_or_keyword_parameters_are_listed() {
    assert_eq!(
        summary("def f(a, *args, b, **kw):\n    pass\n"),
        "Function: f(a)"
    );
}

#[test]
fn test_async_function_has_no_entry() {
    let source = "async def fetch(url):\n    def helper():\n        pass\n";
    assert_eq!(summary(source), "Function: helper()");
}

#[test]
fn test_module_without_definitions_is_empty() {
    assert_eq!(summary("import os\nx = os.getcwd()\n"), "");
}

#[test]
fn test_comments_do_not_change_summary() {
    let plain = "def f(x):\n    y = x\n    return y\n";
    let commented = "# header\ndef f(x):  # entry\n    # setup\n    y = x\n    return y  # done\n";
    assert_eq!(summary(plain), summary(commented));
}

#[test]
fn test_entry_count_matches_definitions() {
    let source = "class A:\n    def m(self):\n        pass\n\n    def n(self):\n        pass\n\ndef g():\n    pass\n";
    let report = summarize_source(source).unwrap();
    assert_eq!(report.entries().len(), 4);
    assert_eq!(report.to_string().lines().count(), 4);
}

#[test]
fn test_docstring_only_body_fails_to_parse() {
    let err = summarize_source("def f():\n    \"\"\"Only docs.\"\"\"\n").unwrap_err();
    assert!(matches!(err, SummarizeError::Parse(_)));
}

#[test]
fn test_misindented_statement_is_a_parse_error() {
    let err = summarize_source("def f():\n    x = 1\n      y = 2\n    return x\n").unwrap_err();
    assert!(matches!(err, SummarizeError::Parse(_)));
    assert!(summarize_source("x = 1\n    y = 2\n").is_err());
}

#[test]
fn test_concatenated_docstring_leaves_an_unparsable_layout() {
    // only the first literal is dropped, so `'b'` keeps a deeper indent
    let err = summarize_source("def f():\n    '''a''' 'b'\n    return 1\n").unwrap_err();
    let SummarizeError::Parse(ParseError::Syntax { message, .. }) = err else {
        panic!("expected a syntax error");
    };
    assert_eq!(message, "unindent does not match any outer indentation level");
}

#[test]
fn test_deeply_nested_expression_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deep.py");
    let source = format!("def f():\n    return {}a\n", "a + ".repeat(3000));
    fs::write(&path, source).unwrap();

    let summary = summarize_file(&path);
    assert!(summary
        .text()
        .starts_with("Error in parsing code: maximum recursion depth exceeded"));
}

#[test]
fn test_syntax_error_renders_parse_message() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.py");
    fs::write(&path, "def f(x y):\n    pass\n").unwrap();

    let summary = summarize_file(&path);
    assert!(summary.text().starts_with("Error in parsing code: "));
}

#[test]
fn test_tokenize_error_renders_file_message() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("open.py");
    fs::write(&path, "s = '''never closed\n").unwrap();

    let summary = summarize_file(&path);
    assert!(matches!(summary.outcome, Err(SummarizeError::Tokenize(_))));
    assert_eq!(
        summary.text(),
        format!(
            "Error summarizing {}: EOF in multi-line string starting at line 1, column 4",
            path.display()
        )
    );
}

#[test]
fn test_batch_continues_past_failing_files() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("a.py"), "def ok():\n    return 1\n").unwrap();
    fs::write(root.join("b.py"), "def f(:\n").unwrap();
    fs::write(root.join("c.py"), "class C:\n    pass\n").unwrap();

    let options = WalkOptions {
        extensions: vec![".py".to_string()],
        excluded_dirs: vec![],
    };
    let mut seen = Vec::new();
    let summaries = summarize_tree(root, &options, |path: &Path| seen.push(path.to_path_buf()));

    assert_eq!(seen.len(), 3);
    assert_eq!(summaries.len(), 3);
    assert!(summaries[0].is_ok());
    assert!(!summaries[1].is_ok());
    assert_eq!(summaries[2].text(), "Class: C");
}
