//! Integration tests for the `@require` / `@extend` transformer.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use quickcheck_macros::quickcheck;
use splice_css::tokenizer::{LexErrorKind, Position};
use splice_css::{TransformError, Transformed, harvest_file, transform_file, transform_str};
use tempfile::TempDir;

/// A directory of stylesheets on disk.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Write `contents` to `name` (relative to the fixture root) and return its path.
    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture subdir");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn transform(&self, name: &str) -> Result<(String, Transformed), TransformError> {
        let mut out = Vec::new();
        let transformed = transform_file(self.path(name), &mut out)?;
        Ok((String::from_utf8(out).expect("utf-8 output"), transformed))
    }

    fn transform_ok(&self, name: &str) -> (String, Transformed) {
        self.transform(name).expect("transform should succeed")
    }
}

/// Helper to transform an in-memory stylesheet that must succeed
fn transform(css: &str) -> (String, Transformed) {
    let mut out = Vec::new();
    let transformed = transform_str("inline.css", css, &mut out).expect("transform should succeed");
    (String::from_utf8(out).expect("utf-8 output"), transformed)
}

/// Helper to transform an in-memory stylesheet that must fail
fn transform_err(css: &str) -> TransformError {
    let mut out = Vec::new();
    transform_str("inline.css", css, &mut out).expect_err("transform should fail")
}

fn file_names(chain: &[PathBuf]) -> Vec<String> {
    chain
        .iter()
        .map(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .expect("file name")
                .to_string()
        })
        .collect()
}

fn declarations(store: &splice_css::RuleStore, selector: &str) -> Vec<String> {
    store
        .get(selector)
        .unwrap_or_else(|| panic!("no rule for {selector}"))
        .to_vec()
}

// Passthrough

#[test]
fn test_stylesheet_without_directives_is_unchanged() {
    let css = r#"@charset "utf-8";
@import url("reset.css") screen;
/* Layout */
<!-- -->
body { margin: 0; padding: 0 }
ul > li + li, a:hover::before { content: "}{;"; }
@media screen and (min-width: 600px) {
  .wide { width: calc(100% - 2em); }
}
@font-face { font-family: "X"; src: url(x.woff2) format("woff2"); }
"#;
    let (output, _) = transform(css);
    assert_eq!(output, css);
}

#[test]
fn test_empty_stylesheet() {
    let (output, transformed) = transform("");
    assert_eq!(output, "");
    assert!(transformed.local.is_empty());
    assert!(transformed.required.is_empty());
}

#[test]
fn test_malformed_urls_pass_through() {
    let css = "a { background: url(a b); }\nb { background: url(img(1).png) no-repeat; }\nc { background: url(x\"y.png); }\n";
    let (output, transformed) = transform(css);
    assert_eq!(output, css);
    assert_eq!(declarations(&transformed.local, "a"), ["background: url(a b);"]);
    assert_eq!(
        declarations(&transformed.local, "b"),
        ["background: url(img(1).png) no-repeat;"]
    );
}

#[test]
fn test_escaped_directive_keyword_passes_through() {
    let css = "@\\72 equire \"missing.css\";\n.y { @Extend .x; }\n";
    let (output, _) = transform(css);
    assert_eq!(output, css);
}

const SELECTORS: &[&str] = &[
    "a",
    ".btn",
    "#main",
    "ul > li",
    ".a .b",
    "h1, h2",
    "a:hover",
    "[type=\"text\"]",
];
const DECLARATIONS: &[&str] = &[
    "color: red;",
    "margin: 0 auto;",
    "background: url(img.png);",
    "content: \"}\";",
    "font: 12px/1.5 sans-serif;",
    "width: calc(100% - 2em);",
    "color: blue",
];
const SPACING: &[&str] = &["", " ", "\n", "\n  ", "\t"];

#[quickcheck]
fn prop_stylesheet_without_directives_is_unchanged(rules: Vec<(u8, u8, u8)>) -> bool {
    let mut css = String::new();
    for (selector, declaration, spacing) in rules {
        let ws = SPACING[usize::from(spacing) % SPACING.len()];
        let wrapped = spacing % 4 == 0;
        if wrapped {
            css.push_str("@media print {");
            css.push_str(ws);
        }
        css.push_str(SELECTORS[usize::from(selector) % SELECTORS.len()]);
        css.push_str(" {");
        css.push_str(ws);
        css.push_str(DECLARATIONS[usize::from(declaration) % DECLARATIONS.len()]);
        css.push_str(ws);
        css.push('}');
        if wrapped {
            css.push_str(ws);
            css.push('}');
        }
        css.push('\n');
        if declaration % 3 == 0 {
            css.push_str("/* note */\n");
        }
    }

    let mut out = Vec::new();
    transform_str("generated.css", &css, &mut out).is_ok() && out == css.as_bytes()
}

// Rule capture

#[test]
fn test_rule_is_captured_locally() {
    let (_, transformed) = transform("a { color: red; }");
    assert_eq!(declarations(&transformed.local, "a"), ["color: red;"]);
    assert!(transformed.required.is_empty());
}

#[test]
fn test_selector_list_records_every_selector() {
    let (_, transformed) = transform("a, b { x: 1; }\n.a, .b { y: 2; }");
    assert_eq!(declarations(&transformed.local, "a"), ["x: 1;"]);
    assert_eq!(declarations(&transformed.local, "b"), ["x: 1;"]);
    assert_eq!(declarations(&transformed.local, ".a"), ["y: 2;"]);
    assert_eq!(declarations(&transformed.local, ".b"), ["y: 2;"]);
}

#[test]
fn test_repeated_selector_appends() {
    let (_, transformed) = transform(".x { a: 1; }\n.x { b: 2; }");
    assert_eq!(declarations(&transformed.local, ".x"), ["a: 1;", "b: 2;"]);
}

#[test]
fn test_empty_body_still_creates_key() {
    let (_, transformed) = transform(".empty {}");
    assert!(transformed.local.contains(".empty"));
    assert!(declarations(&transformed.local, ".empty").is_empty());
}

#[test]
fn test_unterminated_last_declaration() {
    let css = ".x { color: red }";
    let (output, transformed) = transform(css);
    assert_eq!(output, css);
    assert_eq!(declarations(&transformed.local, ".x"), ["color: red;"]);
}

#[test]
fn test_nested_rule_does_not_leak_into_parent() {
    let (_, transformed) = transform(".p { a: 1; .c { b: 2; } d: 3; }");
    assert_eq!(declarations(&transformed.local, ".p"), ["a: 1;", "d: 3;"]);
    assert_eq!(declarations(&transformed.local, ".c"), ["b: 2;"]);
}

#[test]
fn test_rules_inside_media_are_captured() {
    let css = "@media screen {\n  .m { x: 1; }\n}\n";
    let (output, transformed) = transform(css);
    assert_eq!(output, css);
    assert_eq!(declarations(&transformed.local, ".m"), ["x: 1;"]);
}

#[test]
fn test_selector_whitespace_is_normalized() {
    let (_, transformed) = transform("ul  >  li,\n.a\n  .b { x: 1; }");
    assert!(transformed.local.contains("ul>li"));
    assert!(transformed.local.contains(".a .b"));
}

// @require and @extend

#[test]
fn test_require_then_extend() {
    let fixture = Fixture::new();
    let _ = fixture.write("B.css", ".x{color:blue;}");
    let _ = fixture.write("A.css", "@require \"B.css\"; .y{@extend .x;}");

    let (output, transformed) = fixture.transform_ok("A.css");
    assert_eq!(output, " .y{/* @extend .x */\n  color:blue;\n}");
    assert!(!output.contains("@require"));
    assert_eq!(declarations(&transformed.required, ".x"), ["color:blue;"]);
    assert_eq!(declarations(&transformed.local, ".y"), Vec::<String>::new());
    assert!(!transformed.local.contains(".x"));
}

#[test]
fn test_extend_uses_enclosing_indentation() {
    let fixture = Fixture::new();
    let _ = fixture.write("base.css", ".btn {\n  padding: 0;\n  border: none;\n}\n");
    let _ = fixture.write(
        "main.css",
        "@require 'base.css';\n.ok {\n  @extend .btn;\n  color: green;\n}\n",
    );

    let (output, transformed) = fixture.transform_ok("main.css");
    assert_eq!(
        output,
        "\n.ok {\n  /* @extend .btn */\n\n    padding: 0;\n    border: none;\n\n  color: green;\n}\n"
    );
    // Injected declarations are not captured into the local rule.
    assert_eq!(declarations(&transformed.local, ".ok"), ["color: green;"]);
}

#[test]
fn test_extend_missing_selector() {
    let css = ".y {\n  @extend .missing;\n  color: red;\n}\n";
    let (output, transformed) = transform(css);
    assert_eq!(
        output,
        ".y {\n  /* NOT FOUND @extend .missing */\n\n  color: red;\n}\n"
    );
    assert_eq!(declarations(&transformed.local, ".y"), ["color: red;"]);
}

#[test]
fn test_comment_does_not_change_extend_indentation() {
    let fixture = Fixture::new();
    let _ = fixture.write("b.css", ".x{a:1;}");
    let _ = fixture.write("main.css", "@require \"b.css\";.y {\n  /* c */@extend .x;}");

    let (output, _) = fixture.transform_ok("main.css");
    assert_eq!(output, ".y {\n  /* c *//* @extend .x */\n\n    a:1;\n}");
}

#[test]
fn test_extend_empty_fragments() {
    let (output, _) = transform(".y{@extend .a, , .b,;}");
    assert_eq!(
        output,
        ".y{/* NOT FOUND @extend[0] .a */\n/* NOT FOUND @extend[1]  */\n/* NOT FOUND @extend[2] .b */\n}"
    );
}

#[test]
fn test_extend_does_not_see_local_rules() {
    let (output, _) = transform(".x { a: 1; }\n.y { @extend .x; }");
    assert!(output.contains("/* NOT FOUND @extend .x */"));
}

#[test]
fn test_extend_multiple_selectors_are_numbered() {
    let fixture = Fixture::new();
    let _ = fixture.write("b.css", ".a{x:1;}");
    let _ = fixture.write("main.css", "@require 'b.css';\n.y {\n  @extend .a, .missing;\n}\n");

    let (output, _) = fixture.transform_ok("main.css");
    assert_eq!(
        output,
        "\n.y {\n  /* @extend[0] .a */\n\n    x:1;\n\n  /* NOT FOUND @extend[1] .missing */\n\n}\n"
    );
}

#[test]
fn test_extend_selector_is_normalized() {
    let fixture = Fixture::new();
    let _ = fixture.write("b.css", ".a .b { x: 1; }\nul > li { y: 2; }");
    let _ = fixture.write(
        "main.css",
        "@require \"b.css\";\n.p{@extend .a   .b, ul>li, .a.b;}",
    );

    let (output, _) = fixture.transform_ok("main.css");
    assert!(output.contains("/* @extend[0] .a .b */\n  x: 1;\n"));
    assert!(output.contains("/* @extend[1] ul>li */\n  y: 2;\n"));
    assert!(output.contains("/* NOT FOUND @extend[2] .a.b */\n"));
}

#[test]
fn test_required_rules_append_across_files() {
    let fixture = Fixture::new();
    let _ = fixture.write("a.css", ".x{a:1;}");
    let _ = fixture.write("b.css", ".x{b:2;}");
    let _ = fixture.write("main.css", "@require \"a.css\", \"b.css\";\n.y{@extend .x;}");

    let (output, transformed) = fixture.transform_ok("main.css");
    assert_eq!(declarations(&transformed.required, ".x"), ["a:1;", "b:2;"]);
    assert!(output.contains("/* @extend .x */\n  a:1;  b:2;\n"));
}

#[test]
fn test_require_without_commas() {
    let fixture = Fixture::new();
    let _ = fixture.write("a.css", ".x{a:1;}");
    let _ = fixture.write("b.css", ".z{b:2;}");
    let _ = fixture.write("main.css", "@require \"a.css\" 'b.css' ;");

    let (output, transformed) = fixture.transform_ok("main.css");
    assert_eq!(output, "");
    assert!(transformed.required.contains(".x"));
    assert!(transformed.required.contains(".z"));
}

#[test]
fn test_transitive_require_resolves_relative_to_each_file() {
    let fixture = Fixture::new();
    let _ = fixture.write("lib/leaf.css", ".leaf { l: 1; }");
    let _ = fixture.write("lib/mid.css", "@require \"leaf.css\";\n.mid { m: 2; }");
    let _ = fixture.write("main.css", "@require \"lib/mid.css\";\n.y { @extend .leaf, .mid; }");

    let (output, transformed) = fixture.transform_ok("main.css");
    assert!(transformed.required.contains(".leaf"));
    assert!(transformed.required.contains(".mid"));
    assert!(output.contains("/* @extend[0] .leaf */"));
    assert!(output.contains("/* @extend[1] .mid */"));
    assert!(!output.contains("NOT FOUND"));
}

#[test]
fn test_require_from_parent_directory() {
    let fixture = Fixture::new();
    let _ = fixture.write("shared/base.css", ".base { b: 1; }");
    let _ = fixture.write("pages/home.css", "@require \"../shared/base.css\";\n.h{@extend .base;}");

    let (output, _) = fixture.transform_ok("pages/home.css");
    assert!(output.contains("/* @extend .base */\n  b: 1;\n"));
}

#[test]
fn test_extend_inside_required_file_is_a_no_op() {
    let fixture = Fixture::new();
    let _ = fixture.write("b.css", ".x{c:1;} .z{@extend .x;}");
    let _ = fixture.write("main.css", "@require \"b.css\";.q{@extend .z;}");

    let (output, transformed) = fixture.transform_ok("main.css");
    assert!(transformed.required.contains(".z"));
    assert!(declarations(&transformed.required, ".z").is_empty());
    assert_eq!(output, ".q{/* @extend .z */\n\n}");
}

#[test]
fn test_required_output_is_suppressed() {
    let fixture = Fixture::new();
    let _ = fixture.write("b.css", "/* from b */\n.b { x: 1; }\n");
    let _ = fixture.write("main.css", "@require \"b.css\";\n.m { y: 2; }\n");

    let (output, _) = fixture.transform_ok("main.css");
    assert_eq!(output, "\n.m { y: 2; }\n");
}

#[test]
fn test_diamond_require_is_not_a_cycle() {
    let fixture = Fixture::new();
    let _ = fixture.write("base.css", ".base { b: 1; }");
    let _ = fixture.write("left.css", "@require \"base.css\";");
    let _ = fixture.write("right.css", "@require \"base.css\";");
    let _ = fixture.write("main.css", "@require \"left.css\", \"right.css\";");

    let (_, transformed) = fixture.transform_ok("main.css");
    assert_eq!(declarations(&transformed.required, ".base"), ["b: 1;", "b: 1;"]);
}

#[test]
fn test_harvest_file() {
    let fixture = Fixture::new();
    let _ = fixture.write("leaf.css", ".leaf { l: 1; }");
    let _ = fixture.write("root.css", "@require \"leaf.css\";\n.root { r: 2; }");

    let store = harvest_file(fixture.path("root.css")).expect("harvest should succeed");
    assert_eq!(declarations(&store, ".leaf"), ["l: 1;"]);
    assert_eq!(declarations(&store, ".root"), ["r: 2;"]);
    assert_eq!(store.len(), 2);
}

// Errors

#[test]
fn test_cyclic_require() {
    let fixture = Fixture::new();
    let _ = fixture.write("a.css", "@require \"b.css\";");
    let _ = fixture.write("b.css", "@require \"a.css\";");

    match fixture.transform("a.css") {
        Err(TransformError::CyclicRequire { chain }) => {
            assert_eq!(file_names(&chain), ["a.css", "b.css", "a.css"]);
        }
        other => panic!("expected a cyclic require error, got {other:?}"),
    }
}

#[test]
fn test_self_require() {
    let fixture = Fixture::new();
    let _ = fixture.write("self.css", ".a { x: 1; }\n@require \"self.css\";");

    let err = fixture.transform("self.css").expect_err("self require should fail");
    assert!(matches!(&err, TransformError::CyclicRequire { chain } if chain.len() == 2));
    assert!(err.to_string().starts_with("cyclic @require: "));
}

#[test]
fn test_missing_root_file() {
    let fixture = Fixture::new();
    match fixture.transform("absent.css") {
        Err(TransformError::Io { path, .. }) => assert!(path.ends_with("absent.css")),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_missing_required_file_keeps_partial_output() {
    let fixture = Fixture::new();
    let _ = fixture.write("main.css", "a { x: 1; }\n@require \"nope.css\";\nb { y: 2; }");

    let mut out = Vec::new();
    let err = transform_file(fixture.path("main.css"), &mut out).expect_err("missing require");
    match &err {
        TransformError::Io { path, .. } => assert!(path.ends_with("nope.css")),
        other => panic!("expected an I/O error, got {other:?}"),
    }
    assert_eq!(out, b"a { x: 1; }\n");
}

#[test]
fn test_lex_error_names_the_required_file() {
    let fixture = Fixture::new();
    let _ = fixture.write("bad.css", ".x {\n  content: \"oops\n}");
    let _ = fixture.write("main.css", "@require \"bad.css\";");

    match fixture.transform("main.css") {
        Err(TransformError::Lex { path, error }) => {
            assert!(path.ends_with("bad.css"));
            assert_eq!(error.kind, LexErrorKind::NewlineInString);
            assert_eq!(error.position, Position { line: 2, column: 17 });
        }
        other => panic!("expected a lexical error, got {other:?}"),
    }
}

#[test]
fn test_unexpected_eof() {
    assert!(matches!(
        transform_err("a { color: red;"),
        TransformError::UnexpectedEof { .. }
    ));
    assert!(matches!(
        transform_err("@media screen { a { x: 1; }"),
        TransformError::UnexpectedEof { .. }
    ));
    assert!(matches!(
        transform_err("@require "),
        TransformError::UnexpectedEof { .. }
    ));
    assert!(matches!(
        transform_err(".y { @extend .x"),
        TransformError::UnexpectedEof { .. }
    ));
}

#[test]
fn test_unmatched_brace() {
    match transform_err("a {}\n}") {
        TransformError::UnmatchedBrace { path, position } => {
            assert_eq!(path, Path::new("inline.css"));
            assert_eq!(position, Position { line: 2, column: 1 });
        }
        other => panic!("expected an unmatched brace error, got {other:?}"),
    }
}

#[test]
fn test_invalid_require() {
    let err = transform_err("@require base.css;");
    match &err {
        TransformError::InvalidRequire { found, position, .. } => {
            assert_eq!(found, "base");
            assert_eq!(*position, Position { line: 1, column: 10 });
        }
        other => panic!("expected an invalid require error, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "inline.css:1:10: expected a quoted path after @require, found `base`"
    );
}

/// A writer whose every write fails.
struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_write_failure() {
    let err = transform_str("inline.css", "a { x: 1; }", &mut FailingWriter)
        .expect_err("write should fail");
    match &err {
        TransformError::Write(error) => assert_eq!(error.to_string(), "disk full"),
        other => panic!("expected a write error, got {other:?}"),
    }
    assert_eq!(err.to_string(), "failed to write output: disk full");
}

#[test]
fn test_required_files_never_write() {
    let fixture = Fixture::new();
    let _ = fixture.write("b.css", ".x { a: 1; }\n.z { @extend .x; }\n");
    let _ = fixture.write("main.css", "@require \"b.css\";");

    let transformed = transform_file(fixture.path("main.css"), &mut FailingWriter)
        .expect("nothing is written");
    assert!(transformed.required.contains(".x"));
}
