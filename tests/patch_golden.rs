use std::fs;
use wpconfig_patcher::{coerce, patch, Change, Directive, Literal, PatchError};

fn load_fixture(name: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{name}"))
        .unwrap_or_else(|err| panic!("failed to load fixture {name}: {err}"))
}

/// Lines that differ between two texts of equal line count.
fn differing_lines(a: &str, b: &str) -> Vec<usize> {
    let a: Vec<_> = a.lines().collect();
    let b: Vec<_> = b.lines().collect();
    assert_eq!(a.len(), b.len(), "line count changed");
    (0..a.len()).filter(|&i| a[i] != b[i]).map(|i| i + 1).collect()
}

#[test]
fn sequence_of_updates_matches_fixture() {
    let input = load_fixture("wp-config.php.input");
    let expected = load_fixture("wp-config.php.expected");

    let steps = [
        (Directive::constant("WP_DEBUG"), coerce("true")),
        (Directive::constant("DB_HOST"), coerce("127.0.0.1:3307")),
        (Directive::variable("table_prefix"), coerce("vp_")),
        (Directive::constant("VERSIONPRESS_GUI"), coerce("html")),
        (Directive::constant("WP_MEMORY_LIMIT"), coerce("256")),
    ];

    let mut text = input;
    for (directive, value) in &steps {
        text = patch(&text, directive, value).expect("patch").text;
    }
    assert_eq!(text, expected);

    // Applying the same steps again is a no-op
    for (directive, value) in &steps {
        let patched = patch(&text, directive, value).expect("patch");
        assert!(patched.is_unchanged(), "{directive} changed on second run");
        text = patched.text;
    }
    assert_eq!(text, expected);
}

#[test]
fn replacement_touches_one_line() {
    let input = load_fixture("wp-config.php.input");
    let patched = patch(&input, &Directive::constant("DB_NAME"), &coerce("vp_site")).unwrap();

    assert_eq!(differing_lines(&input, &patched.text), [10]);
    assert_eq!(
        patched.change,
        Change::Replaced {
            line: 10,
            previous: "'database_name_here'".to_string()
        }
    );
}

#[test]
fn insertion_adds_one_line_before_anchor() {
    let input = load_fixture("wp-config.php.input");
    let patched = patch(&input, &Directive::constant("WP_CACHE"), &coerce("TRUE")).unwrap();

    let before: Vec<_> = input.lines().collect();
    let after: Vec<_> = patched.text.lines().collect();
    assert_eq!(after.len(), before.len() + 1);

    let anchor = before
        .iter()
        .position(|l| l.contains("stop editing!"))
        .unwrap();
    assert_eq!(after[anchor], "define('WP_CACHE', true);");
    assert_eq!(&after[..anchor], &before[..anchor]);
    assert_eq!(&after[anchor + 1..], &before[anchor..]);
}

#[test]
fn indented_declaration_inside_block_is_replaced() {
    let input = load_fixture("wp-config.php.input");
    let patched = patch(
        &input,
        &Directive::constant("ABSPATH"),
        &Literal::raw("__DIR__ . '/'"),
    )
    .unwrap();
    assert!(patched
        .text
        .contains("\tdefine( 'ABSPATH', __DIR__ . '/' );\n"));
    assert_eq!(differing_lines(&input, &patched.text).len(), 1);
}

#[test]
fn missing_anchor_leaves_text_alone() {
    let input = load_fixture("wp-config.php.input")
        .replace("/* That's all, stop editing! Happy blogging. */", "");
    let err = patch(&input, &Directive::constant("WP_CACHE"), &coerce("1")).unwrap_err();
    assert!(matches!(err, PatchError::AnchorNotFound { .. }));
}

#[test]
fn duplicated_declaration_is_ambiguous() {
    let input = load_fixture("wp-config.php.input").replace(
        "define( 'WP_DEBUG', false );",
        "define( 'WP_DEBUG', false );\ndefine( 'WP_DEBUG', true );",
    );
    let err = patch(&input, &Directive::constant("WP_DEBUG"), &coerce("1")).unwrap_err();
    match err {
        PatchError::AmbiguousDeclaration { lines, .. } => assert_eq!(lines, [35, 36]),
        other => panic!("unexpected error: {other}"),
    }
}
