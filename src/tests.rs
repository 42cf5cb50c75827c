use serde_json::json;

use crate::driver::{self, render_summary};
use crate::error::DriverError;
use crate::filter::{decorate, filter_statements, head_matches};
use crate::tree::*;
use crate::{build_index, compile_source, Document, Options, OutputFormat};

// ── Shared fixture runners ──────────────────────────────────────────

/// Embed fixture files at compile time.
const COMPILE_FIXTURES: &str = include_str!("../test-data/fixtures/compile.json");
const PARSE_ERROR_FIXTURES: &str = include_str!("../test-data/fixtures/parse-errors.json");

fn compiled(source: &str) -> Vec<CompiledStatement> {
    compile_source(source).unwrap().compiled
}

fn document(file: &str, source: &str) -> Document {
    Document::new(file, compile_source(source).unwrap())
}

#[test]
fn test_fixture_compile() {
    let fixtures: Vec<serde_json::Value> = serde_json::from_str(COMPILE_FIXTURES).unwrap();

    for fixture in &fixtures {
        let name = fixture["name"].as_str().unwrap();
        let input = fixture["input"].as_str().unwrap();

        let result = compile_source(input)
            .unwrap_or_else(|err| panic!("Fixture '{}': unexpected syntax error: {}", name, err));
        let actual = serde_json::to_value(&result.compiled).unwrap();
        assert_eq!(
            actual, fixture["expected"],
            "Fixture '{}': compiled output mismatch\n  Got:      {}\n  Expected: {}",
            name, actual, fixture["expected"]
        );
    }
}

#[test]
fn test_fixture_parse_errors() {
    let fixtures: Vec<serde_json::Value> = serde_json::from_str(PARSE_ERROR_FIXTURES).unwrap();

    for fixture in &fixtures {
        let name = fixture["name"].as_str().unwrap();
        let input = fixture["input"].as_str().unwrap();
        let offset = fixture["offset"].as_u64().unwrap() as usize;

        match crate::parser::parse(input) {
            Ok(program) => panic!(
                "Fixture '{}': expected a syntax error for '{}', got {:?}",
                name, input, program
            ),
            Err(err) => assert_eq!(
                err.position.offset, offset,
                "Fixture '{}': error offset mismatch ({})",
                name, err
            ),
        }
    }
}

// ── Parser ──────────────────────────────────────────────────────────

#[test]
fn test_syntax_tree_shape() {
    let program = crate::parser::parse("⊗ a = [x]\nb = { c }").unwrap();
    assert_eq!(
        serde_json::to_value(&program).unwrap(),
        json!({
            "type": "Program",
            "statements": [
                {
                    "type": "Statement",
                    "prefix": true,
                    "head": { "type": "Expression", "text": "a" },
                    "value": {
                        "type": "List",
                        "items": [{ "type": "Expression", "text": "x" }]
                    }
                },
                {
                    "type": "Statement",
                    "prefix": false,
                    "head": { "type": "Expression", "text": "b" },
                    "value": {
                        "type": "Block",
                        "statements": [{
                            "type": "Statement",
                            "prefix": false,
                            "head": { "type": "Expression", "text": "c" }
                        }]
                    }
                }
            ]
        })
    );
}

#[test]
fn test_syntax_error_display() {
    let err = crate::parser::parse("a\nb }").unwrap_err();
    assert_eq!(err.position.line, 1);
    assert_eq!(err.position.column, 2);
    assert_eq!(err.to_string(), "Unexpected trailing content. (at position 4)");
}

#[test]
fn test_lone_prefix_marker_is_dropped() {
    assert!(compiled("⊗;\n⊗ ;").is_empty());
}

#[test]
fn test_compile_is_deterministic() {
    let source = "⊗ |Ψ_Net(x).Flow⟩ = { |Ψ_A⟩ = [1, 2]; b = \"\"\"c.d\"\"\" }";
    let first = serde_json::to_string(&compiled(source)).unwrap();
    let second = serde_json::to_string(&compiled(source)).unwrap();
    assert_eq!(first, second);
}

// ── Compiler ────────────────────────────────────────────────────────

#[test]
fn test_segments_respect_nesting() {
    let stmts = compiled("|Ψ_Foo(a.b).Bar⟩");
    let symbol = stmts[0].head.as_symbol().unwrap();
    assert_eq!(symbol.segments, vec!["Foo(a.b)", "Bar"]);
    assert_eq!(symbol.identifier, "Foo");
}

#[test]
fn test_split_segments_keeps_inner_empties() {
    assert_eq!(
        crate::compiler::split_segments("a..b."),
        vec!["a", "", "b"]
    );
    assert!(crate::compiler::split_segments("").is_empty());
}

#[test]
fn test_compiler_trims_same_whitespace_as_parser() {
    let info = crate::compiler::compile_expression(&crate::ast::Expression::new(
        "\u{FEFF}x\u{0085}",
    ));
    assert_eq!(info, ExpressionInfo::text("x\u{0085}"));

    let symbol = crate::compiler::parse_symbol("|Ψ_\u{FEFF}Net .\u{FEFF}Flow\u{FEFF}⟩").unwrap();
    assert_eq!(symbol.identifier, "Net");
    assert_eq!(symbol.segments, vec!["Net", "Flow"]);
}

#[test]
fn test_empty_symbol_has_no_segments() {
    let symbol = crate::compiler::parse_symbol("|Ψ_⟩").unwrap();
    assert_eq!(symbol.inner, "");
    assert!(symbol.segments.is_empty());
    assert_eq!(symbol.identifier, "");
}

// ── Symbol filter ───────────────────────────────────────────────────

#[test]
fn test_filter_by_raw_returns_statement_unchanged() {
    let stmts = compiled("|Ψ_A⟩ = { x; y }\n|Ψ_B⟩ = 1");
    let filtered = filter_statements(&stmts, "|Ψ_A⟩");
    assert_eq!(filtered, vec![stmts[0].clone()]);
}

#[test]
fn test_filter_keeps_only_matching_children() {
    let stmts = compiled("|Ψ_Root⟩ = {\n |Ψ_Keep⟩ = 1\n |Ψ_Drop⟩ = 2\n}\n|Ψ_Other⟩");
    let filtered = filter_statements(&stmts, "Keep");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].head, stmts[0].head);
    let children = filtered[0].block().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].head.summary(), "|Ψ_Keep⟩");
}

#[test]
fn test_filter_matching_rules() {
    let stmts = compiled("|Ψ_Network(x).Mesh⟩");
    let head = &stmts[0].head;
    assert!(head_matches(head, "|Ψ_Network(x).Mesh⟩"));
    assert!(head_matches(head, "Network"));
    assert!(head_matches(head, "Network(x).Mesh"));
    assert!(head_matches(head, "Mesh"));
    assert!(head_matches(head, "Ψ_Network"));
    assert!(!head_matches(head, "Net"));

    // Decorated match needs the `Ψ_` spelling.
    let bare = compiled("|ΨNetwork⟩");
    assert!(head_matches(&bare[0].head, "Network"));
    assert!(!head_matches(&bare[0].head, "Ψ_Network"));

    assert!(!head_matches(&ExpressionInfo::text("Network"), "Network"));
}

#[test]
fn test_decorate() {
    assert_eq!(decorate("Net"), "Ψ_Net");
    assert_eq!(decorate("Ψ_Net"), "Ψ_Net");
}

// ── Knowledge index ─────────────────────────────────────────────────

#[test]
fn test_index_single_list_document() {
    let index = build_index(&[document("a.|Ψ", "|Ψ_Net(x).Flow⟩ = [a, b, c]")]);
    assert_eq!(
        serde_json::to_value(&index).unwrap(),
        json!({
            "files": [{ "file": "a.|Ψ", "statements": 1, "psiSymbols": 1 }],
            "symbols": [{
                "identifier": "Ψ_Net",
                "occurrences": 1,
                "entries": [{
                    "head": {
                        "raw": "|Ψ_Net(x).Flow⟩",
                        "inner": "Net(x).Flow",
                        "segments": ["Net(x)", "Flow"]
                    },
                    "file": "a.|Ψ",
                    "path": [],
                    "prefix": false,
                    "valueType": "List",
                    "valuePreview": "List(3): a, b, c"
                }]
            }]
        })
    );
}

#[test]
fn test_index_counts_block_children_but_not_list_items() {
    let docs = [
        document(
            "b.|Ψ",
            "|Ψ_Net⟩ = {\n  |Ψ_Net.Inner⟩ = { |Ψ_Net⟩ }\n}\nholder = [|Ψ_Net⟩, |Ψ_Net⟩]",
        ),
        document("a.|Ψ", "|ΨNet⟩\ntext = { |Ψ.Net⟩ }"),
    ];
    let index = build_index(&docs);

    assert_eq!(index.symbols.len(), 1);
    let group = &index.symbols[0];
    assert_eq!(group.identifier, "Ψ_Net");
    assert_eq!(group.occurrences, 5);

    let order: Vec<(&str, String)> = group
        .entries
        .iter()
        .map(|e| (e.file.as_str(), e.path.join(" > ")))
        .collect();
    assert_eq!(
        order,
        vec![
            ("a.|Ψ", "".to_string()),
            ("a.|Ψ", "text".to_string()),
            ("b.|Ψ", "".to_string()),
            ("b.|Ψ", "|Ψ_Net⟩".to_string()),
            ("b.|Ψ", "|Ψ_Net⟩ > |Ψ_Net.Inner⟩".to_string()),
        ]
    );

    assert_eq!(index.files[0].file, "a.|Ψ");
    assert_eq!(index.files[0].statements, 3);
    assert_eq!(index.files[0].psi_symbols, 2);
    assert_eq!(index.files[1].statements, 4);
    assert_eq!(index.files[1].psi_symbols, 3);
}

#[test]
fn test_index_groups_sorted_by_identifier() {
    let index = build_index(&[document("x.|Ψ", "|Ψ_Zeta⟩\n|Ψ_Alpha⟩\n|Ψ_Mid⟩")]);
    let ids: Vec<&str> = index.symbols.iter().map(|g| g.identifier.as_str()).collect();
    assert_eq!(ids, vec!["Ψ_Alpha", "Ψ_Mid", "Ψ_Zeta"]);
}

#[test]
fn test_index_previews() {
    let source = "|Ψ_B⟩ = { a; |Ψ_X⟩; c; d }\n\
                  |Ψ_L⟩ = [1, 2, 3, 4, 5, 6, 7]\n\
                  |Ψ_S⟩ = |Ψ_Target⟩\n\
                  |Ψ_T⟩ = plain words\n\
                  |Ψ_N⟩";
    let index = build_index(&[document("p.|Ψ", source)]);
    let preview = |id: &str| {
        let group = index.symbols.iter().find(|g| g.identifier == id).unwrap();
        let entry = &group.entries[0];
        (entry.value_type.clone(), entry.value_preview.clone())
    };

    assert_eq!(
        preview("Ψ_B"),
        (Some("Block".into()), Some("Block(4): a | |Ψ_X⟩ | c | …".into()))
    );
    assert_eq!(
        preview("Ψ_L"),
        (Some("List".into()), Some("List(7): 1, 2, 3, 4, 5, …".into()))
    );
    assert_eq!(
        preview("Ψ_S"),
        (Some("PsiSymbol".into()), Some("|Ψ_Target⟩".into()))
    );
    assert_eq!(
        preview("Ψ_T"),
        (Some("Text".into()), Some("plain words".into()))
    );
    assert_eq!(preview("Ψ_N"), (None, None));

    let json = serde_json::to_value(&index).unwrap();
    let no_value = json["symbols"]
        .as_array()
        .unwrap()
        .iter()
        .find(|g| g["identifier"] == "Ψ_N")
        .unwrap();
    assert!(no_value["entries"][0].get("valueType").is_none());
    assert!(no_value["entries"][0].get("valuePreview").is_none());
}

// ── Rendering ───────────────────────────────────────────────────────

#[test]
fn test_render_json_single_and_many() {
    let options = Options::default();
    let single = driver::render(vec![document("a.|Ψ", "x")], &options).unwrap();
    let value: serde_json::Value = serde_json::from_str(&single).unwrap();
    assert_eq!(value["file"], "a.|Ψ");
    assert_eq!(value["ast"]["type"], "Program");
    assert!(single.ends_with('\n'));
    assert!(!single.contains("\n  "));

    let many = driver::render(
        vec![document("a.|Ψ", "x"), document("b.|Ψ", "y")],
        &Options {
            pretty: true,
            ..Options::default()
        },
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&many).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert!(many.contains("\n  {"));
}

#[test]
fn test_render_filter_drops_ast_and_unmatched_files() {
    let options = Options {
        symbol: Some("Ψ_Network".to_string()),
        ..Options::default()
    };
    let docs = vec![
        document("a.|Ψ", "|Ψ_Network⟩ = on\n|Ψ_Other⟩"),
        document("b.|Ψ", "nothing here"),
    ];
    let out = driver::render(docs, &options).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["file"], "a.|Ψ");
    assert!(value.get("ast").is_none());
    assert_eq!(value["compiled"].as_array().unwrap().len(), 1);
}

#[test]
fn test_render_filter_without_match_is_empty_result() {
    let options = Options {
        symbol: Some("Missing".to_string()),
        format: OutputFormat::Index,
        ..Options::default()
    };
    let err = driver::render(vec![document("a.|Ψ", "|Ψ_A⟩")], &options).unwrap_err();
    assert!(err.is_empty_result(), "unexpected error: {err}");
}

#[test]
fn test_render_summary() {
    let doc = document(
        "a.|Ψ",
        "⊗ |Ψ_A⟩ = 1\nb\n⊗ c\n|Ψ_D⟩\ne\nf",
    );
    assert_eq!(
        render_summary(&[doc]),
        "a.|Ψ\n  statements: 6\n  prefixed: 2\n  psi_heads: 2\n  preview:\n    - |Ψ_A⟩\n    - b\n    - c\n    - |Ψ_D⟩\n    - e\n"
    );
}

#[test]
fn test_run_reports_missing_inputs() {
    let err = driver::run(&[], &Options::default()).unwrap_err();
    assert!(matches!(err, DriverError::Usage(_)));

    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
    let err = driver::run(&[dir.path().to_path_buf()], &Options::default()).unwrap_err();
    assert!(err.is_empty_result());
}

#[test]
fn test_run_reports_syntax_errors_with_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("bad.|Ψ");
    std::fs::write(&path, "a = {").unwrap();
    let err = driver::run(&[path.clone()], &Options::default()).unwrap_err();
    let DriverError::Syntax { source, .. } = &err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert_eq!(source.message, "Expected '}'.");
    assert!(err.to_string().contains("bad.|Ψ"));
    assert!(!err.to_string().contains("Expected"));
    let cause = std::error::Error::source(&err).map(ToString::to_string);
    assert!(cause.unwrap().contains("Expected '}'."));
}

#[test]
fn test_run_reports_unreadable_document() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("bad.|Ψ");
    std::fs::write(&path, b"\xff\xfe").unwrap();
    let err = driver::run(&[path.clone()], &Options::default()).unwrap_err();
    assert!(matches!(err, DriverError::Io { .. }));
    assert!(!err.is_empty_result());
    assert!(err.to_string().starts_with("Unable to read "));
    assert!(err.to_string().contains("bad.|Ψ"));
}
