use codespan_reporting::diagnostic::Severity;
use markdown_flow::block::BlockType;
use markdown_flow::parser::inline::{
    extract_preserved_content, extract_variables, parse_content_block, parse_interaction_block,
    parse_preserved_content_block,
};
use markdown_flow::{
    Button, EscapeType, Interaction, Parser, Variables, parse_document, process_block_content,
};
use pretty_assertions::assert_eq;

fn parse(source: &str) -> markdown_flow::Document {
    Parser::new(source.to_string(), 0).parse()
}

#[test]
fn content_and_interaction() {
    let document = parse("Hello {{name}}\n---\n?[%{{choice}}Yes|No]");

    assert_eq!(document.blocks.len(), 2);
    assert_eq!(document.blocks[0].block_type, BlockType::Content);
    assert_eq!(document.blocks[0].content, "Hello {{name}}");
    assert_eq!(parse_content_block(&document.blocks[0].content).variables, vec!["name"]);

    assert_eq!(document.blocks[1].block_type, BlockType::Interaction);
    let parsed = parse_interaction_block(&document.blocks[1].content);
    assert_eq!(
        parsed.interaction,
        Interaction::ButtonsOnly {
            variable: Some("choice".to_string()),
            buttons: vec![Button::plain("Yes"), Button::plain("No")],
        }
    );

    assert_eq!(document.variables, vec!["choice", "name"]);
}

#[test]
fn variables_are_deduplicated_and_sorted() {
    let (_, variables) = parse_document("{{b}} {{a}} {{a}}");
    assert_eq!(variables, vec!["a", "b"]);
}

#[test]
fn variables_are_trimmed_and_case_sensitive() {
    let (_, variables) = parse_document("{{ Name }} {{name}}\n---\n%{{ kept }}");
    assert_eq!(variables, vec!["Name", "kept", "name"]);
}

#[test]
fn empty_document() {
    let (blocks, variables) = parse_document("");
    assert!(blocks.is_empty());
    assert!(variables.is_empty());
}

#[test]
fn fully_escaped_block_contributes_only_preserved_variables() {
    let (_, variables) = parse_document("\\{{hidden}} {{also_hidden}} %{{kept}}");
    assert_eq!(variables, vec!["kept"]);
}

#[test]
fn extraction_without_escape_info_takes_everything() {
    assert_eq!(extract_variables("%{{a}} {{b}} {{ c }}", None), vec!["a", "b", "c"]);
}

#[test]
fn preserved_content_keeps_inner_escapes() {
    let parsed = parse_preserved_content_block("===\nKeep \\{{literal}}\n===");
    assert_eq!(parsed.escape_info.original_text, "Keep \\{{literal}}");
    assert_eq!(parsed.processed_content, "Keep {{literal}}");
    assert_eq!(parsed.escape_info.escape_type, EscapeType::Full);
    assert!(parsed.variables.is_empty());

    let (blocks, _) = parse_document("===\nKeep \\{{literal}}\n===");
    let rendered = process_block_content(&blocks[0], &Variables::from([("literal", "X")]));
    assert_eq!(rendered, "Keep {{literal}}");
}

#[test]
fn preserved_content_bodies() {
    assert_eq!(extract_preserved_content("=== inline body ==="), "inline body");
    assert_eq!(extract_preserved_content("===\na\n\nb\n==="), "a\n\nb");
    assert_eq!(extract_preserved_content("no markers"), "no markers");
}

#[test]
fn renders_content_blocks() {
    let document = parse("Hello {{name}}, you are {{age}}.\n---\n===Bye {{name}}===");
    let variables = Variables::from([("name", "Ada")]);
    assert_eq!(
        document.render_block(0, &variables).as_deref(),
        Some("Hello Ada, you are UNKNOWN.")
    );
    assert_eq!(document.render_block(1, &variables).as_deref(), Some("Bye Ada"));
    assert_eq!(document.render_block(2, &variables), None);
}

#[test]
fn interaction_blocks_render_as_written() {
    let document = parse("?[%{{choice}} {{a}} | B]");
    let variables = Variables::from([("a", "1")]);
    assert_eq!(
        document.render_block(0, &variables).as_deref(),
        Some("?[%{{choice}} {{a}} | B]")
    );
}

#[test]
fn partial_escape_stays_live() {
    let document = parse("Score: \\%{{score}} and {{other}}");
    let variables = Variables::from([("score", "10"), ("other", "x")]);
    assert_eq!(
        document.render_block(0, &variables).as_deref(),
        Some("Score: %10 and {{other}}")
    );
}

#[test]
fn full_escape_is_never_substituted() {
    let document = parse("\\{{x}}");
    let variables = Variables::from([("x", "1")]);
    assert_eq!(document.render_block(0, &variables).as_deref(), Some("{{x}}"));
}

#[test]
fn markdown_link_interaction_is_an_error() {
    let source = "Intro\n---\n?[[Docs](https://example.com)]";
    let diagnostics = Parser::new(source.to_string(), 3).diagnostics();

    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.severity, Severity::Error);
    assert!(diagnostic.is_error());
    assert!(diagnostic.message.contains("Markdown link"));
    assert_eq!(diagnostic.block_index, 1);
    assert_eq!(diagnostic.file_id, 3);
    assert_eq!(&source[diagnostic.span.clone()], "?[[Docs](https://example.com)]");
}

#[test]
fn unbalanced_interaction_is_a_warning() {
    let source = "Intro\n---\n?[a]b]";
    let diagnostics = Parser::new(source.to_string(), 0).diagnostics();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].span, 10..16);
    assert_eq!(diagnostics[0].to_diagnostic().labels.len(), 1);
}

#[test]
fn escaped_unbalanced_interaction_warns_at_its_source() {
    let source = "Intro\n---\n\\?[a]b]";
    let diagnostics = Parser::new(source.to_string(), 0).diagnostics();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(&source[diagnostics[0].span.clone()], "\\?[a]b]");
}

#[test]
fn clean_document_has_no_diagnostics() {
    let source = "Hi\n---\n?[%{{c}}A|B]\n---\n\\?[escaped]";
    assert!(Parser::new(source.to_string(), 0).diagnostics().is_empty());
}
