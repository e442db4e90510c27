//! End-to-end Markdown rendering tests.
#![cfg(test)]

use md2blocks::{
    Block, BlockKind, ColumnType, ConvertOptions, DiagnosticKind, Output, Renderer, TITLE_COLUMN,
    convert,
};

/// Helper to convert Markdown with the default extensions
fn render(markdown: &str) -> Output {
    convert(markdown, ConvertOptions::default()).unwrap()
}

/// Helper to convert Markdown with the base syntax only
fn render_base(markdown: &str) -> Output {
    Renderer::new().convert(markdown).unwrap()
}

fn kinds(output: &Output) -> Vec<BlockKind> {
    output.blocks.iter().map(Block::kind).collect()
}

// =============================================================================
// Headings, paragraphs, quotes
// =============================================================================

mod text_blocks {
    use super::*;

    #[test]
    fn header_levels() {
        for level in 1..=6 {
            let output = render(&format!("{} Owo what's this?", "#".repeat(level)));
            assert_eq!(output.blocks.len(), 1);
            let expected = match level {
                1 => BlockKind::Header,
                2 => BlockKind::SubHeader,
                _ => BlockKind::SubSubHeader,
            };
            assert_eq!(output.blocks[0].kind(), expected);
            assert_eq!(output.blocks[0].title(), Some("Owo what's this?"));

            if level > 3 {
                assert_eq!(output.diagnostics.len(), 1);
                assert_eq!(output.diagnostics[0].kind, DiagnosticKind::HeadingDepth);
                assert!(output.diagnostics[0].message.contains("not supported"));
            } else {
                assert!(output.diagnostics.is_empty());
            }
        }
    }

    #[test]
    fn quote() {
        let output = render("> Quoth thee 'Mr. Obama... Hewwo? MR OBAMA??'");
        assert_eq!(
            output.blocks,
            vec![Block::Quote {
                title: "Quoth thee 'Mr. Obama... Hewwo? MR OBAMA??'".into()
            }]
        );
    }

    #[test]
    fn inline_markup_is_preserved() {
        let output = render("Some **bold**, *italic*, `code` and ~~gone~~ [link](https://a.b)");
        assert_eq!(
            output.blocks,
            vec![Block::text(
                "Some **bold**, *italic*, `code` and ~gone~ [link](https://a.b)"
            )]
        );
    }

    #[test]
    fn escape_sequence_that_is_not_an_escape() {
        let output = render("\\066");
        assert_eq!(output.blocks, vec![Block::text("\\066")]);
    }

    #[test]
    fn real_escape_stays_escaped() {
        let output = render("not \\*bold\\*");
        assert_eq!(output.blocks, vec![Block::text("not \\*bold\\*")]);
    }

    #[test]
    fn escape_opening_a_paragraph() {
        let output = render("\\*not em\\*");
        assert_eq!(output.blocks, vec![Block::text("\\*not em\\*")]);
    }

    #[test]
    fn escape_right_after_markup() {
        let output = render("**bold**\\_tail");
        assert_eq!(output.blocks, vec![Block::text("**bold**\\_tail")]);
    }

    #[test]
    fn thematic_break() {
        let output = render("a\n\n---\n\nb");
        assert_eq!(
            kinds(&output),
            vec![BlockKind::Text, BlockKind::Divider, BlockKind::Text]
        );
    }

    #[test]
    fn hard_break_is_newline() {
        let output = render("line one  \nline two");
        assert_eq!(output.blocks, vec![Block::text("line one\nline two")]);
    }
}

// =============================================================================
// Lists
// =============================================================================

mod lists {
    use super::*;

    #[test]
    fn bulleted() {
        let output = render("* asdf");
        assert_eq!(
            output.blocks,
            vec![Block::BulletedListItem {
                title: "asdf".into(),
                children: vec![]
            }]
        );
    }

    #[test]
    fn numbered() {
        let output = render("1. asdf");
        assert_eq!(
            output.blocks,
            vec![Block::NumberedListItem {
                title: "asdf".into(),
                children: vec![]
            }]
        );
    }

    #[test]
    fn todo_items() {
        let output = render("- [ ] write tests\n- [x] ship it\n- plain");
        assert_eq!(
            output.blocks,
            vec![
                Block::TodoListItem {
                    title: "write tests".into(),
                    checked: false,
                    children: vec![]
                },
                Block::TodoListItem {
                    title: "ship it".into(),
                    checked: true,
                    children: vec![]
                },
                Block::BulletedListItem {
                    title: "plain".into(),
                    children: vec![]
                },
            ]
        );
    }

    #[test]
    fn escaped_checkbox_stays_bulleted() {
        let output = render("- \\[x] not a task");
        assert_eq!(
            output.blocks,
            vec![Block::BulletedListItem {
                title: "\\[x] not a task".into(),
                children: vec![]
            }]
        );
    }

    #[test]
    fn nested() {
        let output = render("* Awoo\n    * Hewwo\n");
        assert_eq!(
            output.blocks,
            vec![Block::BulletedListItem {
                title: "Awoo".into(),
                children: vec![Block::BulletedListItem {
                    title: "Hewwo".into(),
                    children: vec![]
                }]
            }]
        );
    }

    #[test]
    fn mixed_nesting() {
        let output = render("1. first\n   - [x] sub task\n2. second\n");
        assert_eq!(
            output.blocks,
            vec![
                Block::NumberedListItem {
                    title: "first".into(),
                    children: vec![Block::TodoListItem {
                        title: "sub task".into(),
                        checked: true,
                        children: vec![]
                    }]
                },
                Block::NumberedListItem {
                    title: "second".into(),
                    children: vec![]
                },
            ]
        );
    }

    #[test]
    fn item_with_code_block_child() {
        let output = render("- run this:\n\n  ```sh\n  make\n  ```\n");
        let [Block::BulletedListItem { title, children }] = &output.blocks[..] else {
            panic!("expected one item, got {:?}", output.blocks);
        };
        assert_eq!(title, "run this:");
        assert_eq!(
            children,
            &vec![Block::Code {
                language: "Shell".into(),
                code: "make".into()
            }]
        );
    }
}

// =============================================================================
// Images
// =============================================================================

mod images {
    use super::*;

    #[test]
    fn standalone() {
        let output = render("![](https://via.placeholder.com/500)");
        assert_eq!(
            output.blocks,
            vec![Block::image("https://via.placeholder.com/500", None)]
        );
    }

    #[test]
    fn alt_text_is_caption() {
        let output = render("![A cat](cat.png)");
        assert_eq!(
            output.blocks,
            vec![Block::image("cat.png", Some("A cat".to_string()))]
        );
    }

    #[test]
    fn in_link() {
        let output = render("[![](https://via.placeholder.com/500)](https://cobertos.com)");
        assert_eq!(
            output.blocks,
            vec![
                Block::text("[](https://cobertos.com)"),
                Block::image("https://via.placeholder.com/500", None),
            ]
        );
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, DiagnosticKind::ImageInLink);
    }

    #[test]
    fn in_bold_text() {
        let output = render("**texttext![](https://via.placeholder.com/500)texttext**");
        assert_eq!(
            output.blocks,
            vec![
                Block::text("**texttexttexttext**"),
                Block::image("https://via.placeholder.com/500", None),
            ]
        );
    }

    #[test]
    fn reference_image() {
        let output = render("![logo][l]\n\n[l]: img/logo.png \"The logo\"\n");
        assert_eq!(
            output.blocks,
            vec![Block::image("img/logo.png", Some("The logo".to_string()))]
        );
    }

    #[test]
    fn serialized_image_duplicates_source() {
        let output = render("![](a.png)");
        let json = serde_json::to_value(&output.blocks[0]).unwrap();
        assert_eq!(json["kind"], "image");
        assert_eq!(json["source"], "a.png");
        assert_eq!(json["display_source"], "a.png");
    }
}

// =============================================================================
// Code
// =============================================================================

mod code {
    use super::*;

    #[test]
    fn known_languages() {
        for (tag, language) in [
            ("python", "Python"),
            ("JavaScript", "JavaScript"),
            ("rust", "Rust"),
            ("c", "C"),
            ("yml", "Plain Text"),
        ] {
            let output = render(&format!("```{tag}\nx\n```"));
            let [Block::Code { language: got, code }] = &output.blocks[..] else {
                panic!("expected code block for {tag}");
            };
            assert_eq!(got, language, "tag {tag}");
            assert_eq!(code, "x");
        }
    }

    #[test]
    fn unknown_language_warns() {
        let output = render("```klingon\nQapla'\n```");
        assert_eq!(
            output.blocks,
            vec![Block::Code {
                language: "Plain Text".into(),
                code: "Qapla'".into()
            }]
        );
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(
            output.diagnostics[0].kind,
            DiagnosticKind::UnsupportedLanguage
        );
    }

    #[test]
    fn indented_code_is_plain_text() {
        let output = render("    let x = 1;\n");
        assert_eq!(
            output.blocks,
            vec![Block::Code {
                language: "Plain Text".into(),
                code: "let x = 1;".into()
            }]
        );
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn multiline_code_is_verbatim() {
        let source = "```rust\nfn main() {\n    println!(\"**not bold**\");\n}\n```";
        let output = render(source);
        assert_eq!(
            output.blocks,
            vec![Block::Code {
                language: "Rust".into(),
                code: "fn main() {\n    println!(\"**not bold**\");\n}".into()
            }]
        );
    }
}

// =============================================================================
// Tables
// =============================================================================

mod tables {
    use super::*;

    const TABLE: &str = "
|  Awoo   |  Awooo  |  Awoooo |
|---------|---------|---------|
| Test100 | Test200 | Test300 |
|         | Test400 |         |
";

    #[test]
    fn schema_and_rows() {
        let output = render(TABLE);
        let [Block::Table { schema, rows }] = &output.blocks[..] else {
            panic!("expected table, got {:?}", output.blocks);
        };

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.get_index(2).unwrap().0, TITLE_COLUMN);
        let columns: Vec<_> = schema
            .values()
            .map(|c| (c.name.as_str(), c.column_type))
            .collect();
        assert_eq!(
            columns,
            vec![
                ("Awoo", ColumnType::Text),
                ("Awooo", ColumnType::Text),
                ("Awoooo", ColumnType::Title),
            ]
        );

        assert_eq!(
            rows,
            &vec![
                vec!["Test100".to_string(), "Test200".into(), "Test300".into()],
                vec![String::new(), "Test400".into(), String::new()],
            ]
        );
    }

    #[test]
    fn serialized_schema_shape() {
        let output = render(TABLE);
        let json = serde_json::to_value(&output.blocks[0]).unwrap();
        assert_eq!(json["kind"], "table");
        assert_eq!(
            json["schema"]["title"],
            serde_json::json!({"name": "Awoooo", "type": "title"})
        );
        assert_eq!(json["rows"][1], serde_json::json!(["", "Test400", ""]));
    }

    #[test]
    fn image_in_cell_is_dropped() {
        let output = render("| A | B |\n|---|---|\n| ![](x.png) | y |\n");
        let [Block::Table { rows, .. }] = &output.blocks[..] else {
            panic!("expected table");
        };
        assert_eq!(rows[0], vec![String::new(), "y".to_string()]);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, DiagnosticKind::TableCellContent);
    }
}

// =============================================================================
// Extensions
// =============================================================================

mod extensions {
    use super::*;

    #[test]
    fn html_image_tag_becomes_image() {
        let output = render("<img src=\"https://x/y.png\" alt=\"why\">\n");
        assert_eq!(
            output.blocks,
            vec![Block::image("https://x/y.png", Some("why".to_string()))]
        );
    }

    #[test]
    fn inline_html_image_is_hoisted() {
        let output = render("before <img src=\"a.png\"> after");
        assert_eq!(
            output.blocks,
            vec![Block::text("before  after"), Block::image("a.png", None)]
        );
    }

    #[test]
    fn other_html_is_verbatim() {
        let output = render("press <kbd>Ctrl</kbd>");
        assert_eq!(output.blocks, vec![Block::text("press <kbd>Ctrl</kbd>")]);
    }

    #[test]
    fn inline_equation() {
        let output = render("Energy $E = mc^2$ rocks");
        assert_eq!(output.blocks, vec![Block::text("Energy $$E = mc^2$$ rocks")]);
    }

    #[test]
    fn block_equation() {
        let output = render("$$\n\\sum_{i=0}^n i\n$$\n");
        assert_eq!(
            output.blocks,
            vec![Block::Equation {
                latex: "\\\\sum_{i=0}^n i".into()
            }]
        );
    }

    #[test]
    fn quoted_angle_bracket_in_img_attribute() {
        let output = render("<img alt=\"a > b\" src=\"x.png\">\n");
        assert_eq!(
            output.blocks,
            vec![Block::image("x.png", Some("a > b".to_string()))]
        );
    }

    #[test]
    fn html_comment_block_emits_nothing() {
        let output = render("<!-- comment -->\n");
        assert!(output.blocks.is_empty());

        let output = render("before\n\n<!-- hidden -->\n\nafter\n");
        assert_eq!(
            output.blocks,
            vec![Block::text("before"), Block::text("after")]
        );
    }

    #[test]
    fn inline_html_comment_is_dropped() {
        let output = render("keep <!-- drop --> this");
        assert_eq!(output.blocks, vec![Block::text("keep  this")]);
    }

    #[test]
    fn single_line_double_dollars_stay_inline() {
        let output = render("$$x^2$$");
        assert_eq!(output.blocks, vec![Block::text("$$x^2$$")]);
    }

    #[test]
    fn base_renderer_keeps_dollars_and_tags_as_text() {
        let output = render_base("$x$ and <b>y</b>");
        assert_eq!(output.blocks, vec![Block::text("$x$ and <b>y</b>")]);
    }
}

// =============================================================================
// Whole documents
// =============================================================================

mod documents {
    use super::*;

    const DOCUMENT: &str = "# Notes

Intro with **bold** and an image ![pic](pic.png) inline.

> A quote

- [ ] todo
- item
  1. nested

```python
print('hi')
```

| k | v |
|---|---|
| a | 1 |
";

    #[test]
    fn document_order() {
        let output = render(DOCUMENT);
        assert_eq!(
            kinds(&output),
            vec![
                BlockKind::Header,
                BlockKind::Text,
                BlockKind::Image,
                BlockKind::Quote,
                BlockKind::TodoListItem,
                BlockKind::BulletedListItem,
                BlockKind::Code,
                BlockKind::Table,
            ]
        );
        assert_eq!(
            output.blocks[1],
            Block::text("Intro with **bold** and an image  inline.")
        );
        assert_eq!(output.blocks[5].children().len(), 1);
    }

    #[test]
    fn conversion_is_repeatable() {
        let renderer = ConvertOptions::default().renderer();
        let first = renderer.convert(DOCUMENT).unwrap();
        let second = renderer.convert(DOCUMENT).unwrap();

        // Table column keys are random; compare everything else
        let strip = |output: &Output| -> Vec<Block> {
            output
                .blocks
                .iter()
                .filter(|b| b.kind() != BlockKind::Table)
                .cloned()
                .collect()
        };
        assert_eq!(strip(&first), strip(&second));
        assert_eq!(first.diagnostics, second.diagnostics);
    }

    #[test]
    fn no_fragments_cross_the_boundary() {
        let output = render("**a ![](x.png) b** and [![](y.png)](https://z)");
        assert!(
            output
                .blocks
                .iter()
                .all(|block| block.kind() != BlockKind::Fragment)
        );
    }

    #[test]
    fn diagnostics_are_fresh_per_document() {
        let renderer = Renderer::with_default_extensions();
        let noisy = renderer.convert("#### deep").unwrap();
        let quiet = renderer.convert("# shallow").unwrap();
        assert_eq!(noisy.diagnostics.len(), 1);
        assert!(quiet.diagnostics.is_empty());
    }

    #[test]
    fn empty_document() {
        let output = render("");
        assert!(output.blocks.is_empty());
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn output_serializes() {
        let output = render("# Hi\n\n```nope\nx\n```");
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["blocks"][0]["kind"], "header");
        assert_eq!(json["blocks"][1]["title_plaintext"], "x");
        assert_eq!(json["diagnostics"][0]["kind"], "unsupported_language");
        assert_eq!(json["diagnostics"][0]["trail"], "document[0] > code_fence[1]");
    }
}
