//! Code block node conversions

use super::mismatch;
use crate::ast::{Node, NodeKind};
use crate::block::Block;
use crate::error::RenderError;
use crate::render::{DiagnosticKind, RenderContext, Renderer, Rendered, Trail, combine};

/// Language used when a fence has no tag or no match
pub const PLAIN_TEXT: &str = "Plain Text";

/// Syntax highlighting languages the target accepts, spelled exactly as it
/// expects them
pub const LANGUAGES: &[&str] = &[
    "ABAP",
    "Arduino",
    "Bash",
    "BASIC",
    "C",
    "Clojure",
    "CoffeeScript",
    "C++",
    "C#",
    "CSS",
    "Dart",
    "Diff",
    "Docker",
    "Elixir",
    "Elm",
    "Erlang",
    "Flow",
    "Fortran",
    "F#",
    "Gherkin",
    "GLSL",
    "Go",
    "GraphQL",
    "Groovy",
    "Haskell",
    "HTML",
    "Java",
    "JavaScript",
    "JSON",
    "Kotlin",
    "LaTeX",
    "Less",
    "Lisp",
    "LiveScript",
    "Lua",
    "Makefile",
    "Markdown",
    "Markup",
    "MATLAB",
    "Nix",
    "Objective-C",
    "OCaml",
    "Pascal",
    "Perl",
    "PHP",
    PLAIN_TEXT,
    "PowerShell",
    "Prolog",
    "Python",
    "R",
    "Reason",
    "Ruby",
    "Rust",
    "Sass",
    "Scala",
    "Scheme",
    "Scss",
    "Shell",
    "SQL",
    "Swift",
    "TypeScript",
    "VB.Net",
    "Verilog",
    "VHDL",
    "Visual Basic",
    "WebAssembly",
    "XML",
    "YAML",
];

/// First supported language that starts with `tag`, ignoring ASCII case
pub fn match_language(tag: &str) -> Option<&'static str> {
    LANGUAGES.iter().copied().find(|lang| {
        lang.get(..tag.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(tag))
    })
}

/// Convert code block node
pub fn code_fence_to_block(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::CodeFence(code) = node else {
        return Err(mismatch(NodeKind::CodeFence, node, trail));
    };

    let tag = code.language.as_deref().map(str::trim).unwrap_or("");
    let language = if tag.is_empty() {
        PLAIN_TEXT
    } else {
        match match_language(tag) {
            Some(language) => language,
            None => {
                ctx.warn(
                    DiagnosticKind::UnsupportedLanguage,
                    trail,
                    format!(
                        "code block language `{}` has no supported syntax, using {}",
                        tag, PLAIN_TEXT
                    ),
                );
                PLAIN_TEXT
            }
        }
    };

    let (text, blocks) = renderer.render_inline(&code.children, trail, ctx)?;
    Ok(combine(text, blocks, |code| Block::Code {
        language: language.to_string(),
        code,
    }))
}
