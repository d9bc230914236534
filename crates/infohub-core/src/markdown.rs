//! Markdown rendering for the home page.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

/// Render Markdown to HTML.
///
/// Tables, footnotes, strikethrough, task lists and definition lists are
/// enabled. Fenced code blocks are wrapped in `<div class="codehilite">` and
/// carry a `language-*` class. Output is deterministic for a given input.
pub fn render_markdown(input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_DEFINITION_LIST);

    let mut in_fenced = false;
    let parser = Parser::new_ext(input, options).flat_map(|event| match event {
        Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) => {
            in_fenced = true;
            vec![
                Event::Html(CowStr::Borrowed("<div class=\"codehilite\">")),
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))),
            ]
        }
        Event::End(TagEnd::CodeBlock) if in_fenced => {
            in_fenced = false;
            vec![
                Event::End(TagEnd::CodeBlock),
                Event::Html(CowStr::Borrowed("</div>\n")),
            ]
        }
        other => vec![other],
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}
