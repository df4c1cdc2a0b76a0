use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::fragment::{Fragment, List, ListItem, Node};

/// Parse a Markdown fragment into a fragment tree.
///
/// Headings become bold paragraphs; code, raw HTML and anything else without
/// a fragment counterpart is kept as literal text.
pub fn parse(markdown: &str) -> Fragment {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut nodes = Vec::new();
    let mut state = ParseState::default();

    for event in parser {
        process_event(event, &mut state, &mut nodes);
    }

    Fragment::new(nodes)
}

#[derive(Default)]
struct ParseState {
    // Current inline content being built
    spans: Vec<Node>,
    // Nested span buffers for bold, italic and links
    span_stack: Vec<Vec<Node>>,

    // Code or raw HTML block, kept verbatim
    literal: Option<String>,

    list_stack: Vec<ListBuilder>,
}

struct ListBuilder {
    ordered: bool,
    items: Vec<ListItem>,
    current_item: Vec<Node>,
}

impl ParseState {
    /// Close the innermost inline buffer, handing its content to `wrap`.
    fn close_span(&mut self, wrap: impl FnOnce(Vec<Node>) -> Vec<Node>) {
        let content = std::mem::take(&mut self.spans);
        if let Some(mut parent) = self.span_stack.pop() {
            parent.extend(wrap(content));
            self.spans = parent;
        }
    }

    /// Route finished block content to the open list item, or to the top level.
    fn emit(&mut self, node: Node, nodes: &mut Vec<Node>) {
        match self.list_stack.last_mut() {
            Some(list) => match node {
                Node::Paragraph(content) => list.current_item.extend(content),
                other => list.current_item.push(other),
            },
            None => nodes.push(node),
        }
    }
}

fn process_event(event: Event, state: &mut ParseState, nodes: &mut Vec<Node>) {
    match event {
        // Headings
        Event::End(TagEnd::Heading(_)) => {
            let content = std::mem::take(&mut state.spans);
            state.emit(Node::Paragraph(vec![Node::Bold(content)]), nodes);
        }

        // Paragraphs
        Event::Start(Tag::Paragraph) => {}
        Event::End(TagEnd::Paragraph) => {
            let content = std::mem::take(&mut state.spans);
            if !content.is_empty() {
                state.emit(Node::Paragraph(content), nodes);
            }
        }

        // Text content
        Event::Text(text) => match state.literal.as_mut() {
            Some(code) => code.push_str(&text),
            None => state.spans.push(Node::Text(text.into_string())),
        },
        Event::Code(code) => {
            state.spans.push(Node::Text(code.into_string()));
        }
        Event::Html(html) => match state.literal.as_mut() {
            Some(block) => block.push_str(&html),
            None => state.spans.push(Node::Text(html.into_string())),
        },
        Event::InlineHtml(html) => {
            state.spans.push(Node::Text(html.into_string()));
        }

        // Bold
        Event::Start(Tag::Strong) => {
            state.span_stack.push(std::mem::take(&mut state.spans));
        }
        Event::End(TagEnd::Strong) => {
            state.close_span(|content| vec![Node::Bold(content)]);
        }

        // Italic
        Event::Start(Tag::Emphasis) => {
            state.span_stack.push(std::mem::take(&mut state.spans));
        }
        Event::End(TagEnd::Emphasis) => {
            state.close_span(|content| vec![Node::Italic(content)]);
        }

        // Links keep their text only
        Event::Start(Tag::Link { .. }) => {
            state.span_stack.push(std::mem::take(&mut state.spans));
        }
        Event::End(TagEnd::Link) => {
            state.close_span(|content| content);
        }

        // Code blocks degrade to a literal paragraph
        Event::Start(Tag::CodeBlock(_)) => {
            state.literal = Some(String::new());
        }
        Event::End(TagEnd::CodeBlock) => {
            emit_literal(state, nodes);
        }

        // Raw HTML blocks as well
        Event::Start(Tag::HtmlBlock) => {
            state.literal = Some(String::new());
        }
        Event::End(TagEnd::HtmlBlock) => {
            emit_literal(state, nodes);
        }

        // Lists
        Event::Start(Tag::List(first_item)) => {
            // Text of a tight parent item comes before its nested list
            let remaining = std::mem::take(&mut state.spans);
            if let Some(parent) = state.list_stack.last_mut() {
                parent.current_item.extend(remaining);
            }
            state.list_stack.push(ListBuilder {
                ordered: first_item.is_some(),
                items: Vec::new(),
                current_item: Vec::new(),
            });
        }
        Event::End(TagEnd::List(_)) => {
            if let Some(builder) = state.list_stack.pop() {
                let list = List {
                    ordered: builder.ordered,
                    items: builder.items,
                };
                state.emit(Node::List(list), nodes);
            }
        }

        Event::Start(Tag::Item) => {
            if let Some(list) = state.list_stack.last_mut() {
                list.current_item.clear();
            }
        }
        Event::End(TagEnd::Item) => {
            let remaining = std::mem::take(&mut state.spans);
            if let Some(list) = state.list_stack.last_mut() {
                list.current_item.extend(remaining);
                let children = std::mem::take(&mut list.current_item);
                list.items.push(ListItem { children });
            }
        }

        // Soft/hard breaks
        Event::SoftBreak => {
            state.spans.push(Node::Text(" ".to_string()));
        }
        Event::HardBreak => {
            state.spans.push(Node::Text("\n".to_string()));
        }

        // Ignore other events
        _ => {}
    }
}

fn emit_literal(state: &mut ParseState, nodes: &mut Vec<Node>) {
    if let Some(text) = state.literal.take() {
        let text = text.trim_end_matches('\n');
        if !text.is_empty() {
            state.emit(Node::Paragraph(vec![Node::text(text)]), nodes);
        }
    }
}
