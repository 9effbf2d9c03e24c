//! Renders [`pulldown_cmark`] events into HTML. This follows
//! [`pulldown_cmark::html::push_html`] except for code blocks: their text is
//! buffered until the block ends and then handed to a [`Highlighter`], which
//! builds the wrapper element and runs the transformer hooks on it before it
//! is written out.

use crate::escape::{EscapeHref, EscapeHtml};
use crate::highlight::Highlighter;
use pulldown_cmark::escape::{escape_html, StrWrite};
use pulldown_cmark::{Alignment, CodeBlockKind, CowStr, Event, LinkType, Tag};
use std::io;

enum TableState {
    Head,
    Body,
}

/// A code block whose text is still being collected.
struct PendingCode {
    lang: Option<String>,
    meta: String,
    text: String,
}

impl PendingCode {
    fn new(kind: CodeBlockKind) -> PendingCode {
        match kind {
            CodeBlockKind::Fenced(info) => {
                let info = info.trim();
                let (lang, meta) = match info.find(char::is_whitespace) {
                    Some(i) => (&info[..i], info[i..].trim_start()),
                    None => (info, ""),
                };
                PendingCode {
                    lang: match lang.is_empty() {
                        true => None,
                        false => Some(lang.to_owned()),
                    },
                    meta: meta.to_owned(),
                    text: String::new(),
                }
            }
            CodeBlockKind::Indented => PendingCode {
                lang: None,
                meta: String::new(),
                text: String::new(),
            },
        }
    }
}

/// Renders markdown [`Event`]s into HTML. This is largely modeled after
/// [`pulldown_cmark`]'s private [`HtmlWriter`
/// struct](https://github.com/raphlinus/pulldown-cmark/blob/bf0a1a4938dbd2ec41c3add069b3d361d11731f4/src/html.rs#L36-L50).
pub struct HtmlRenderer<'h> {
    highlighter: &'h Highlighter,
    table_alignments: Vec<Alignment>,
    table_state: TableState,
    table_cell_index: usize,

    /// The code block currently being collected, if any.
    code_block: Option<PendingCode>,

    /// Nesting depth of images whose alt text is being written. Anything
    /// other than text is dropped while this is non-zero.
    image_depth: usize,
}

impl<'a, 'h> HtmlRenderer<'h> {
    pub fn new(highlighter: &'h Highlighter) -> Self {
        HtmlRenderer {
            highlighter,
            table_alignments: Vec::default(),
            table_state: TableState::Head,
            table_cell_index: usize::default(),
            code_block: None,
            image_depth: 0,
        }
    }

    pub fn on_event<W: StrWrite>(
        &mut self,
        w: &mut W,
        event: Event<'a>,
    ) -> io::Result<()> {
        if let Some(pending) = &mut self.code_block {
            match event {
                Event::Text(text) => {
                    pending.text.push_str(&text);
                    return Ok(());
                }
                Event::End(Tag::CodeBlock(_)) => return self.on_code_block_end(w),
                _ => return Ok(()),
            }
        }

        if self.image_depth > 0 {
            return self.on_alt_text_event(w, event);
        }

        match event {
            Event::Start(tag) => self.on_start(w, tag),
            Event::End(tag) => self.on_end(w, tag),
            Event::Code(code) => self.on_code(w, code),
            Event::FootnoteReference(name) => write!(
                w,
                r##"<sup class="footnote-reference"><a href="#{}">{}</a></sup>"##,
                EscapeHtml(&name),
                EscapeHtml(&name),
            ),
            Event::HardBreak => self.on_hard_break(w),
            Event::Html(html) => self.on_html(w, html),
            Event::Rule => self.on_rule(w),
            Event::SoftBreak => self.on_soft_break(w),
            Event::TaskListMarker(checked) => {
                self.on_task_list_marker(w, checked)
            }
            Event::Text(text) => self.on_text(w, text),
        }
    }

    // Inside an image only the text of the alt attribute is written; the
    // closing quote and tag come with the image's end event.
    fn on_alt_text_event<W: StrWrite>(
        &mut self,
        w: &mut W,
        event: Event<'a>,
    ) -> io::Result<()> {
        match event {
            Event::Start(Tag::Image(..)) => {
                self.image_depth += 1;
                Ok(())
            }
            Event::End(Tag::Image(_, _, title)) => {
                self.image_depth -= 1;
                match self.image_depth {
                    0 => match title.is_empty() {
                        true => w.write_str(r#"" />"#),
                        false => write!(w, r#"" title="{}" />"#, EscapeHtml(&title)),
                    },
                    _ => Ok(()),
                }
            }
            Event::Text(text) | Event::Code(text) => escape_html(w, &text),
            Event::SoftBreak | Event::HardBreak => w.write_str(" "),
            _ => Ok(()),
        }
    }

    fn on_code_block_end<W: StrWrite>(&mut self, w: &mut W) -> io::Result<()> {
        match self.code_block.take() {
            Some(pending) => {
                let node = self.highlighter.highlight(
                    &pending.text,
                    pending.lang.as_deref(),
                    &pending.meta,
                );
                write!(w, "{}", node)?;
                w.write_str("\n")
            }
            None => Ok(()),
        }
    }

    fn on_start<W: StrWrite>(
        &mut self,
        w: &mut W,
        tag: Tag<'a>,
    ) -> io::Result<()> {
        match tag {
            Tag::BlockQuote => w.write_str("<blockquote>\n"),
            Tag::CodeBlock(kind) => {
                self.code_block = Some(PendingCode::new(kind));
                Ok(())
            }
            Tag::Emphasis => w.write_str("<em>"),
            Tag::FootnoteDefinition(name) => write!(
                w,
                r#"<div class="footnote-definition" id="{}"><sup class="footnote-definition-label">{}</sup>"#,
                EscapeHtml(&name),
                EscapeHtml(&name),
            ),
            Tag::Heading(size) => write!(w, "<h{}>", size),
            Tag::Image(_link_type, dest, _title) => {
                self.image_depth = 1;
                write!(w, r#"<img src="{}" alt=""#, EscapeHref(&dest))
            }
            Tag::Item => w.write_str("<li>"),
            Tag::Link(LinkType::Email, dest, title) => write!(
                w,
                r#"<a href="mailto:{}" title="{}">"#,
                EscapeHref(&dest),
                EscapeHtml(&title),
            ),
            Tag::Link(_link_type, dest, title) => match title.is_empty() {
                true => write!(w, r#"<a href="{}">"#, EscapeHref(&dest)),
                false => write!(
                    w,
                    r#"<a href="{}" title="{}">"#,
                    EscapeHref(&dest),
                    EscapeHtml(&title),
                ),
            },
            Tag::List(None) => w.write_str("<ul>\n"),
            Tag::List(Some(1)) => w.write_str("<ol>\n"),
            Tag::List(Some(start)) => write!(w, "<ol start=\"{}\">\n", start),
            Tag::Paragraph => w.write_str("<p>"),
            Tag::Strikethrough => w.write_str("<del>"),
            Tag::Strong => w.write_str("<strong>"),
            Tag::Table(alignments) => {
                self.table_alignments = alignments;
                w.write_str("<table>")
            }
            Tag::TableHead => {
                self.table_state = TableState::Head;
                self.table_cell_index = 0;
                w.write_str("<thead><tr>")
            }
            Tag::TableRow => {
                self.table_cell_index = 0;
                w.write_str("<tr>")
            }
            Tag::TableCell => write!(
                w,
                "<{}{}>",
                match self.table_state {
                    TableState::Head => "th",
                    TableState::Body => "td",
                },
                match self.table_alignments.get(self.table_cell_index) {
                    Some(Alignment::Left) => r#" style="text-align: left""#,
                    Some(Alignment::Right) => r#" style="text-align: right""#,
                    Some(Alignment::Center) => r#" style="text-align: center""#,
                    _ => "",
                }
            ),
        }
    }

    fn on_end<W: StrWrite>(&mut self, w: &mut W, tag: Tag) -> io::Result<()> {
        match tag {
            Tag::BlockQuote => w.write_str("</blockquote>\n"),
            Tag::CodeBlock(_) => Ok(()), // handled by on_code_block_end
            Tag::Emphasis => w.write_str("</em>"),
            Tag::FootnoteDefinition(_) => w.write_str("</div>\n"),
            Tag::Heading(level) => write!(w, "</h{}>\n", level),
            Tag::Image(_, _, _) => Ok(()), // handled by on_alt_text_event
            Tag::Item => w.write_str("</li>\n"),
            Tag::Link(_, _, _) => w.write_str("</a>"),
            Tag::List(Some(_)) => w.write_str("</ol>\n"),
            Tag::List(None) => w.write_str("</ul>\n"),
            Tag::Paragraph => w.write_str("</p>\n"),
            Tag::Strikethrough => w.write_str("</del>"),
            Tag::Strong => w.write_str("</strong>"),
            Tag::Table(_) => w.write_str("</tbody></table>\n"),
            Tag::TableHead => {
                self.table_state = TableState::Body;
                w.write_str("</tr></thead><tbody>")
            }
            Tag::TableRow => w.write_str("</tr>"),
            Tag::TableCell => {
                self.table_cell_index += 1;
                w.write_str(match self.table_state {
                    TableState::Head => "</th>",
                    TableState::Body => "</td>",
                })
            }
        }
    }

    fn on_text<W: StrWrite>(
        &mut self,
        w: &mut W,
        s: CowStr,
    ) -> io::Result<()> {
        escape_html(w, &s)
    }

    fn on_code<W: StrWrite>(
        &mut self,
        w: &mut W,
        s: CowStr,
    ) -> io::Result<()> {
        write!(w, "<code>{}</code>", EscapeHtml(&s))
    }

    fn on_html<W: StrWrite>(
        &mut self,
        w: &mut W,
        s: CowStr,
    ) -> io::Result<()> {
        w.write_str(&s)
    }

    fn on_soft_break<W: StrWrite>(&mut self, w: &mut W) -> io::Result<()> {
        w.write_str("\n")
    }

    fn on_hard_break<W: StrWrite>(&mut self, w: &mut W) -> io::Result<()> {
        w.write_str("<br />\n")
    }

    fn on_rule<W: StrWrite>(&mut self, w: &mut W) -> io::Result<()> {
        w.write_str("<hr />\n")
    }

    fn on_task_list_marker<W: StrWrite>(
        &mut self,
        w: &mut W,
        checked: bool,
    ) -> io::Result<()> {
        write!(
            w,
            r#"<input disabled="" type="checkbox" {}/>"#,
            match checked {
                true => r#"checked="" "#,
                false => "",
            }
        )
    }
}

/// Converts [`Event`]s into an HTML string much like
/// `pulldown_cmark::html::push_html`, except that code blocks are built by
/// `highlighter`.
pub fn push_html<'a, I>(
    out: &mut String,
    events: I,
    highlighter: &Highlighter,
) -> io::Result<()>
where
    I: Iterator<Item = Event<'a>>,
{
    let mut renderer = HtmlRenderer::new(highlighter);
    for event in events {
        renderer.on_event(out, event)?;
    }
    Ok(())
}
