//! Event-driven markdown compiler over pluggable markup renderers.

use marknode_config::RenderOptions;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, TextMergeStream};

use crate::error::RenderError;
use crate::markup::{CellFlags, MarkupRenderer};
use crate::state::{CodeBlockState, ImageState, TableState, escape_html};
use crate::util::heading_level_to_num;

/// Markdown compiler driving a [`MarkupRenderer`].
///
/// Parsing is done by pulldown-cmark. The compiler keeps one string buffer per
/// open construct; when a construct closes, its buffer is handed to the
/// matching renderer callback and the returned string is appended to the
/// enclosing buffer. The root buffer is the compiled output.
///
/// # Example
///
/// ```
/// use marknode_config::RenderOptions;
/// use marknode_renderer::{Compiler, HtmlRenderer};
///
/// let options = RenderOptions::default();
/// let mut renderer = HtmlRenderer::new(&options);
/// let html = Compiler::new(options)
///     .compile("Hello **world**", &mut renderer)
///     .unwrap();
/// assert_eq!(html, "<p>Hello <strong>world</strong></p>");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    options: RenderOptions,
}

impl Compiler {
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Get parser options based on the rendering options.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.options.gfm_extensions() {
            options |= Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM;
        }
        if self.options.smartypants {
            options |= Options::ENABLE_SMART_PUNCTUATION;
        }
        options
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Compile markdown text with `renderer`.
    pub fn compile<R: MarkupRenderer>(
        &self,
        markdown: &str,
        renderer: &mut R,
    ) -> Result<String, RenderError> {
        self.compile_events(TextMergeStream::new(self.create_parser(markdown)), renderer)
    }

    /// Compile a pre-parsed event stream with `renderer`.
    ///
    /// Fails when the stream is not properly nested.
    pub fn compile_events<'a, R, I>(&self, events: I, renderer: &mut R) -> Result<String, RenderError>
    where
        R: MarkupRenderer,
        I: Iterator<Item = Event<'a>>,
    {
        let mut pass = Pass::new(&self.options, renderer);
        for event in events {
            pass.process_event(event)?;
        }
        pass.finish()
    }
}

/// Construct waiting for its end event.
enum FrameKind {
    Root,
    Paragraph,
    Heading(u8),
    BlockQuote,
    HtmlBlock,
    List(Option<u64>),
    Item,
    Table { header: String },
    TableHead,
    TableRow,
    TableCell(CellFlags),
    Emphasis,
    Strong,
    Strikethrough,
    Link { href: String, title: Option<String> },
    /// No callback: content flows into the parent unchanged.
    Passthrough,
}

struct Frame {
    kind: FrameKind,
    end: Option<TagEnd>,
    buffer: String,
}

impl Frame {
    fn new(kind: FrameKind, end: TagEnd) -> Self {
        Self {
            kind,
            end: Some(end),
            buffer: String::new(),
        }
    }
}

/// State of one compilation.
struct Pass<'o, 'r, R> {
    options: &'o RenderOptions,
    renderer: &'r mut R,
    stack: Vec<Frame>,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    pending_image: Option<(String, Option<String>)>,
    /// Plain text of the open heading.
    heading_raw: Option<String>,
}

impl<'o, 'r, R: MarkupRenderer> Pass<'o, 'r, R> {
    fn new(options: &'o RenderOptions, renderer: &'r mut R) -> Self {
        Self {
            options,
            renderer,
            stack: vec![Frame {
                kind: FrameKind::Root,
                end: None,
                buffer: String::with_capacity(1024),
            }],
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            pending_image: None,
            heading_raw: None,
        }
    }

    fn finish(mut self) -> Result<String, RenderError> {
        let open = self.stack.len() - 1
            + usize::from(self.code.is_open())
            + usize::from(self.image.is_active());
        if open > 0 {
            return Err(RenderError::Unclosed { open });
        }
        Ok(self
            .stack
            .pop()
            .map(|root| root.buffer)
            .unwrap_or_default())
    }

    /// Append a rendered string to the innermost open construct.
    fn push(&mut self, content: &str) {
        if let Some(frame) = self.stack.last_mut() {
            frame.buffer.push_str(content);
        }
    }

    fn push_raw_heading_text(&mut self, text: &str) {
        if let Some(raw) = &mut self.heading_raw {
            raw.push_str(text);
        }
    }

    fn process_event(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        if self.image.is_active() {
            self.image_event(event);
            return Ok(());
        }
        if self.code.is_open() {
            return self.code_event(event);
        }

        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => return self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                self.push_raw_heading_text(&code);
                let out = self.renderer.codespan(&escape_html(&code));
                self.push(&out);
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => self.text(&math),
            Event::Html(html) => self.raw_html(&html),
            Event::InlineHtml(html) => {
                let out = self.html_output(&html);
                self.push(&out);
            }
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => {
                let out = self.renderer.br();
                self.push(&out);
            }
            Event::Rule => {
                let out = self.renderer.hr();
                self.push(&out);
            }
            Event::TaskListMarker(checked) => {
                let out = self.renderer.checkbox(checked);
                self.push(&out);
            }
            Event::FootnoteReference(_) => {
                // Not supported
            }
        }
        Ok(())
    }

    /// Events inside image alt text: only text survives.
    fn image_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Image { .. }) => {
                self.image.start();
            }
            Event::End(TagEnd::Image) => {
                if let Some(alt) = self.image.end() {
                    self.finish_image(&alt);
                }
            }
            Event::Text(text) | Event::Code(text) => self.image.push_str(&text),
            Event::SoftBreak | Event::HardBreak => self.image.push_str(" "),
            _ => {}
        }
    }

    fn code_event(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        match event {
            Event::Text(text) => self.code.push_str(&text),
            Event::End(TagEnd::CodeBlock) => {
                if let Some((lang, content)) = self.code.close() {
                    let out = self.renderer.code(&content, lang.as_deref());
                    self.push(&out);
                }
            }
            Event::End(found) => {
                return Err(RenderError::Unbalanced {
                    expected: "end of code block".to_owned(),
                    found: format!("{found:?}"),
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        let end = tag.to_end();
        let kind = match tag {
            Tag::Paragraph => FrameKind::Paragraph,
            Tag::Heading { level, .. } => {
                self.heading_raw = Some(String::new());
                FrameKind::Heading(heading_level_to_num(level))
            }
            Tag::BlockQuote(_) => FrameKind::BlockQuote,
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(ref info) => {
                        info.split_whitespace().next().map(str::to_owned)
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code.open(lang);
                return;
            }
            Tag::HtmlBlock => FrameKind::HtmlBlock,
            Tag::List(start) => FrameKind::List(start),
            Tag::Item => FrameKind::Item,
            Tag::Table(alignments) => {
                self.table.begin(&alignments);
                FrameKind::Table {
                    header: String::new(),
                }
            }
            Tag::TableHead => {
                self.table.enter_head();
                FrameKind::TableHead
            }
            Tag::TableRow => {
                self.table.enter_row();
                FrameKind::TableRow
            }
            Tag::TableCell => FrameKind::TableCell(CellFlags {
                header: self.table.in_head(),
                align: self.table.alignment(),
            }),
            Tag::Emphasis => FrameKind::Emphasis,
            Tag::Strong => FrameKind::Strong,
            Tag::Strikethrough => FrameKind::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => FrameKind::Link {
                href: escape_html(&dest_url),
                title: non_empty(&title),
            },
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text is collected; the image is rendered on its end event
                self.image.start();
                self.pending_image = Some((escape_html(&dest_url), non_empty(&title)));
                return;
            }
            Tag::FootnoteDefinition(_)
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => FrameKind::Passthrough,
        };
        self.stack.push(Frame::new(kind, end));
    }

    fn end_tag(&mut self, tag: TagEnd) -> Result<(), RenderError> {
        let frame = match self.stack.pop() {
            Some(frame) if frame.end == Some(tag) => frame,
            other => {
                let expected = match &other {
                    Some(Frame { end: Some(end), .. }) => format!("end of {end:?}"),
                    _ => "end of document".to_owned(),
                };
                // Root stays in place so the error path leaves a consistent stack
                if let Some(frame) = other {
                    self.stack.push(frame);
                }
                return Err(RenderError::Unbalanced {
                    expected,
                    found: format!("{tag:?}"),
                });
            }
        };

        let content = frame.buffer;
        let out = match frame.kind {
            FrameKind::Root => content,
            FrameKind::Paragraph => self.renderer.paragraph(&content),
            FrameKind::Heading(level) => {
                let raw = self.heading_raw.take().unwrap_or_default();
                self.renderer.heading(&content, level, raw.trim())
            }
            FrameKind::BlockQuote => self.renderer.blockquote(&content),
            FrameKind::HtmlBlock => self.html_output(&content),
            FrameKind::List(start) => self.renderer.list(&content, start.is_some(), start),
            FrameKind::Item => self.renderer.listitem(&content),
            FrameKind::Table { header } => self.renderer.table(&header, &content),
            FrameKind::TableHead => {
                let row = self.renderer.tablerow(&content);
                self.table.leave_head();
                if let Some(Frame {
                    kind: FrameKind::Table { header },
                    ..
                }) = self.stack.last_mut()
                {
                    *header = row;
                }
                return Ok(());
            }
            FrameKind::TableRow => self.renderer.tablerow(&content),
            FrameKind::TableCell(flags) => {
                self.table.advance();
                self.renderer.tablecell(&content, flags)
            }
            FrameKind::Emphasis => self.renderer.em(&content),
            FrameKind::Strong => self.renderer.strong(&content),
            FrameKind::Strikethrough => self.renderer.del(&content),
            FrameKind::Link { href, title } => {
                self.renderer.link(&href, title.as_deref(), &content)
            }
            FrameKind::Passthrough => content,
        };
        self.push(&out);
        Ok(())
    }

    fn finish_image(&mut self, alt: &str) {
        if let Some((src, title)) = self.pending_image.take() {
            let out = self
                .renderer
                .image(&src, title.as_deref(), &escape_html(alt));
            self.push(&out);
        }
    }

    fn text(&mut self, text: &str) {
        self.push_raw_heading_text(text);
        let out = self.renderer.text(&escape_html(text));
        self.push(&out);
    }

    /// Raw HTML lines of an HTML block.
    fn raw_html(&mut self, html: &str) {
        match self.stack.last_mut() {
            Some(Frame {
                kind: FrameKind::HtmlBlock,
                buffer,
                ..
            }) => buffer.push_str(html),
            _ => {
                let out = self.html_output(html);
                self.push(&out);
            }
        }
    }

    /// Raw HTML passes through `html`, or becomes escaped text when sanitizing.
    fn html_output(&mut self, html: &str) -> String {
        if self.options.sanitize {
            self.renderer.text(&escape_html(html))
        } else {
            self.renderer.html(html)
        }
    }

    fn soft_break(&mut self) {
        self.push_raw_heading_text(" ");
        if self.options.breaks {
            let out = self.renderer.br();
            self.push(&out);
        } else {
            self.push("\n");
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| escape_html(s))
}
