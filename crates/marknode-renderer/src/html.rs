//! HTML markup renderer.
//!
//! Produces semantic HTML5 output. This is the compiler's plain string
//! renderer; [`NodeRenderer`](crate::NodeRenderer) is the node-producing one.

use marknode_config::RenderOptions;

use crate::markup::{CellFlags, MarkupRenderer};
use crate::sanitize::sanitize_destination;
use crate::state::{Slugger, escape_html};

/// HTML markup renderer.
///
/// Produces semantic HTML5 with:
/// - `<pre><code>` for code blocks
/// - anchor ids on headings
/// - `style="text-align:..."` on aligned table cells
/// - links and images whose destination fails sanitization rendered as their text
pub struct HtmlRenderer {
    sanitize: bool,
    slugger: Slugger,
}

impl HtmlRenderer {
    #[must_use]
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            sanitize: options.sanitize,
            slugger: Slugger::default(),
        }
    }
}

fn title_attr(title: Option<&str>) -> String {
    title.map_or_else(String::new, |title| format!(r#" title="{title}""#))
}

impl MarkupRenderer for HtmlRenderer {
    fn code(&mut self, code: &str, language: Option<&str>) -> String {
        match language {
            Some(lang) => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(code)
            ),
            None => format!("<pre><code>{}</code></pre>", escape_html(code)),
        }
    }

    fn blockquote(&mut self, quote: &str) -> String {
        format!("<blockquote>{quote}</blockquote>")
    }

    fn html(&mut self, html: &str) -> String {
        html.to_owned()
    }

    fn heading(&mut self, text: &str, level: u8, raw: &str) -> String {
        let id = self.slugger.unique_id(raw);
        format!(r#"<h{level} id="{id}">{}</h{level}>"#, text.trim())
    }

    fn hr(&mut self) -> String {
        "<hr>".to_owned()
    }

    fn list(&mut self, body: &str, ordered: bool, start: Option<u64>) -> String {
        match (ordered, start) {
            (true, Some(1) | None) => format!("<ol>{body}</ol>"),
            (true, Some(n)) => format!(r#"<ol start="{n}">{body}</ol>"#),
            (false, _) => format!("<ul>{body}</ul>"),
        }
    }

    fn listitem(&mut self, text: &str) -> String {
        format!("<li>{text}</li>")
    }

    fn checkbox(&mut self, checked: bool) -> String {
        if checked {
            r#"<input type="checkbox" checked disabled> "#.to_owned()
        } else {
            r#"<input type="checkbox" disabled> "#.to_owned()
        }
    }

    fn paragraph(&mut self, text: &str) -> String {
        format!("<p>{text}</p>")
    }

    fn table(&mut self, header: &str, body: &str) -> String {
        format!("<table><thead>{header}</thead><tbody>{body}</tbody></table>")
    }

    fn tablerow(&mut self, content: &str) -> String {
        format!("<tr>{content}</tr>")
    }

    fn tablecell(&mut self, content: &str, flags: CellFlags) -> String {
        let tag = if flags.header { "th" } else { "td" };
        let style = flags.align.map_or_else(String::new, |align| {
            format!(r#" style="text-align:{}""#, align.as_css())
        });
        format!("<{tag}{style}>{content}</{tag}>")
    }

    fn strong(&mut self, text: &str) -> String {
        format!("<strong>{text}</strong>")
    }

    fn em(&mut self, text: &str) -> String {
        format!("<em>{text}</em>")
    }

    fn codespan(&mut self, text: &str) -> String {
        format!("<code>{text}</code>")
    }

    fn br(&mut self) -> String {
        "<br>".to_owned()
    }

    fn del(&mut self, text: &str) -> String {
        format!("<s>{text}</s>")
    }

    fn link(&mut self, href: &str, title: Option<&str>, text: &str) -> String {
        match sanitize_destination(href, self.sanitize) {
            Some(href) => format!(
                r#"<a href="{}"{}>{text}</a>"#,
                escape_html(&href),
                title_attr(title)
            ),
            None => text.to_owned(),
        }
    }

    fn image(&mut self, href: &str, title: Option<&str>, text: &str) -> String {
        match sanitize_destination(href, self.sanitize) {
            Some(src) => format!(
                r#"<img src="{}"{} alt="{text}">"#,
                escape_html(&src),
                title_attr(title)
            ),
            None => text.to_owned(),
        }
    }

    fn text(&mut self, text: &str) -> String {
        text.to_owned()
    }
}
