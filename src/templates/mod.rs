use crate::template_utils::{escape, BaseContext};
use std::io::{self, Write};

pub mod errors;
pub mod groups;
pub mod posts;
pub mod sessions;
pub mod users;

/// Writes the page chrome (head, navigation, flash message) around `body`.
pub fn base<W: Write, F>(
    out: &mut W,
    ctx: BaseContext<'_>,
    title: &str,
    body: F,
) -> io::Result<()>
where
    F: FnOnce(&mut W) -> io::Result<()>,
{
    write!(
        out,
        concat!(
            "<!DOCTYPE html>\n",
            "<html>\n",
            "<head>\n",
            "<meta charset=\"utf-8\"/>\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>\n",
            "<title>{title} ~ Quill</title>\n",
            "<link rel=\"stylesheet\" href=\"/static/css/main.css\"/>\n",
            "</head>\n",
            "<body>\n",
            "<header><nav><a href=\"/\" class=\"brand\">Quill</a>"
        ),
        title = escape(title)
    )?;
    match &ctx.1 {
        Some(user) => write!(
            out,
            concat!(
                "<a href=\"/follow\">My feed</a>",
                "<a href=\"/create\">New post</a>",
                "<a href=\"/profile/{username}\">{name}</a>",
                "<a href=\"/auth/logout\">Log out</a>"
            ),
            username = escape(&user.username),
            name = escape(&user.name())
        )?,
        None => write!(
            out,
            "<a href=\"/auth/login\">Log in</a><a href=\"/auth/signup\">Sign up</a>"
        )?,
    }
    writeln!(out, "</nav></header>\n<main>")?;
    if let Some((kind, msg)) = &ctx.2 {
        writeln!(
            out,
            "<p class=\"flash {}\">{}</p>",
            escape(kind),
            escape(msg)
        )?;
    }
    body(out)?;
    write!(out, "</main>\n</body>\n</html>\n")
}
