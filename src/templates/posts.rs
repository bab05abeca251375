use crate::template_utils::{escape, paginate, BaseContext};
use quill_models::{comments::Comment, groups::Group, posts::Post, users::User};
use std::io::{self, Write};

/// One post in a listing: author, date, group, illustration, text.
pub fn preview<W: Write>(out: &mut W, ctx: BaseContext<'_>, post: &Post) -> io::Result<()> {
    let conn = ctx.0;
    write!(out, "<article class=\"post\">")?;
    if let Ok(author) = post.get_author(conn) {
        write!(
            out,
            "<a class=\"author\" href=\"/profile/{}\">{}</a> ",
            escape(&author.username),
            escape(&author.name())
        )?;
    }
    write!(
        out,
        "<time>{}</time>",
        post.creation_date.format("%d %b %Y, %H:%M")
    )?;
    if let Ok(Some(group)) = post.get_group(conn) {
        write!(
            out,
            " <a class=\"group\" href=\"/group/{}\">{}</a>",
            escape(&group.slug),
            escape(&group.title)
        )?;
    }
    if let Some(url) = post.image_url(conn) {
        write!(out, "<img src=\"{}\" alt=\"\"/>", escape(&url))?;
    }
    write!(
        out,
        "<p>{}</p><a href=\"/posts/{}\">Permalink</a></article>\n",
        escape(post.text.get()),
        post.id
    )
}

pub fn index<W: Write>(
    out: &mut W,
    ctx: BaseContext<'_>,
    posts: &[Post],
    page: i32,
    total: i32,
) -> io::Result<()> {
    super::base(out, ctx, "Latest posts", |out| {
        writeln!(out, "<h1>Latest posts</h1>")?;
        for post in posts {
            preview(out, ctx, post)?;
        }
        write!(out, "{}", paginate(page, total))
    })
}

pub fn details<W: Write>(
    out: &mut W,
    ctx: BaseContext<'_>,
    post: &Post,
    author: &User,
    comments: &[Comment],
) -> io::Result<()> {
    super::base(out, ctx, &format!("Post by {}", author.name()), |out| {
        writeln!(out, "<h1>Post by {}</h1>", escape(&author.name()))?;
        preview(out, ctx, post)?;
        if ctx.1.as_ref().map(|u| u.id) == Some(post.author_id) {
            writeln!(out, "<a href=\"/posts/{}/edit\">Edit</a>", post.id)?;
        }

        writeln!(out, "<h2>Comments</h2>")?;
        for comment in comments {
            write!(out, "<div class=\"comment\" id=\"comment-{}\">", comment.id)?;
            if let Ok(author) = comment.get_author(ctx.0) {
                write!(
                    out,
                    "<a href=\"/profile/{}\">{}</a> ",
                    escape(&author.username),
                    escape(&author.name())
                )?;
            }
            writeln!(
                out,
                "<time>{}</time><p>{}</p></div>",
                comment.creation_date.format("%d %b %Y, %H:%M"),
                escape(comment.text.get())
            )?;
        }
        if ctx.1.is_some() {
            write!(
                out,
                concat!(
                    "<form method=\"post\" action=\"/posts/{}/comment\">",
                    "<label for=\"text\">Your comment</label>",
                    "<textarea id=\"text\" name=\"text\" required></textarea>",
                    "<input type=\"submit\" value=\"Comment\"/>",
                    "</form>\n"
                ),
                post.id
            )
        } else {
            write!(
                out,
                "<p><a href=\"/auth/login?next=/posts/{}\">Log in</a> to comment.</p>\n",
                post.id
            )
        }
    })
}

/// The form used both to write and to edit a post.
pub fn form<W: Write>(
    out: &mut W,
    ctx: BaseContext<'_>,
    groups: &[Group],
    editing: Option<&Post>,
    text: &str,
    group_id: Option<i32>,
    error: Option<&str>,
) -> io::Result<()> {
    let title = if editing.is_some() {
        "Edit the post"
    } else {
        "New post"
    };
    super::base(out, ctx, title, |out| {
        writeln!(out, "<h1>{}</h1>", title)?;
        if let Some(error) = error {
            writeln!(out, "<p class=\"error\">{}</p>", escape(error))?;
        }
        let action = editing
            .map(|p| format!("/posts/{}/edit", p.id))
            .unwrap_or_else(|| "/create".to_owned());
        writeln!(
            out,
            "<form method=\"post\" action=\"{}\" enctype=\"multipart/form-data\">",
            action
        )?;
        writeln!(
            out,
            concat!(
                "<label for=\"text\">Text of the post</label>",
                "<textarea id=\"text\" name=\"text\" required>{}</textarea>"
            ),
            escape(text)
        )?;
        writeln!(
            out,
            concat!(
                "<label for=\"group\">Group <small>Optional</small></label>",
                "<select id=\"group\" name=\"group\"><option value=\"\"></option>"
            )
        )?;
        for group in groups {
            writeln!(
                out,
                "<option value=\"{}\"{}>{}</option>",
                group.id,
                if group_id == Some(group.id) {
                    " selected"
                } else {
                    ""
                },
                escape(&group.title)
            )?;
        }
        writeln!(out, "</select>")?;
        writeln!(
            out,
            concat!(
                "<label for=\"image\">Illustration <small>Optional</small></label>",
                "<input type=\"file\" id=\"image\" name=\"image\"/>"
            )
        )?;
        writeln!(
            out,
            "<input type=\"submit\" value=\"{}\"/></form>",
            if editing.is_some() { "Save" } else { "Publish" }
        )
    })
}
