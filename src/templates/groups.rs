use crate::template_utils::{escape, paginate, BaseContext};
use quill_models::{groups::Group, posts::Post};
use std::io::{self, Write};

pub fn details<W: Write>(
    out: &mut W,
    ctx: BaseContext<'_>,
    group: &Group,
    posts: &[Post],
    page: i32,
    total: i32,
) -> io::Result<()> {
    super::base(out, ctx, &group.title, |out| {
        writeln!(out, "<h1>{}</h1>", escape(&group.title))?;
        if !group.description.get().is_empty() {
            writeln!(out, "<p>{}</p>", escape(group.description.get()))?;
        }
        for post in posts {
            super::posts::preview(out, ctx, post)?;
        }
        write!(out, "{}", paginate(page, total))
    })
}
