use crate::template_utils::BaseContext;
use std::io::{self, Write};

pub fn not_found<W: Write>(out: &mut W, ctx: BaseContext<'_>) -> io::Result<()> {
    super::base(out, ctx, "Page not found", |out| {
        write!(
            out,
            "<h1>Page not found</h1><p>This page does not exist, or was deleted.</p>"
        )
    })
}

pub fn server_error<W: Write>(out: &mut W, ctx: BaseContext<'_>) -> io::Result<()> {
    super::base(out, ctx, "Server error", |out| {
        write!(
            out,
            "<h1>Something went wrong</h1><p>Sorry about that. Try again later.</p>"
        )
    })
}
