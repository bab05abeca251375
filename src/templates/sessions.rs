use crate::routes::session::LoginForm;
use crate::template_utils::{escape, BaseContext, Input};
use std::io::{self, Write};
use validator::ValidationErrors;

pub fn login<W: Write>(
    out: &mut W,
    ctx: BaseContext<'_>,
    form: &LoginForm,
    errors: &ValidationErrors,
) -> io::Result<()> {
    super::base(out, ctx, "Log in", |out| {
        writeln!(out, "<h1>Log in</h1>")?;
        writeln!(out, "<form method=\"post\" action=\"/auth/login\">")?;
        if let Some(next) = &form.next {
            writeln!(
                out,
                "<input type=\"hidden\" name=\"next\" value=\"{}\"/>",
                escape(next)
            )?;
        }
        write!(
            out,
            "{}",
            Input::new("ident", "Username, or email")
                .default(&form.ident)
                .error(errors)
                .html()
        )?;
        write!(
            out,
            "{}",
            Input::new("password", "Password")
                .input_type("password")
                .error(errors)
                .html()
        )?;
        writeln!(out, "<input type=\"submit\" value=\"Log in\"/></form>")
    })
}
