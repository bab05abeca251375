use crate::routes::user::NewUserForm;
use crate::template_utils::{escape, paginate, BaseContext, Input};
use quill_models::{posts::Post, users::User};
use std::io::{self, Write};
use validator::{ValidationErrors, ValidationErrorsKind};

pub fn details<W: Write>(
    out: &mut W,
    ctx: BaseContext<'_>,
    author: &User,
    is_following: bool,
    n_posts: i64,
    n_followers: i64,
    posts: &[Post],
    page: i32,
    total: i32,
) -> io::Result<()> {
    super::base(out, ctx, &author.name(), |out| {
        writeln!(out, "<h1>{}</h1>", escape(&author.name()))?;
        writeln!(
            out,
            "<p>@{} — {} posts, {} subscribers</p>",
            escape(&author.username),
            n_posts,
            n_followers
        )?;
        if let Some(user) = &ctx.1 {
            if user.id != author.id {
                if is_following {
                    writeln!(
                        out,
                        "<a href=\"/profile/{}/unfollow\">Unsubscribe</a>",
                        escape(&author.username)
                    )?;
                } else {
                    writeln!(
                        out,
                        "<a href=\"/profile/{}/follow\">Subscribe</a>",
                        escape(&author.username)
                    )?;
                }
            }
        }
        for post in posts {
            super::posts::preview(out, ctx, post)?;
        }
        write!(out, "{}", paginate(page, total))
    })
}

pub fn feed<W: Write>(
    out: &mut W,
    ctx: BaseContext<'_>,
    posts: &[Post],
    page: i32,
    total: i32,
) -> io::Result<()> {
    super::base(out, ctx, "My feed", |out| {
        writeln!(out, "<h1>Posts from people you follow</h1>")?;
        if posts.is_empty() {
            writeln!(
                out,
                "<p>Nothing to read yet. Subscribe to some authors from their profile page.</p>"
            )?;
        }
        for post in posts {
            super::posts::preview(out, ctx, post)?;
        }
        write!(out, "{}", paginate(page, total))
    })
}

pub fn new<W: Write>(
    out: &mut W,
    ctx: BaseContext<'_>,
    form: &NewUserForm,
    errors: ValidationErrors,
) -> io::Result<()> {
    super::base(out, ctx, "Sign up", |out| {
        writeln!(out, "<h1>Sign up</h1>")?;
        // errors that don't belong to a single field
        for key in &["", "__all__"] {
            if let Some(ValidationErrorsKind::Field(errs)) = errors.errors().get(*key) {
                for err in errs {
                    writeln!(
                        out,
                        "<p class=\"error\">{}</p>",
                        escape(&err.message.clone().unwrap_or_default())
                    )?;
                }
            }
        }
        writeln!(out, "<form method=\"post\" action=\"/auth/signup\">")?;
        write!(
            out,
            "{}",
            Input::new("username", "Username")
                .default(&form.username)
                .error(&errors)
                .html()
        )?;
        write!(
            out,
            "{}",
            Input::new("email", "Email")
                .input_type("email")
                .default(&form.email)
                .error(&errors)
                .html()
        )?;
        write!(
            out,
            "{}",
            Input::new("password", "Password")
                .input_type("password")
                .error(&errors)
                .html()
        )?;
        write!(
            out,
            "{}",
            Input::new("password_confirmation", "Password confirmation")
                .input_type("password")
                .error(&errors)
                .html()
        )?;
        writeln!(out, "<input type=\"submit\" value=\"Sign up\"/></form>")
    })
}
