use quill_models::{quill_rocket::QuillRocket, users::User, Connection};

use rocket::http::{Method, Status};
use rocket::request::Request;
use rocket::response::{self, content::Html as HtmlCt, Responder, Response};
use std::collections::{btree_map::BTreeMap, hash_map::DefaultHasher};
use std::fmt::{self, Display};
use std::hash::Hasher;

pub use askama_escape::escape;

/// What every template needs to know: a database connection, the
/// current user (if any), and the pending flash message (if any).
pub type BaseContext<'a> = &'a (&'a Connection, Option<User>, Option<(String, String)>);

pub trait IntoContext {
    fn to_context(&self) -> (&Connection, Option<User>, Option<(String, String)>);
}

impl IntoContext for QuillRocket {
    fn to_context(&self) -> (&Connection, Option<User>, Option<(String, String)>) {
        (&*self.conn, self.user.clone(), self.flash_msg.clone())
    }
}

/// A fragment of markup that is already escaped and can be written
/// to a template as-is.
pub struct Html<T>(pub T);

impl<T: Display> Display for Html<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A rendered page, ready to be sent as a response.
#[derive(Debug)]
pub struct Rendered(pub Vec<u8>);

impl<'r> Responder<'r> for Rendered {
    fn respond_to(self, r: &Request<'_>) -> response::Result<'r> {
        // if method is not Get or page contains a form, no caching
        if r.method() != Method::Get || self.0.windows(6).any(|w| w == b"<form ") {
            return HtmlCt(self.0).respond_to(r);
        }
        let mut hasher = DefaultHasher::new();
        hasher.write(&self.0);
        let etag = format!("{:x}", hasher.finish());
        if r.headers()
            .get("If-None-Match")
            .any(|s| s[1..s.len() - 1] == etag)
        {
            Response::build()
                .status(Status::NotModified)
                .header("ETag", etag)
                .ok()
        } else {
            Response::build()
                .merge(HtmlCt(self.0).respond_to(r)?)
                .header("ETag", etag)
                .ok()
        }
    }
}

#[macro_export]
macro_rules! render {
    ($group:tt :: $page:tt ( $( $param:expr ),* ) ) => {
        {
            let mut res = vec![];
            crate::templates::$group::$page(
                &mut res,
                $(
                    $param
                ),*
            ).unwrap();
            crate::template_utils::Rendered(res)
        }
    }
}

/// Previous/next links for a paginated listing.
pub fn paginate(page: i32, total: i32) -> Html<String> {
    let mut res = String::new();
    res.push_str(r#"<div class="pagination">"#);
    if page > 1 {
        res.push_str(format!(r#"<a href="?page={}">Previous page</a>"#, page - 1).as_str());
    }
    if page < total {
        res.push_str(format!(r#"<a href="?page={}">Next page</a>"#, page + 1).as_str());
    }
    res.push_str("</div>");
    Html(res)
}

/// A builder type to generate `<input>` tags in a type-safe way.
///
/// # Example
///
/// ```rust,ignore
/// Input::new("email", "Your email address")
///     .input_type("email")
///     .default(current_email)
///     .optional()
///     .error(&errors)
///     .html();
/// ```
pub struct Input {
    /// The name of the input (`name` and `id` in HTML).
    name: String,
    /// The description of this field.
    label: String,
    /// The `type` of the input (`text`, `email`, `password`, etc).
    input_type: String,
    /// The default value for this input field.
    default: Option<String>,
    /// `true` if this field is not required.
    optional: bool,
    /// Additional HTML properties.
    props: BTreeMap<String, String>,
    /// The error message to show next to this field.
    error: Option<String>,
}

impl Input {
    /// Creates a new input with a given name.
    pub fn new(name: impl ToString, label: impl ToString) -> Input {
        Input {
            name: name.to_string(),
            label: label.to_string(),
            input_type: "text".into(),
            default: None,
            optional: false,
            props: BTreeMap::new(),
            error: None,
        }
    }

    /// Set the `type` of this input.
    pub fn input_type(mut self, t: impl ToString) -> Input {
        self.input_type = t.to_string();
        self
    }

    /// Marks this field as optional.
    pub fn optional(mut self) -> Input {
        self.optional = true;
        self
    }

    /// Fills the input with a default value (useful for edition forms).
    pub fn default(mut self, val: impl ToString) -> Input {
        self.default = Some(val.to_string());
        self
    }

    /// Defines an additional HTML property.
    ///
    /// This method can be called multiple times for the same input.
    pub fn set_prop(mut self, key: impl ToString, val: impl ToString) -> Input {
        self.props.insert(key.to_string(), val.to_string());
        self
    }

    /// Shows an error message
    pub fn error(mut self, errs: &validator::ValidationErrors) -> Input {
        if let Some(field_errs) = errs.clone().field_errors().get(self.name.as_str()) {
            self.error = Some(
                field_errs[0]
                    .message
                    .clone()
                    .unwrap_or_default()
                    .to_string(),
            );
        }
        self
    }

    /// Returns the HTML markup for this field.
    pub fn html(mut self) -> Html<String> {
        if !self.optional {
            self = self.set_prop("required", true);
        }

        Html(format!(
            r#"
                <label for="{name}">
                    {label}
                    {optional}
                </label>
                {error}
                <input type="{kind}" id="{name}" name="{name}" value="{val}" {props}/>
                "#,
            name = self.name,
            label = self.label,
            kind = self.input_type,
            optional = if self.optional {
                "<small>Optional</small>".to_string()
            } else {
                String::new()
            },
            error = self
                .error
                .map(|e| format!(r#"<p class="error">{}</p>"#, e))
                .unwrap_or_default(),
            val = escape(&self.default.unwrap_or_default()),
            props = self
                .props
                .into_iter()
                .fold(String::new(), |mut res, (key, val)| {
                    res.push_str(&format!("{}=\"{}\" ", key, val));
                    res
                })
        ))
    }
}
