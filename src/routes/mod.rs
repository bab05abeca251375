use crate::template_utils::Rendered;
use rocket::{
    http::RawStr,
    request::FromFormValue,
    response::{Flash, NamedFile, Redirect},
};
use shrinkwraprs::Shrinkwrap;
use std::path::{Path, PathBuf};

/// Number of posts shown on every listing page.
const ITEMS_PER_PAGE: i32 = 10;

#[derive(Shrinkwrap, Copy, Clone)]
pub struct Page(i32);

impl<'v> FromFormValue<'v> for Page {
    type Error = &'v RawStr;

    fn from_form_value(form_value: &'v RawStr) -> Result<Page, &'v RawStr> {
        form_value.parse::<i32>().map(Page).map_err(|_| form_value)
    }
}

impl Page {
    /// Computes the total number of pages needed to display n_items
    pub fn total(n_items: i32) -> i32 {
        if n_items % ITEMS_PER_PAGE == 0 {
            n_items / ITEMS_PER_PAGE
        } else {
            (n_items / ITEMS_PER_PAGE) + 1
        }
    }

    /// Out-of-range page numbers come back as the nearest valid page
    /// instead of erroring.
    pub fn clamp(self, total: i32) -> Page {
        if self.0 < 1 {
            Page(1)
        } else if self.0 > total {
            Page(total.max(1))
        } else {
            self
        }
    }

    pub fn limits(self) -> (i32, i32) {
        ((self.0 - 1) * ITEMS_PER_PAGE, self.0 * ITEMS_PER_PAGE)
    }
}

impl Default for Page {
    fn default() -> Self {
        Page(1)
    }
}

#[derive(Responder)]
pub enum RespondOrRedirect {
    Response(Rendered),
    Redirect(Redirect),
    FlashRedirect(Flash<Redirect>),
}

impl From<Rendered> for RespondOrRedirect {
    fn from(response: Rendered) -> Self {
        RespondOrRedirect::Response(response)
    }
}

impl From<Redirect> for RespondOrRedirect {
    fn from(redirect: Redirect) -> Self {
        RespondOrRedirect::Redirect(redirect)
    }
}

impl From<Flash<Redirect>> for RespondOrRedirect {
    fn from(flash: Flash<Redirect>) -> Self {
        RespondOrRedirect::FlashRedirect(flash)
    }
}

pub mod comments;
pub mod errors;
pub mod groups;
pub mod posts;
pub mod session;
pub mod user;

#[get("/static/<file..>")]
pub fn static_files(file: PathBuf) -> Option<NamedFile> {
    NamedFile::open(Path::new("static/").join(file)).ok()
}
