mod url;
mod url_buf;
mod validate;

pub use url::{Url, ToUrl};
pub use url_buf::UrlBuf;
pub use validate::{is_url_char, quote};
