//! Encoding and escaping tools.
//!
//! Two-way text codecs: each one takes a mode flag and round-trips.

mod backslash_escape;
mod base64;
mod html_encode;
mod json_escape;
mod url_encode;

pub use self::base64::{Base64Params, Base64Tool};
pub use backslash_escape::{BackslashEscapeParams, BackslashEscapeTool};
pub use html_encode::{HtmlEncodeParams, HtmlEncodeTool};
pub use json_escape::{JsonEscapeParams, JsonEscapeTool};
pub use url_encode::{UrlEncodeParams, UrlEncodeTool, decode_component};
