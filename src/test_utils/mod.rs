#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;

pub(crate) use html::{assert_valid_html, parse_html_document};
pub(crate) use http::{assert_content_type, get_body_text, get_header};
