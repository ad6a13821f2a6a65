#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod http;

pub(crate) use db::{get_test_connection, get_test_state};
pub(crate) use http::{assert_content_type, get_header, parse_json_body};
