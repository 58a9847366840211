// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! XML-RPC payload generators.

/// A `pingback.ping` call with the given parameter values.
pub fn ping_call(params: &[&str]) -> String {
    let params: String = params
        .iter()
        .map(|p| format!("<param><value><string>{p}</string></value></param>"))
        .collect();
    format!(
        "<?xml version=\"1.0\"?>\n<methodCall>\n  <methodName>pingback.ping</methodName>\n  \
         <params>{params}</params>\n</methodCall>"
    )
}

/// A well-formed call to a method other than `pingback.ping`.
pub fn other_method_call(method: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?><methodCall><methodName>{method}</methodName>\
         <params><param><value>http://a.example/</value></param>\
         <param><value>http://b.example/</value></param></params></methodCall>"
    )
}

/// An HTML page with `title` linking to each of `links`.
pub fn source_page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!("<p><a href=\"{l}\">a post</a></p>"))
        .collect();
    format!("<!DOCTYPE html><html><head><title>{title}</title></head><body>{anchors}</body></html>")
}
