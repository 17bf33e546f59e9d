//! Serializing a [`Signal`][crate::signal::Signal] stream back to bytes
//! (§4.7).

pub mod html;
pub mod xml;

pub use html::{write_html, write_html_with_options};
pub use xml::{write_xml, write_xml_with_options};
