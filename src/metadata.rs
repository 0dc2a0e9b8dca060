//! Mod metadata readers.
//!
//! Reads the package identifier from a mod's `About/About.xml` and the
//! targeted host version from an MSBuild properties file.

use std::fs;
use std::path::Path;

use semver::Version;
use xot::{Node, Xot};

use crate::error::{Error, Result};

/// The text of the first `packageId` child of the root element. The tag is
/// matched ignoring case.
pub fn package_id(about_xml: &Path) -> Result<String> {
    let content = read(about_xml)?;
    parse_package_id(&content, about_xml)
}

pub fn parse_package_id(xml: &str, origin: &Path) -> Result<String> {
    let (xot, root) = parse_root(xml, origin)?;

    let id = child_elements(&xot, root)
        .find(|node| local_name(&xot, *node).is_some_and(|n| n.eq_ignore_ascii_case("packageId")))
        .and_then(|node| xot.text_content_str(node))
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| metadata_error(origin, "no 'packageId' element under the root element"));
    id
}

/// The `PropertyGroup/RimWorldVersion` property of an MSBuild properties
/// file. A two-component version such as `1.5` reads as `1.5.0`.
pub fn target_version(props: &Path) -> Result<Version> {
    let content = read(props)?;
    parse_target_version(&content, props)
}

pub fn parse_target_version(xml: &str, origin: &Path) -> Result<Version> {
    let (xot, root) = parse_root(xml, origin)?;

    let text = child_elements(&xot, root)
        .filter(|node| local_name(&xot, *node) == Some("PropertyGroup"))
        .flat_map(|group| child_elements(&xot, group).collect::<Vec<_>>())
        .find(|node| local_name(&xot, *node) == Some("RimWorldVersion"))
        .and_then(|node| xot.text_content_str(node))
        .ok_or_else(|| metadata_error(origin, "no 'PropertyGroup/RimWorldVersion' property"))?;

    Ok(Version::parse(&pad_version(text.trim()))?)
}

/// Pads `major` and `major.minor` to three components.
fn pad_version(text: &str) -> String {
    match text.split('.').count() {
        1 => format!("{}.0.0", text),
        2 => format!("{}.0", text),
        _ => text.to_string(),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| metadata_error(path, &format!("could not be read: {}", e)))
}

fn parse_root(xml: &str, origin: &Path) -> Result<(Xot, Node)> {
    let mut xot = Xot::new();
    let document = xot
        .parse(xml)
        .map_err(|e| metadata_error(origin, &e.to_string()))?;
    let root = xot
        .document_element(document)
        .map_err(|e| metadata_error(origin, &e.to_string()))?;
    Ok((xot, root))
}

fn child_elements<'a>(xot: &'a Xot, parent: Node) -> impl Iterator<Item = Node> + 'a {
    xot.children(parent).filter(move |node| xot.is_element(*node))
}

fn local_name(xot: &Xot, node: Node) -> Option<&str> {
    xot.element(node).map(|element| xot.local_name_str(element.name()))
}

fn metadata_error(path: &Path, message: &str) -> Error {
    Error::Metadata {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}
