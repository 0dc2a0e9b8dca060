//! # Corpus Model
//!
//! The corpus document declares which resource bundles a release ships and
//! what each bundle contains. It is loaded once per run and never mutated.
//!
//! ```xml
//! <Corpus>
//!   <Resources>
//!     <ResourceBundle Root="Common/Libraries">
//!       <Resource Type="Assembly" Name="Lib.Shared" Root="Assemblies" />
//!     </ResourceBundle>
//!     <ResourceBundle Root="Common/Natives">
//!       <Resource Type="Dll" Name="libsodium" Root="Assemblies" Optional="true" />
//!     </ResourceBundle>
//!     <ResourceBundle Root="Releases/Core" Versioned="True">
//!       <Resource Type="Assembly" Name="Mod.Core" Root="Assemblies" />
//!     </ResourceBundle>
//!   </Resources>
//! </Corpus>
//! ```
//!
//! Boolean attributes are compared case-insensitively against `true`; any
//! other value (or absence) means `false`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use xot::{NameId, Node, Xot};

use crate::error::{Error, Result};

/// The kinds of resource a bundle can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceKind {
    /// An assembly that needs special runtime handling (`NetStandardAssembly`).
    StandardLibraryAssembly,
    /// An assembly loaded by the runtime directly (`Assembly`).
    Assembly,
    /// A platform-native library (`Dll`), one of `.dll`/`.so`/`.dylib`.
    NativeLibrary,
}

impl ResourceKind {
    /// File extensions a resource of this kind may appear under.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ResourceKind::StandardLibraryAssembly | ResourceKind::Assembly => &["dll"],
            ResourceKind::NativeLibrary => &crate::defaults::NATIVE_EXTENSIONS,
        }
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "netstandardassembly" => Ok(ResourceKind::StandardLibraryAssembly),
            "assembly" => Ok(ResourceKind::Assembly),
            "dll" => Ok(ResourceKind::NativeLibrary),
            _ => Err(Error::UnknownResourceType {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::StandardLibraryAssembly => write!(f, "NetStandardAssembly"),
            ResourceKind::Assembly => write!(f, "Assembly"),
            ResourceKind::NativeLibrary => write!(f, "Dll"),
        }
    }
}

/// One logical artifact declared inside a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub kind: ResourceKind,
    /// File stem, compared case-insensitively against artifacts on disk.
    pub name: String,
    pub optional: bool,
    /// Directory under the bundle root housing the file.
    pub subroot: Option<String>,
}

impl Resource {
    /// Directory of this resource, given its bundle's resolved root.
    pub fn dir_in(&self, bundle_root: &Path) -> PathBuf {
        match &self.subroot {
            Some(sub) => bundle_root.join(sub),
            None => bundle_root.to_path_buf(),
        }
    }
}

/// A directory and the resources it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceBundle {
    pub root: PathBuf,
    pub resources: Vec<Resource>,
    /// Contents differ per host version and are never merged into the
    /// shared directories.
    pub versioned: bool,
}

/// The full set of bundles described by a corpus document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Corpus {
    pub bundles: Vec<ResourceBundle>,
}

impl Corpus {
    pub fn resource_count(&self) -> usize {
        self.bundles.iter().map(|b| b.resources.len()).sum()
    }
}

/// Load and parse a corpus document from disk.
pub fn load(path: &Path) -> Result<Corpus> {
    let content = fs::read_to_string(path).map_err(|e| Error::MalformedCorpus {
        path: path.to_path_buf(),
        message: format!("could not be read: {}", e),
    })?;
    parse(&content, path)
}

/// Names used while reading the document.
struct Names {
    resources: NameId,
    root: NameId,
    versioned: NameId,
    kind: NameId,
    name: NameId,
    optional: NameId,
}

impl Names {
    fn register(xot: &mut Xot) -> Self {
        Self {
            resources: xot.add_name("Resources"),
            root: xot.add_name("Root"),
            versioned: xot.add_name("Versioned"),
            kind: xot.add_name("Type"),
            name: xot.add_name("Name"),
            optional: xot.add_name("Optional"),
        }
    }
}

/// Parse a corpus document. `origin` is only used in error messages.
pub fn parse(xml: &str, origin: &Path) -> Result<Corpus> {
    let malformed = |message: String| Error::MalformedCorpus {
        path: origin.to_path_buf(),
        message,
    };

    let mut xot = Xot::new();
    let names = Names::register(&mut xot);
    let document = xot.parse(xml).map_err(|e| malformed(e.to_string()))?;
    let corpus_element = xot
        .document_element(document)
        .map_err(|e| malformed(e.to_string()))?;

    let resources = child_elements(&xot, corpus_element)
        .find(|node| element_name(&xot, *node) == Some(names.resources))
        .ok_or_else(|| {
            malformed(
                "should contain a 'Resources' element within the root element".to_string(),
            )
        })?;

    let mut bundles = Vec::new();
    for bundle_node in child_elements(&xot, resources) {
        let root = attribute(&xot, bundle_node, names.root)
            .ok_or_else(|| malformed("a resource bundle is missing its 'Root' attribute".to_string()))?;
        let versioned = flag(attribute(&xot, bundle_node, names.versioned));

        let mut resources = Vec::new();
        for resource_node in child_elements(&xot, bundle_node) {
            let kind = attribute(&xot, resource_node, names.kind)
                .ok_or_else(|| malformed(format!("a resource in bundle '{}' is missing its 'Type' attribute", root)))?
                .parse::<ResourceKind>()?;
            let name = attribute(&xot, resource_node, names.name)
                .ok_or_else(|| malformed(format!("a resource in bundle '{}' is missing its 'Name' attribute", root)))?;

            resources.push(Resource {
                kind,
                name,
                optional: flag(attribute(&xot, resource_node, names.optional)),
                subroot: attribute(&xot, resource_node, names.root),
            });
        }

        bundles.push(ResourceBundle {
            root: PathBuf::from(root),
            resources,
            versioned,
        });
    }

    Ok(Corpus { bundles })
}

fn child_elements<'a>(xot: &'a Xot, parent: Node) -> impl Iterator<Item = Node> + 'a {
    xot.children(parent).filter(move |node| xot.is_element(*node))
}

fn element_name(xot: &Xot, node: Node) -> Option<NameId> {
    xot.element(node).map(|element| element.name())
}

fn attribute(xot: &Xot, node: Node, name: NameId) -> Option<String> {
    xot.attributes(node).get(name).map(|value| value.to_string())
}

fn flag(value: Option<String>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}
