//! # Mod activation list
//!
//! The host keeps the ordered list of active mods in `ModsConfig.xml`:
//!
//! ```xml
//! <ModsConfigData>
//!   <version>1.5.4104 rev435</version>
//!   <activeMods>
//!     <li>brrainz.harmony</li>
//!     <li>ludeon.rimworld</li>
//!   </activeMods>
//! </ModsConfigData>
//! ```
//!
//! Package ids are compared ignoring case, and an id appears at most once.

use std::fs;
use std::path::{Path, PathBuf};

use xot::{NameId, Node, Xot};

use crate::error::{Error, Result};

/// An ordered list of package ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationList {
    ids: Vec<String>,
}

impl ActivationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|existing| existing.eq_ignore_ascii_case(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Places `id` at `index`, clamped to the end of the list. An id already
    /// in the list is moved rather than duplicated.
    pub fn insert_at(&mut self, index: usize, id: &str) {
        let id = match self.position(id) {
            Some(existing) => self.ids.remove(existing),
            None => id.to_string(),
        };
        let index = index.min(self.ids.len());
        self.ids.insert(index, id);
    }

    /// Puts `first` at the front and `second` immediately after it.
    pub fn ensure_front(&mut self, first: &str, second: &str) {
        self.insert_at(0, first);
        self.insert_at(1, second);
    }
}

impl<S: Into<String>> FromIterator<S> for ActivationList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for id in iter {
            let id = id.into();
            if !list.contains(&id) {
                list.ids.push(id);
            }
        }
        list
    }
}

/// A loaded `ModsConfig.xml` document.
pub struct ModsConfig {
    path: PathBuf,
    xot: Xot,
    document: Node,
    active_mods: Node,
    li: NameId,
}

impl ModsConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| activation_error(path, &format!("could not be read: {}", e)))?;
        Self::parse(&content, path)
    }

    pub fn parse(xml: &str, path: &Path) -> Result<Self> {
        let mut xot = Xot::new();
        let active_mods_name = xot.add_name("activeMods");
        let li = xot.add_name("li");

        let document = xot.parse(xml).map_err(|e| activation_error(path, &e.to_string()))?;
        let root = xot
            .document_element(document)
            .map_err(|e| activation_error(path, &e.to_string()))?;
        let active_mods = xot
            .children(root)
            .find(|node| xot.element(*node).is_some_and(|e| e.name() == active_mods_name))
            .ok_or_else(|| activation_error(path, "no 'activeMods' element under the root element"))?;

        Ok(Self {
            path: path.to_path_buf(),
            xot,
            document,
            active_mods,
            li,
        })
    }

    /// The ids currently listed, in order.
    pub fn list(&self) -> ActivationList {
        self.xot
            .children(self.active_mods)
            .filter(|node| self.xot.element(*node).is_some_and(|e| e.name() == self.li))
            .filter_map(|node| self.xot.text_content_str(node))
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect()
    }

    /// Replaces the listed ids with `list`.
    pub fn set(&mut self, list: &ActivationList) -> Result<()> {
        let existing: Vec<Node> = self.xot.children(self.active_mods).collect();
        for node in existing {
            self.xot.remove(node).map_err(|e| self.xot_error(e))?;
        }

        for id in list.ids() {
            let indent = self.xot.new_text("\n    ");
            let li = self.xot.new_element(self.li);
            let text = self.xot.new_text(id);
            self.xot.append(li, text).map_err(|e| self.xot_error(e))?;
            self.xot
                .append(self.active_mods, indent)
                .map_err(|e| self.xot_error(e))?;
            self.xot
                .append(self.active_mods, li)
                .map_err(|e| self.xot_error(e))?;
        }
        let closing = self.xot.new_text("\n  ");
        self.xot
            .append(self.active_mods, closing)
            .map_err(|e| self.xot_error(e))?;
        Ok(())
    }

    pub fn to_xml(&self) -> Result<String> {
        self.xot
            .to_string(self.document)
            .map_err(|e| self.xot_error(e))
    }

    /// Writes the document back to the path it was loaded from.
    pub fn save(&self) -> Result<()> {
        let xml = self.to_xml()?;
        fs::write(&self.path, xml).map_err(|e| Error::filesystem("write", &self.path, e))
    }

    fn xot_error(&self, error: xot::Error) -> Error {
        activation_error(&self.path, &error.to_string())
    }
}

fn activation_error(path: &Path, message: &str) -> Error {
    Error::Activation {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}
