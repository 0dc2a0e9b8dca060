//! Default values for release-comb settings.
//!
//! This module provides centralized default values used by the settings
//! layer and the commands, ensuring consistency and avoiding duplication.

/// Settings file looked up at the project root when `--settings` is absent.
pub const SETTINGS_FILE: &str = "release-comb.yaml";

/// Release tree root, relative to the project root.
pub const RELEASES_DIR: &str = "Releases";

/// Shared output root, relative to the project root.
pub const COMMON_DIR: &str = "Common";

/// Corpus document, relative to the project root.
pub const CORPUS_FILE: &str = "Corpus.xml";

/// Name of the per-version folder holding artifacts.
pub const ASSEMBLIES_DIR: &str = "Assemblies";

/// Shared bundle folders under the common root.
pub const LIBRARIES_DIR: &str = "Libraries";
pub const NATIVES_DIR: &str = "Natives";

/// Legacy runtime-specific folder merged upward by the flattener.
pub const FRAMEWORK_FOLDER: &str = "net48";

/// Prefix of the host-version tag embedded in artifact names (`Foo.RW15.dll`).
pub const VERSION_TAG_PREFIX: &str = "RW";

/// Extension of debug-symbol companions.
pub const DEBUG_SYMBOL_EXTENSION: &str = "pdb";

/// Sibling extensions of one logical native module.
pub const NATIVE_EXTENSIONS: [&str; 3] = ["dll", "so", "dylib"];

/// Category excluded from classification.
pub const BOOTSTRAP_CATEGORY: &str = "Bootstrap";

/// Prefix of assemblies internal to the shared mod framework.
pub const INTERNAL_PREFIX: &str = "StreamKit.Mod.Shared";

/// Package id inserted first in the activation list.
pub const HARMONY_ID: &str = "brrainz.harmony";

/// Package id inserted immediately after [`HARMONY_ID`].
pub const CORE_ID: &str = "ludeon.rimworld";

/// Cached install path, relative to the working directory.
pub const INSTALL_CACHE_FILE: &str = ".run/.steam";

/// Assemblies the host runtime already ships.
pub fn host_provided() -> Vec<String> {
    [
        "0Harmony",
        "Assembly-CSharp",
        "Assembly-CSharp-firstpass",
        "Mono.Posix",
        "Mono.Security",
        "mscorlib",
        "netstandard",
        "NAudio",
        "NVorbis",
        "System",
        "System.ComponentModel.Composition",
        "System.Configuration",
        "System.Core",
        "System.Data",
        "System.Drawing",
        "System.Numerics",
        "System.Runtime.Serialization",
        "System.Security",
        "System.Xml",
        "System.Xml.Linq",
        "UnityEngine",
        "UnityEngine.AudioModule",
        "UnityEngine.CoreModule",
        "UnityEngine.IMGUIModule",
        "UnityEngine.InputLegacyModule",
        "UnityEngine.InputModule",
        "UnityEngine.TextRenderingModule",
        "UnityEngine.UI",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Build-time-only or otherwise unwanted assemblies.
pub fn filtered() -> Vec<String> {
    [
        "JetBrains.Annotations",
        "Krafs.Publicizer",
        "Microsoft.CodeAnalysis",
        "Microsoft.CodeAnalysis.CSharp",
        "NetEscapades.EnumGenerators",
        "NetEscapades.EnumGenerators.Attributes",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
