//! Packaging rules: which loader descriptor a variant ships and which
//! rewrite steps its output tree needs.
//!
//! Decisions are pure; steps are descriptors only. [`crate::apply`] performs
//! the actual file I/O.

use chisel_config::manifest::ModInfo;
use chisel_targets::{GameVersion, Loader};

use crate::error::EngineError;

/// Resources subdirectory of the build-output tree.
pub const RESOURCES_DIR: &str = "resources";
/// Class-output subdirectory of the build-output tree.
pub const CLASSES_DIR: &str = "classes";

/// `pack_format` shipped for game version 1.20.4.
const PACK_FORMAT_1_20_4: u32 = 22;
/// `pack_format` shipped for the older special-cased versions.
const PACK_FORMAT_OLDER: u32 = 18;

/// One planned rewrite. Paths are relative to the build-output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteStep {
    /// Move a file, creating destination parents.
    Relocate { source: String, dest: String },
    /// Delete every line of `path` matching `pattern` (a regex).
    StripField { path: String, pattern: String },
    /// Write a generated `pack.mcmeta` to `dest`.
    SynthesizePackMeta {
        dest: String,
        pack_format: u32,
        description: String,
    },
}

impl std::fmt::Display for RewriteStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewriteStep::Relocate { source, dest } => {
                write!(f, "relocate {source} -> {dest}")
            }
            RewriteStep::StripField { path, .. } => write!(f, "strip field in {path}"),
            RewriteStep::SynthesizePackMeta {
                dest, pack_format, ..
            } => write!(f, "write {dest} (pack_format {pack_format})"),
        }
    }
}

/// The packaging decision for one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingRule {
    /// Path of the loader descriptor within the produced archive.
    pub manifest_path: String,
    /// Ordered rewrite steps; each step's output may feed the next.
    /// Empty for variants needing no post-processing (the default).
    pub steps: Vec<RewriteStep>,
}

impl PackagingRule {
    /// Whether this is the identity rule.
    pub fn is_identity(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Decide the packaging rule for a `(loader, game version)` pair.
///
/// Special cases, matched exactly:
/// - forge 1.20.3
/// - neoforge 1.20.2 and 1.20.4 (NeoForge of that era still read
///   `mods.toml` and required a `pack.mcmeta`)
///
/// Every other pair gets the identity rule.
pub fn resolve_packaging_rule(
    loader: Loader,
    game: GameVersion,
    mod_info: &ModInfo,
) -> PackagingRule {
    let manifest_path = manifest_path(loader, game);

    let special = matches!(
        (loader, (game.major, game.minor, game.patch)),
        (Loader::Forge, (1, 20, 3)) | (Loader::Neoforge, (1, 20, 2) | (1, 20, 4))
    );
    if !special {
        return PackagingRule {
            manifest_path,
            steps: Vec::new(),
        };
    }

    let descriptor_in_classes = format!("{CLASSES_DIR}/META-INF/mods.toml");
    let strip_pattern = match loader {
        // These Forge versions resolve the loader range themselves; a stale
        // pinned `loaderVersion` in the relocated descriptor breaks loading.
        Loader::Forge => r#"(?m)^\s*loaderVersion\s*=.*\r?\n?"#,
        // Early NeoForge picks mixin configs up from the archive manifest,
        // not the descriptor; the leftover reference is rejected.
        _ => r#"(?m)^\s*config\s*=\s*"[^"]*\.mixins\.json"\s*\r?\n?"#,
    };

    let steps = vec![
        RewriteStep::Relocate {
            source: format!("{RESOURCES_DIR}/META-INF/mods.toml"),
            dest: descriptor_in_classes.clone(),
        },
        RewriteStep::StripField {
            path: descriptor_in_classes,
            pattern: strip_pattern.to_owned(),
        },
        RewriteStep::SynthesizePackMeta {
            dest: format!("{RESOURCES_DIR}/pack.mcmeta"),
            pack_format: pack_format_for(game),
            description: mod_info.name.clone(),
        },
    ];

    PackagingRule {
        manifest_path,
        steps,
    }
}

/// The descriptor path a loader reads, per game version.
fn manifest_path(loader: Loader, game: GameVersion) -> String {
    match loader {
        Loader::Fabric => "fabric.mod.json".to_owned(),
        Loader::Forge => "META-INF/mods.toml".to_owned(),
        Loader::Neoforge => {
            // NeoForge renamed its descriptor in 1.20.5.
            if game < GameVersion::new(1, 20, 5) {
                "META-INF/mods.toml".to_owned()
            } else {
                "META-INF/neoforge.mods.toml".to_owned()
            }
        }
    }
}

/// The `pack_format` value for a special-cased game version.
fn pack_format_for(game: GameVersion) -> u32 {
    if game == GameVersion::new(1, 20, 4) {
        PACK_FORMAT_1_20_4
    } else {
        PACK_FORMAT_OLDER
    }
}

/// Render the generated `pack.mcmeta` content, byte for byte:
/// `{"pack": {"pack_format": <int>, "description": "<name>"}}`.
///
/// The loaders that read this file compare it loosely, but downstream
/// tooling diffs the generated artifact textually, so the exact spacing
/// is part of the format.
///
/// # Errors
/// Returns an error if the description cannot be serialized.
pub fn pack_meta_json(pack_format: u32, description: &str) -> Result<String, EngineError> {
    // serde_json handles quoting and escaping of the description.
    let description = serde_json::to_string(description).map_err(|e| EngineError::Metadata {
        message: e.to_string(),
    })?;
    Ok(format!(
        r#"{{"pack": {{"pack_format": {pack_format}, "description": {description}}}}}"#
    ))
}

/// Manifest attributes attached to every produced archive.
pub fn archive_attributes(mod_info: &ModInfo) -> Vec<(String, String)> {
    vec![("MixinConfigs".to_owned(), mod_info.mixin_config())]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn nickhider() -> ModInfo {
        ModInfo {
            id: "nickhider".to_owned(),
            name: "Nick Hider".to_owned(),
            mixin_config: None,
        }
    }

    fn rule(loader: Loader, version: &str) -> PackagingRule {
        let game = GameVersion::parse(version).unwrap();
        resolve_packaging_rule(loader, game, &nickhider())
    }

    #[test]
    fn forge_1_20_3_is_special_cased() {
        let r = rule(Loader::Forge, "1.20.3");
        assert!(!r.is_identity());
        assert_eq!(r.steps.len(), 3);
    }

    #[test]
    fn fabric_1_20_3_is_identity() {
        let r = rule(Loader::Fabric, "1.20.3");
        assert!(r.is_identity());
        assert_eq!(r.manifest_path, "fabric.mod.json");
    }

    #[test]
    fn neoforge_special_versions() {
        assert!(!rule(Loader::Neoforge, "1.20.2").is_identity());
        assert!(!rule(Loader::Neoforge, "1.20.4").is_identity());
        assert!(rule(Loader::Neoforge, "1.20.6").is_identity());
        assert!(rule(Loader::Neoforge, "1.21").is_identity());
    }

    #[test]
    fn forge_other_versions_are_identity() {
        for version in ["1.20", "1.20.1", "1.20.2", "1.20.4", "1.20.6"] {
            assert!(rule(Loader::Forge, version).is_identity(), "{version}");
        }
    }

    #[test]
    fn neoforge_descriptor_renamed_at_1_20_5() {
        assert_eq!(
            rule(Loader::Neoforge, "1.20.4").manifest_path,
            "META-INF/mods.toml"
        );
        assert_eq!(
            rule(Loader::Neoforge, "1.20.6").manifest_path,
            "META-INF/neoforge.mods.toml"
        );
    }

    #[test]
    fn pack_format_22_only_for_1_20_4() {
        let r = rule(Loader::Neoforge, "1.20.4");
        let formats: Vec<u32> = r
            .steps
            .iter()
            .filter_map(|s| match s {
                RewriteStep::SynthesizePackMeta { pack_format, .. } => Some(*pack_format),
                _ => None,
            })
            .collect();
        assert_eq!(formats, vec![22]);

        let r = rule(Loader::Neoforge, "1.20.2");
        assert!(r.steps.iter().any(|s| matches!(
            s,
            RewriteStep::SynthesizePackMeta { pack_format: 18, .. }
        )));
    }

    #[test]
    fn relocation_precedes_strip() {
        // The strip step edits the relocated file, so order matters.
        let r = rule(Loader::Forge, "1.20.3");
        assert!(matches!(
            r.steps.first(),
            Some(RewriteStep::Relocate { .. })
        ));
        assert!(matches!(
            r.steps.get(1),
            Some(RewriteStep::StripField { .. })
        ));
    }

    #[test]
    fn pack_meta_literal_shape() {
        let json = pack_meta_json(22, "Nick Hider").unwrap();
        assert_eq!(
            json,
            r#"{"pack": {"pack_format": 22, "description": "Nick Hider"}}"#
        );
    }

    #[test]
    fn pack_meta_contains_spaced_format_field() {
        // The format field is written with a space after the colon; tooling
        // that greps the artifact for `"pack_format": 22` relies on it.
        let json = pack_meta_json(22, "Nick Hider").unwrap();
        assert!(json.contains(r#""pack_format": 22"#), "artifact was: {json}");
        let json = pack_meta_json(18, "Nick Hider").unwrap();
        assert!(json.contains(r#""pack_format": 18"#), "artifact was: {json}");
    }

    #[test]
    fn pack_meta_parses_back() {
        let json = pack_meta_json(18, "Nick Hider").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["pack"]["pack_format"], 18);
        assert_eq!(value["pack"]["description"], "Nick Hider");
    }

    #[test]
    fn pack_meta_escapes_description() {
        let json = pack_meta_json(18, r#"Nick "The Mask" Hider"#).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["pack"]["description"], r#"Nick "The Mask" Hider"#);
    }

    #[test]
    fn archive_attributes_carry_mixin_config() {
        let attrs = archive_attributes(&nickhider());
        assert_eq!(
            attrs,
            vec![("MixinConfigs".to_owned(), "nickhider.mixins.json".to_owned())]
        );
    }

    #[test]
    fn rule_is_pure() {
        // Same inputs, same rule — no hidden state.
        let a = rule(Loader::Neoforge, "1.20.4");
        let b = rule(Loader::Neoforge, "1.20.4");
        assert_eq!(a, b);
    }
}
