use serde::{Deserialize, Serialize};
use std::path::Path;

use chisel_targets::{GameVersion, Loader, TargetError, VariantId};

/// The `chisel.toml` project manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "mod")]
    pub mod_info: ModInfo,
    #[serde(default)]
    pub variants: Vec<VariantRow>,
}

/// The `[mod]` table: identity of the mod being packaged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModInfo {
    /// Machine id, e.g. `nickhider`. Used in descriptor and mixin filenames.
    pub id: String,
    /// Human-readable name, e.g. `Nick Hider`. Used in generated metadata.
    pub name: String,
    /// Mixin configuration filename. Defaults to `<id>.mixins.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixin_config: Option<String>,
}

impl ModInfo {
    /// The mixin configuration filename, defaulted from the mod id.
    pub fn mixin_config(&self) -> String {
        self.mixin_config
            .clone()
            .unwrap_or_else(|| format!("{}.mixins.json", self.id))
    }
}

/// One `[[variants]]` row: a game version and the loaders it builds for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantRow {
    pub game: String,
    pub loaders: Vec<String>,
}

impl Manifest {
    /// Read and parse a `chisel.toml` from the given path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let manifest: Manifest = toml::from_str(&content).map_err(|e| ManifestError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(manifest)
    }

    /// Expand the `[[variants]]` rows into the flat variant list, in
    /// declaration order.
    ///
    /// # Errors
    /// Returns an error on an unparsable game version, an unknown loader, or
    /// a duplicate (game, loader) pair.
    pub fn expand_variants(&self) -> Result<Vec<VariantId>, ManifestError> {
        let mut out: Vec<VariantId> = Vec::new();
        for row in &self.variants {
            let game =
                GameVersion::parse(&row.game).ok_or_else(|| ManifestError::InvalidGameVersion {
                    version: row.game.clone(),
                })?;
            for loader_name in &row.loaders {
                let loader: Loader = loader_name.parse()?;
                let variant = VariantId {
                    game,
                    raw_game: row.game.clone(),
                    loader,
                };
                if out.iter().any(|v| v.game == game && v.loader == loader) {
                    return Err(ManifestError::DuplicateVariant {
                        variant: variant.to_string(),
                    });
                }
                out.push(variant);
            }
        }
        Ok(out)
    }

    /// Look up a declared variant by name, e.g. `1.20.4-neoforge`.
    ///
    /// # Errors
    /// Returns an error if the name does not parse or names a variant the
    /// manifest does not declare.
    pub fn find_variant(&self, name: &str) -> Result<VariantId, ManifestError> {
        let wanted = VariantId::parse(name)?;
        let declared = self.expand_variants()?;
        declared
            .into_iter()
            .find(|v| v.game == wanted.game && v.loader == wanted.loader)
            .ok_or_else(|| ManifestError::UndeclaredVariant {
                variant: name.to_owned(),
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid chisel.toml at {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid game version `{version}` in [[variants]]")]
    InvalidGameVersion { version: String },
    #[error("{0}")]
    Target(#[from] TargetError),
    #[error("variant `{variant}` is declared more than once")]
    DuplicateVariant { variant: String },
    #[error("variant `{variant}` is not declared in chisel.toml")]
    UndeclaredVariant { variant: String },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    const BASIC: &str = r#"
[mod]
id = "nickhider"
name = "Nick Hider"

[[variants]]
game = "1.20.2"
loaders = ["fabric", "forge", "neoforge"]

[[variants]]
game = "1.21"
loaders = ["fabric", "neoforge"]
"#;

    fn write_manifest(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let path = dir.path().join("chisel.toml");
        fs::write(&path, content).unwrap_or_else(|e| panic!("{e}"));
        (dir, path)
    }

    #[test]
    fn parse_basic_manifest() {
        let (_dir, path) = write_manifest(BASIC);
        let manifest = Manifest::from_path(&path).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(manifest.mod_info.id, "nickhider");
        assert_eq!(manifest.mod_info.name, "Nick Hider");
        assert_eq!(manifest.variants.len(), 2);
    }

    #[test]
    fn mixin_config_defaults_from_id() {
        let (_dir, path) = write_manifest(BASIC);
        let manifest = Manifest::from_path(&path).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(manifest.mod_info.mixin_config(), "nickhider.mixins.json");
    }

    #[test]
    fn explicit_mixin_config_wins() {
        let content = r#"
[mod]
id = "nickhider"
name = "Nick Hider"
mixin_config = "custom.mixins.json"
"#;
        let (_dir, path) = write_manifest(content);
        let manifest = Manifest::from_path(&path).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(manifest.mod_info.mixin_config(), "custom.mixins.json");
    }

    #[test]
    fn expand_preserves_declaration_order() {
        let (_dir, path) = write_manifest(BASIC);
        let manifest = Manifest::from_path(&path).unwrap_or_else(|e| panic!("{e}"));
        let variants = manifest.expand_variants().unwrap_or_else(|e| panic!("{e}"));
        let names: Vec<String> = variants.iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            vec![
                "1.20.2-fabric",
                "1.20.2-forge",
                "1.20.2-neoforge",
                "1.21-fabric",
                "1.21-neoforge",
            ]
        );
    }

    #[test]
    fn duplicate_variant_rejected() {
        let content = r#"
[mod]
id = "x"
name = "X"

[[variants]]
game = "1.20.4"
loaders = ["fabric", "fabric"]
"#;
        let (_dir, path) = write_manifest(content);
        let manifest = Manifest::from_path(&path).unwrap_or_else(|e| panic!("{e}"));
        let err = manifest.expand_variants().unwrap_err();
        assert!(err.to_string().contains("1.20.4-fabric"), "error was: {err}");
    }

    #[test]
    fn unknown_loader_rejected() {
        let content = r#"
[mod]
id = "x"
name = "X"

[[variants]]
game = "1.20.4"
loaders = ["quilt"]
"#;
        let (_dir, path) = write_manifest(content);
        let manifest = Manifest::from_path(&path).unwrap_or_else(|e| panic!("{e}"));
        let err = manifest.expand_variants().unwrap_err();
        assert!(err.to_string().contains("quilt"), "error was: {err}");
    }

    #[test]
    fn bad_game_version_rejected() {
        let content = r#"
[mod]
id = "x"
name = "X"

[[variants]]
game = "latest"
loaders = ["fabric"]
"#;
        let (_dir, path) = write_manifest(content);
        let manifest = Manifest::from_path(&path).unwrap_or_else(|e| panic!("{e}"));
        let err = manifest.expand_variants().unwrap_err();
        assert!(err.to_string().contains("latest"), "error was: {err}");
    }

    #[test]
    fn find_declared_variant() {
        let (_dir, path) = write_manifest(BASIC);
        let manifest = Manifest::from_path(&path).unwrap_or_else(|e| panic!("{e}"));
        let v = manifest
            .find_variant("1.20.2-neoforge")
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(v.loader, Loader::Neoforge);
    }

    #[test]
    fn find_undeclared_variant_fails() {
        let (_dir, path) = write_manifest(BASIC);
        let manifest = Manifest::from_path(&path).unwrap_or_else(|e| panic!("{e}"));
        let err = manifest.find_variant("1.20.2-quilt").unwrap_err();
        assert!(
            matches!(err, ManifestError::Target(_)),
            "error was: {err}"
        );
        let err = manifest.find_variant("1.19-fabric").unwrap_err();
        assert!(
            matches!(err, ManifestError::UndeclaredVariant { .. }),
            "error was: {err}"
        );
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let err = Manifest::from_path(&dir.path().join("chisel.toml")).unwrap_err();
        assert!(
            matches!(err, ManifestError::Read { .. }),
            "error was: {err}"
        );
    }
}
