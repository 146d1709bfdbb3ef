//! Variant identifier model: game versions, loaders, and variant names.

use std::fmt;
use std::str::FromStr;

/// A dotted game version, e.g. `1.20.4`.
///
/// Ordered by (major, minor, patch) so version-range policies can use plain
/// comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GameVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a dotted version string.
    ///
    /// A missing patch component defaults to 0 (`"1.21"` is `1.21.0`).
    /// Returns `None` for anything that is not two or three dot-separated
    /// decimal integers; callers that want the degraded-default behavior
    /// handle the `None` themselves.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split('.');
        let major: u32 = parts.next()?.parse().ok()?;
        let minor: u32 = parts.next()?.parse().ok()?;
        let patch: u32 = match parts.next() {
            Some(p) => p.parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

/// The mod-loading runtime a variant targets. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Loader {
    Fabric,
    Forge,
    Neoforge,
}

impl Loader {
    pub const ALL: [Loader; 3] = [Loader::Fabric, Loader::Forge, Loader::Neoforge];

    pub const fn name(self) -> &'static str {
        match self {
            Loader::Fabric => "fabric",
            Loader::Forge => "forge",
            Loader::Neoforge => "neoforge",
        }
    }
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Loader {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fabric" => Ok(Loader::Fabric),
            "forge" => Ok(Loader::Forge),
            "neoforge" => Ok(Loader::Neoforge),
            other => Err(TargetError::UnknownLoader {
                name: other.to_owned(),
            }),
        }
    }
}

/// A single build variant: one game version built for one loader.
///
/// Constructed once per configuration pass from a variant directory name of
/// the form `<gameVersion>-<loaderName>`, e.g. `1.20.4-neoforge`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantId {
    pub game: GameVersion,
    /// The version string exactly as it appeared in the variant name.
    pub raw_game: String,
    pub loader: Loader,
}

impl VariantId {
    /// Parse a `<gameVersion>-<loaderName>` variant name.
    ///
    /// Splits on the last `-` so hyphenated version strings keep working.
    ///
    /// # Errors
    /// Returns an error if there is no `-` separator, the loader name is not
    /// in the closed set, or the version part is not a dotted version.
    pub fn parse(name: &str) -> Result<Self, TargetError> {
        let Some((version_part, loader_part)) = name.rsplit_once('-') else {
            return Err(TargetError::MalformedVariant {
                name: name.to_owned(),
            });
        };
        let loader = loader_part.parse::<Loader>()?;
        let game =
            GameVersion::parse(version_part).ok_or_else(|| TargetError::MalformedVariant {
                name: name.to_owned(),
            })?;
        Ok(Self {
            game,
            raw_game: version_part.to_owned(),
            loader,
        })
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.raw_game, self.loader)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("unknown loader `{name}` — expected fabric, forge, or neoforge")]
    UnknownLoader { name: String },

    #[error("malformed variant name `{name}` — expected <gameVersion>-<loader>, e.g. 1.20.4-fabric")]
    MalformedVariant { name: String },
}
