#![forbid(unsafe_code)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use chisel_config::{FeatureFlags, Manifest};

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(name = "chisel", about = "Multi-variant mod build configuration resolver")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List declared variants with their resolved toolchains
    List {
        /// Property override, e.g. -P matrixTests=true (repeatable)
        #[arg(short = 'P', value_name = "KEY=VALUE")]
        property: Vec<String>,
    },
    /// Show the resolved configuration for one variant (dry run)
    Resolve {
        /// Variant name, e.g. 1.20.4-neoforge
        variant: String,
        /// Property override, e.g. -P matrixTests=true (repeatable)
        #[arg(short = 'P', value_name = "KEY=VALUE")]
        property: Vec<String>,
    },
    /// Apply a variant's packaging steps to a build-output tree
    Apply {
        /// Variant name, e.g. 1.20.4-neoforge
        variant: String,
        /// Build-output directory to rewrite
        #[arg(long)]
        out: PathBuf,
        /// Property override, e.g. -P matrixTests=true (repeatable)
        #[arg(short = 'P', value_name = "KEY=VALUE")]
        property: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::List { property } => cmd_list(&property),
        Command::Resolve { variant, property } => cmd_resolve(&variant, &property),
        Command::Apply {
            variant,
            out,
            property,
        } => cmd_apply(&variant, &out, &property),
    };

    if let Err(msg) = result {
        eprintln!("error: {msg}");
        process::exit(1);
    }
}

/// Find the project root by looking for `chisel.toml` in the current directory.
fn project_root() -> Result<PathBuf, Box<dyn Error>> {
    let cwd = std::env::current_dir()?;
    let manifest = cwd.join("chisel.toml");
    if !manifest.exists() {
        return Err("no chisel.toml found in current directory".into());
    }
    Ok(cwd)
}

/// Collect feature flags: `chisel.properties` next to the manifest, then
/// `-P` overrides on top.
fn load_flags(root: &Path, overrides: &[String]) -> Result<FeatureFlags, Box<dyn Error>> {
    let mut flags = FeatureFlags::from_path(&root.join("chisel.properties"))?;
    for assignment in overrides {
        flags.apply_assignment(assignment)?;
    }
    Ok(flags)
}

fn cmd_list(overrides: &[String]) -> CliResult {
    let root = project_root()?;
    let manifest = Manifest::from_path(&root.join("chisel.toml"))?;
    let flags = load_flags(&root, overrides)?;
    let variants = manifest.expand_variants()?;

    eprintln!("{} ({} variants)", manifest.mod_info.name, variants.len());
    for variant in &variants {
        let java = chisel_engine::resolve_toolchain(&variant.raw_game);
        let rule =
            chisel_engine::resolve_packaging_rule(variant.loader, variant.game, &manifest.mod_info);
        let note = if rule.is_identity() {
            String::new()
        } else {
            format!("  ({} packaging steps)", rule.steps.len())
        };
        let name = variant.to_string();
        eprintln!("    {name:<18} java {java}{note}");
    }
    if flags.enabled(chisel_config::properties::MATRIX_TESTS) {
        eprintln!("    matrix tests: enabled");
    }
    Ok(())
}

fn cmd_resolve(variant_name: &str, overrides: &[String]) -> CliResult {
    let root = project_root()?;
    let manifest = Manifest::from_path(&root.join("chisel.toml"))?;
    let flags = load_flags(&root, overrides)?;
    let variant = manifest.find_variant(variant_name)?;

    let java = chisel_engine::resolve_toolchain(&variant.raw_game);
    let rule =
        chisel_engine::resolve_packaging_rule(variant.loader, variant.game, &manifest.mod_info);

    eprintln!("    Variant:  {variant}");
    eprintln!("    Java:     {java}");
    eprintln!("    Manifest: {}", rule.manifest_path);
    for (key, value) in chisel_engine::archive_attributes(&manifest.mod_info) {
        eprintln!("    Archive:  {key}: {value}");
    }
    if rule.is_identity() {
        eprintln!("    Steps:    none");
    } else {
        eprintln!("    Steps:");
        for step in &rule.steps {
            eprintln!("      - {step}");
        }
    }
    eprintln!(
        "    Matrix tests: {}",
        if flags.enabled(chisel_config::properties::MATRIX_TESTS) {
            "enabled"
        } else {
            "disabled"
        }
    );
    Ok(())
}

fn cmd_apply(variant_name: &str, out: &Path, overrides: &[String]) -> CliResult {
    let root = project_root()?;
    let manifest = Manifest::from_path(&root.join("chisel.toml"))?;
    // Flags are resolved here too so a bad -P fails before any file I/O.
    let _flags = load_flags(&root, overrides)?;
    let variant = manifest.find_variant(variant_name)?;

    let rule =
        chisel_engine::resolve_packaging_rule(variant.loader, variant.game, &manifest.mod_info);
    let report = chisel_engine::apply_rule(&rule, out)?;
    chisel_engine::write_archive_manifest(out, &chisel_engine::archive_attributes(&manifest.mod_info))?;

    eprintln!(
        "    Applied {} step(s) for {variant} ({} skipped)",
        report.applied_count(),
        report.skipped_count()
    );
    for skipped in &report.skipped {
        eprintln!("      skipped: {skipped} (input absent)");
    }
    Ok(())
}
