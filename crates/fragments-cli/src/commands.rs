use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use fragments_core::{
    compatible_types, Extension, Fragment, Fragments, FragmentsConfig, InMemoryFragmentStore,
    MediaType, OwnerId,
};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => FragmentsConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => FragmentsConfig::default(),
    };
    match cli.command {
        Command::Types => cmd_types(&cli.format),
        Command::Formats(args) => cmd_formats(args, &cli.format),
        Command::Inspect(args) => cmd_inspect(args, config, &cli.format).await,
        Command::Convert(args) => cmd_convert(args, config).await,
    }
}

fn cmd_types(format: &OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Json = format {
        let types: Vec<&str> = MediaType::ALL.iter().map(|t| t.as_str()).collect();
        println!("{}", serde_json::to_string_pretty(&types)?);
        return Ok(());
    }
    for media_type in MediaType::ALL {
        let extensions: Vec<&str> = Extension::ALL
            .iter()
            .filter(|ext| ext.media_type() == media_type)
            .map(|ext| ext.as_str())
            .collect();
        println!("{:<18} {}", media_type.as_str().bold(), extensions.join(", ").cyan());
    }
    Ok(())
}

fn cmd_formats(args: FormatsArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let types = compatible_types(&args.media_type);
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&types)?);
        return Ok(());
    }
    if !MediaType::is_supported(&args.media_type) {
        println!("{} {} is not a supported type", "!".yellow().bold(), args.media_type);
    }
    for media_type in types {
        println!("  {}", media_type.cyan());
    }
    Ok(())
}

async fn cmd_inspect(
    args: InspectArgs,
    config: FragmentsConfig,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let owner = owner(args.owner, &config)?;
    let fragments = Fragments::with_config(Arc::new(InMemoryFragmentStore::new()), config);
    let fragment = store_file(&fragments, &owner, &args.file, args.media_type.as_deref()).await?;

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&fragment)?);
        return Ok(());
    }
    println!("Fragment {}", fragment.id().to_string().yellow().bold());
    println!("  Owner:   {}", fragment.owner_id());
    println!("  Type:    {}", fragment.content_type().to_string().cyan());
    println!("  Size:    {} bytes", fragment.size());
    println!("  Created: {}", fragment.created());
    let formats: Vec<&str> = fragment.compatible_types().iter().map(|t| t.as_str()).collect();
    println!("  Formats: {}", formats.join(", "));
    Ok(())
}

async fn cmd_convert(args: ConvertArgs, config: FragmentsConfig) -> anyhow::Result<()> {
    let owner = owner(args.owner, &config)?;
    let fragments = Fragments::with_config(Arc::new(InMemoryFragmentStore::new()), config);
    let fragment = store_file(&fragments, &owner, &args.file, args.media_type.as_deref()).await?;

    tracing::debug!(file = %args.file.display(), id = %fragment.id(), to = %args.to, "converting");
    let identifier = format!("{}.{}", fragment.id(), args.to);
    let rendition = fragments.read_as(&owner, &identifier).await?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &rendition.data)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!(
                "{} Wrote {} ({}, {} bytes)",
                "✓".green().bold(),
                path.display().to_string().bold(),
                rendition.content_type.to_string().cyan(),
                rendition.data.len()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&rendition.data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn owner(requested: Option<String>, config: &FragmentsConfig) -> anyhow::Result<OwnerId> {
    let name = requested.unwrap_or_else(|| config.default_owner.clone());
    Ok(OwnerId::new(name)?)
}

/// Read `path` into a new fragment, taking the type from `--type` or the
/// file extension.
async fn store_file(
    fragments: &Fragments,
    owner: &OwnerId,
    path: &Path,
    media_type: Option<&str>,
) -> anyhow::Result<Fragment> {
    let media_type = match media_type {
        Some(media_type) => media_type.to_string(),
        None => infer_type(path)?.to_string(),
    };
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(fragments.create_with_data(owner, &media_type, data).await?)
}

fn infer_type(path: &Path) -> anyhow::Result<MediaType> {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        bail!("cannot infer a type for {}, pass --type", path.display());
    };
    match ext.parse::<Extension>() {
        Ok(ext) => Ok(ext.media_type()),
        Err(_) => bail!("unknown extension .{ext}, pass --type"),
    }
}
