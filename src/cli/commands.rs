//! CLI command implementations

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing::warn;

use super::Workspace;
use crate::banner::{same_image, BannerData};
use crate::config::Config;
use crate::link::{
    apply_resolution_writeback, is_icon_link, parse_icon, ContentProbe, DocumentContext, HttpProbe,
    IconKind, ParsedLink, Writeback,
};
use crate::settings::{save_settings, settings_path, Settings};
use crate::vault::{parse_frontmatter, NoteWriter};

/// Write default settings into the vault
pub fn init(vault_path: &Path, global_config: bool) -> Result<()> {
    println!("Initializing banner settings in: {}", vault_path.display());

    let path = settings_path(vault_path);
    if path.exists() {
        println!("Settings already exist: {}", path.display());
    } else {
        save_settings(vault_path, &Settings::default())?;
        println!("✓ Created {}", path.display());
    }

    if global_config {
        let config_path = Config::default_path();
        Config::create_default(&config_path)?;
        println!("✓ Config at {}", config_path.display());
    }

    Ok(())
}

/// Flags for the `parse` command
pub struct ParseOptions<'a> {
    pub note: Option<&'a Path>,
    pub property: Option<&'a str>,
    pub apply: bool,
    pub probe: bool,
    pub json: bool,
}

/// Parse a single banner value
pub async fn parse(workspace: &Workspace, value: &str, options: ParseOptions<'_>) -> Result<()> {
    let context = options
        .note
        .map(|note| document_context(workspace, note))
        .transpose()?;

    let parser = workspace.parser();
    let resolution = parser.resolve(value, context.as_ref(), options.property);

    let http = HttpProbe::new();
    let probe = content_probe(workspace, options.probe, &http);
    let link = resolution.link.classify(probe).await;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&link)?);
    } else {
        print_link(&link);
        if let Some(file) = &resolution.file {
            println!("  file:       {}", file.path);
        }
    }

    if let Some(writeback) = &resolution.writeback {
        handle_writeback(workspace, writeback, options.apply)?;
    }

    Ok(())
}

/// Parse a single icon value
pub fn icon(workspace: &Workspace, value: &str, note: Option<&Path>, apply: bool, json: bool) -> Result<()> {
    let context = note.map(|n| document_context(workspace, n)).transpose()?;
    let parser = workspace.parser();

    let (icon, writeback) = parse_icon(
        &parser,
        value,
        context.as_ref(),
        &workspace.settings.properties.icon,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&icon)?);
    } else {
        let kind = match icon.kind {
            IconKind::Link => "link",
            IconKind::Text => "text",
        };
        println!("{} {}", kind, icon.value);
    }

    if let Some(writeback) = &writeback {
        handle_writeback(workspace, writeback, apply)?;
    }

    Ok(())
}

/// Flags for the `banner` command
pub struct BannerOptions<'a> {
    pub apply: bool,
    pub probe: bool,
    pub previous: Option<&'a str>,
    pub json: bool,
}

/// Show what would be rendered above a note
pub async fn banner(workspace: &Workspace, note: &Path, options: BannerOptions<'_>) -> Result<()> {
    let context = document_context(workspace, note)?;
    let note_path = workspace.index.root().join(&context.path);

    let content = std::fs::read_to_string(&note_path)
        .with_context(|| format!("Failed to read note: {}", note_path.display()))?;
    let frontmatter = parse_frontmatter(&content)
        .with_context(|| format!("Failed to parse frontmatter in {}", context.path))?;

    let parser = workspace.parser();
    let data = BannerData::from_note(
        &parser,
        &context.path,
        frontmatter.as_ref(),
        &workspace.settings.properties,
        workspace.device_settings(),
        chrono::Local::now().naive_local(),
    );

    let http = HttpProbe::new();
    let data = data.classify(content_probe(workspace, options.probe, &http)).await;

    let current = frontmatter
        .as_ref()
        .and_then(|fm| fm.property(&workspace.settings.properties.image));
    let unchanged = options
        .previous
        .map(|previous| same_image(&parser, Some(previous), current.as_deref()));

    if options.json {
        let output = match unchanged {
            Some(unchanged) => serde_json::json!({ "banner": data, "sameImage": unchanged }),
            None => serde_json::to_value(&data)?,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_banner(&data);
        match unchanged {
            Some(true) => println!("\nSame image as the previous value; only options differ."),
            Some(false) => println!("\nImage differs from the previous value."),
            None => {}
        }
    }

    for writeback in &data.writebacks {
        handle_writeback(workspace, writeback, options.apply)?;
    }

    Ok(())
}

/// Report banner and icon values that point at nothing
pub fn check(workspace: &Workspace, strict: bool) -> Result<()> {
    println!("Checking vault: {}", workspace.index.root().display());

    let parser = workspace.parser();
    let properties = &workspace.settings.properties;
    let mut errors = 0;
    let mut warnings = 0;
    let mut note_count = 0;

    for note in workspace.index.notes() {
        note_count += 1;
        let path = workspace.index.absolute_path(note);

        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                println!("ERROR: {} - Failed to read: {}", note.path, e);
                errors += 1;
                continue;
            }
        };

        let frontmatter = match parse_frontmatter(&content) {
            Ok(Some(fm)) => fm,
            Ok(None) => continue,
            Err(e) => {
                println!("ERROR: {} - Frontmatter error: {:#}", note.path, e);
                errors += 1;
                continue;
            }
        };

        let context = DocumentContext::new(note.path.clone());
        for (property, is_icon) in [(&properties.image, false), (&properties.icon, true)] {
            let Some(value) = frontmatter.property(property) else {
                continue;
            };
            if value.trim().is_empty() || (is_icon && !is_icon_link(&parser, &value)) {
                continue;
            }

            let resolution = parser.resolve(&value, Some(&context), Some(property.as_str()));
            if !resolution.link.external && resolution.file.is_none() {
                println!(
                    "ERROR: {} - {} '{}' not found in vault",
                    note.path, property, resolution.link.url
                );
                errors += 1;
            } else if resolution.writeback.is_some() {
                println!(
                    "WARN:  {} - {} is an editor link; `sbn banner --apply` rewrites it as a wikilink",
                    note.path, property
                );
                warnings += 1;
            }
        }
    }

    println!();
    if errors == 0 && warnings == 0 {
        println!("✓ No issues found in {} notes.", note_count);
    } else {
        println!(
            "Found {} error(s), {} warning(s) in {} notes.",
            errors, warnings, note_count
        );
    }

    if errors > 0 || (strict && warnings > 0) {
        std::process::exit(1);
    }

    Ok(())
}

/// Show the settings for the selected device
pub fn show_settings(workspace: &Workspace, json: bool) -> Result<()> {
    let device = workspace.device_settings();

    if json {
        let value = serde_json::json!({
            "device": workspace.device,
            "settings": device,
            "properties": workspace.settings.properties,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let properties = &workspace.settings.properties;
    println!("Banner Settings ({})", workspace.device.key());
    println!("================");
    println!("Banner:     {}", on_off(device.banner_enabled));
    println!("Height:     {}px", device.height);
    println!("Offset:     {}px", device.note_offset);
    println!("Icon:       {}", on_off(device.icon_enabled));
    println!("Datetime:   {}", on_off(device.datetime_enabled));
    println!();
    println!("Properties: banner={} icon={} datetime={}", properties.image, properties.icon, properties.datetime);
    println!("Host links: {}", workspace.config.host_scheme());

    Ok(())
}

fn document_context(workspace: &Workspace, note: &Path) -> Result<DocumentContext> {
    workspace
        .index
        .document_path(note)
        .map(DocumentContext::new)
        .ok_or_else(|| anyhow!("Note is not in the vault: {}", note.display()))
}

fn content_probe<'a>(workspace: &Workspace, requested: bool, http: &'a HttpProbe) -> Option<&'a dyn ContentProbe> {
    if requested || workspace.config.probe {
        Some(http as &dyn ContentProbe)
    } else {
        None
    }
}

fn handle_writeback(workspace: &Workspace, writeback: &Writeback, apply: bool) -> Result<()> {
    if !apply {
        println!(
            "Note: {} could be set to {} (run with --apply)",
            writeback.property, writeback.value
        );
        return Ok(());
    }

    let writer = NoteWriter::new(workspace.index.root());
    match apply_resolution_writeback(writeback, &writer) {
        Ok(()) => {
            println!("✓ Set {} to {} in {}", writeback.property, writeback.value, writeback.document);
            Ok(())
        }
        Err(e) => {
            warn!(document = %writeback.document, error = %e, "write-back failed");
            Err(e)
        }
    }
}

fn print_link(link: &ParsedLink) {
    let options = link.options();
    println!("url:          {}", link.url);
    println!("  external:   {}", link.external);
    println!("  offset:     {}px, {}px", options.x, options.y);
    println!("  repeat:     {}", options.repeatable);
    if let Some(kind) = link.kind {
        println!("  kind:       {:?}", kind);
    }
}

fn print_banner(data: &BannerData) {
    if data.is_empty() {
        println!("No banner for {}", data.document);
        return;
    }

    println!("Banner for {}", data.document);
    println!();
    if let Some(image) = &data.image {
        print_link(image);
    }
    if let Some(icon) = &data.icon {
        println!("icon:         {}", icon.value);
    }
    if let Some(datetime) = &data.datetime {
        println!("datetime:     {} {}", datetime.time, datetime.date);
    }
    if !data.variables.is_empty() {
        println!();
        for (name, value) in &data.variables {
            println!("{}: {};", name, value);
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
