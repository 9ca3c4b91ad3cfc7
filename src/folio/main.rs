use clap::Parser;
use colored::*;
use folio::api::{CmdMessage, ConfigAction, MessageLevel, NewTemplate};
use folio::error::{FolioError, Result};
use folio::init::{self, FolioContext};
use folio::model::{DocumentFilter, Metadata, RecordsManagement, VersionHistory};
use folio::template::{FieldSchema, FieldType, MergeData, Template};
use std::io::Read;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands, TemplateCommands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut ctx = init::initialize(&cwd);

    match cli.command {
        Some(Commands::New {
            title,
            content,
            from,
        }) => handle_new(&mut ctx, title, content, from),
        Some(Commands::Save {
            selector,
            content,
            from,
            title,
            comment,
        }) => handle_save(&mut ctx, &selector, content, from, title, comment),
        Some(Commands::Show { selector, version }) => handle_show(&ctx, &selector, version),
        Some(Commands::History { selector }) => handle_history(&ctx, &selector),
        Some(Commands::Restore { selector, version }) => {
            handle_restore(&mut ctx, &selector, version)
        }
        Some(Commands::List {
            search,
            document_type,
            classification,
            finalized,
        }) => handle_list(&ctx, search, document_type, classification, finalized),
        Some(Commands::Delete { selectors }) => handle_delete(&mut ctx, &selectors),
        Some(Commands::Records {
            selector,
            classification,
            document_type,
            retention,
            record_number,
            notes,
        }) => handle_records(
            &mut ctx,
            &selector,
            classification,
            document_type,
            retention,
            record_number,
            notes,
        ),
        Some(Commands::Finalize {
            selector,
            by,
            notes,
        }) => handle_finalize(&mut ctx, &selector, by, notes),
        Some(Commands::Template { command }) => handle_template(&mut ctx, command),
        Some(Commands::Generate {
            selector,
            data,
            data_file,
            name,
            preview,
            batch,
        }) => handle_generate(&mut ctx, &selector, data, data_file, name, preview, batch),
        Some(Commands::Fields { category, search }) => handle_fields(&ctx, category, search),
        Some(Commands::Export { selector }) => handle_export(&ctx, &selector),
        Some(Commands::Path { selectors }) => handle_paths(&ctx, &selectors),
        Some(Commands::Doctor) => handle_doctor(&mut ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Init) => handle_init(&ctx),
        None => handle_list(&ctx, None, None, None, false),
    }
}

/// Content comes from the positional argument, `--from FILE`, or stdin
/// (explicitly with "-", or implicitly when nothing else is given).
fn read_content(content: Option<String>, from: Option<PathBuf>) -> Result<String> {
    if let Some(path) = from {
        return std::fs::read_to_string(&path).map_err(FolioError::Io);
    }
    match content.as_deref() {
        Some("-") | None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(FolioError::Io)?;
            Ok(buf)
        }
        Some(text) => Ok(text.to_string()),
    }
}

fn handle_new(
    ctx: &mut FolioContext,
    title: Option<String>,
    content: Option<String>,
    from: Option<PathBuf>,
) -> Result<()> {
    let content = read_content(content, from)?;
    let result = ctx.api.create_document(title, &content)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_save(
    ctx: &mut FolioContext,
    selector: &str,
    content: Option<String>,
    from: Option<PathBuf>,
    title: Option<String>,
    comment: Option<String>,
) -> Result<()> {
    let content = read_content(content, from)?;
    let result = ctx
        .api
        .save_document(selector, &content, title.as_deref(), comment.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &FolioContext, selector: &str, version: Option<u32>) -> Result<()> {
    let result = ctx.api.show_document(selector, version)?;
    if let Some(vc) = &result.version_content {
        println!("{}", vc.content);
    }
    for document in &result.affected_documents {
        println!("{}", document.content);
    }
    Ok(())
}

fn handle_history(ctx: &FolioContext, selector: &str) -> Result<()> {
    let result = ctx.api.document_history(selector)?;
    if let Some(history) = &result.history {
        print_history(history);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_restore(ctx: &mut FolioContext, selector: &str, version: u32) -> Result<()> {
    let result = ctx.api.restore_version(selector, version)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(
    ctx: &FolioContext,
    search: Option<String>,
    document_type: Option<String>,
    classification: Option<String>,
    finalized: bool,
) -> Result<()> {
    let filter = DocumentFilter {
        search_term: search,
        document_type,
        classification,
        finalized: if finalized { Some(true) } else { None },
    };
    let result = ctx.api.list_documents(&filter)?;
    print_documents(&result.listed_documents);
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut FolioContext, selectors: &[String]) -> Result<()> {
    let result = ctx.api.delete_documents(selectors)?;
    print_messages(&result.messages);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_records(
    ctx: &mut FolioContext,
    selector: &str,
    classification: Option<String>,
    document_type: Option<String>,
    retention: Option<String>,
    record_number: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let rm = RecordsManagement {
        classification,
        document_type,
        retention_period: retention,
        record_number,
        notes,
        ..Default::default()
    };
    let result = ctx.api.set_records(selector, rm)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_finalize(
    ctx: &mut FolioContext,
    selector: &str,
    by: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let result = ctx.api.finalize_document(selector, by, notes)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_template(ctx: &mut FolioContext, command: TemplateCommands) -> Result<()> {
    match command {
        TemplateCommands::Add {
            name,
            content,
            from,
            description,
            category,
            document_type,
            classification,
            retention,
        } => {
            let content = read_content(content, from)?;
            let records_management = if classification.is_some() || retention.is_some() {
                Some(RecordsManagement {
                    classification,
                    retention_period: retention,
                    ..Default::default()
                })
            } else {
                None
            };
            let result = ctx.api.add_template(NewTemplate {
                name,
                content,
                description: description.unwrap_or_default(),
                category: category.unwrap_or_default(),
                document_type: document_type.unwrap_or_default(),
                records_management,
            })?;
            print_messages(&result.messages);
        }
        TemplateCommands::List => {
            let result = ctx.api.list_templates()?;
            print_templates(&result.templates);
            print_messages(&result.messages);
        }
        TemplateCommands::Show { selector } => {
            let result = ctx.api.show_template(&selector)?;
            for template in &result.templates {
                print_template_detail(template);
            }
            print_messages(&result.messages);
        }
        TemplateCommands::Rm { selector } => {
            let result = ctx.api.remove_template(&selector)?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn handle_generate(
    ctx: &mut FolioContext,
    selector: &str,
    data: Vec<String>,
    data_file: Option<PathBuf>,
    name: Option<String>,
    preview: bool,
    batch: bool,
) -> Result<()> {
    if batch {
        let path = data_file.ok_or_else(|| {
            FolioError::Api("--batch requires --data-file with a JSON array".into())
        })?;
        let items = read_batch_file(&path)?;
        let result = ctx.api.generate_batch(selector, &items, name)?;
        print_messages(&result.messages);
        return Ok(());
    }

    let merge_data = build_merge_data(data, data_file)?;
    let result = if preview {
        ctx.api.preview(selector, &merge_data)?
    } else {
        ctx.api.generate(selector, &merge_data, name)?
    };
    print_messages(&result.messages);
    if let Some(merged) = &result.preview {
        println!("{}", merged);
    }
    Ok(())
}

/// Assemble merge data from `--data-file` (a JSON object) and repeated
/// `-d field=value` pairs; the pairs win on conflicts.
fn build_merge_data(pairs: Vec<String>, data_file: Option<PathBuf>) -> Result<MergeData> {
    let mut merge_data = MergeData::new();

    if let Some(path) = data_file {
        let text = std::fs::read_to_string(&path).map_err(FolioError::Io)?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(FolioError::Serialization)?;
        match value {
            serde_json::Value::Object(map) => {
                merge_data.extend(map);
            }
            _ => {
                return Err(FolioError::Api(
                    "data file must contain a JSON object".into(),
                ))
            }
        }
    }

    for pair in pairs {
        match pair.split_once('=') {
            Some((key, value)) => {
                merge_data.insert(key.trim().to_string(), serde_json::Value::String(value.to_string()));
            }
            None => {
                return Err(FolioError::Api(format!(
                    "Invalid data pair '{}' (expected field=value)",
                    pair
                )))
            }
        }
    }

    Ok(merge_data)
}

fn read_batch_file(path: &std::path::Path) -> Result<Vec<MergeData>> {
    let text = std::fs::read_to_string(path).map_err(FolioError::Io)?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(FolioError::Serialization)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        _ => {
            return Err(FolioError::Api(
                "batch data file must contain a JSON array of objects".into(),
            ))
        }
    };

    let mut batch = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match item {
            serde_json::Value::Object(map) => batch.push(map.into_iter().collect()),
            _ => {
                return Err(FolioError::Api(format!(
                    "batch item {} is not a JSON object",
                    i + 1
                )))
            }
        }
    }
    Ok(batch)
}

fn handle_fields(
    ctx: &FolioContext,
    category: Option<String>,
    search: Option<String>,
) -> Result<()> {
    let result = ctx.api.fields(category.as_deref(), search.as_deref())?;
    print_fields(&result.fields);
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &FolioContext, selector: &str) -> Result<()> {
    let result = ctx.api.export_document(selector)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_paths(ctx: &FolioContext, selectors: &[String]) -> Result<()> {
    let result = ctx.api.document_paths(selectors)?;
    for path in &result.document_paths {
        println!("{}", path.display());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(ctx: &mut FolioContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &FolioContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key.as_deref(), value) {
        (None, _) => ConfigAction::ShowAll,
        (Some("file-ext"), None) => ConfigAction::ShowKey("file-ext".to_string()),
        (Some("file-ext"), Some(v)) => ConfigAction::SetFileExt(v),
        (Some(other), _) => {
            println!("Unknown config key: {}", other);
            return Ok(());
        }
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        println!("file-ext = {}", config.get_file_ext());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_init(ctx: &FolioContext) -> Result<()> {
    let result = ctx.api.init()?;
    print_messages(&result.messages);
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 10;
const FINAL_MARKER: &str = "🔒";

fn print_documents(documents: &[Metadata]) {
    if documents.is_empty() {
        println!("No documents found.");
        return;
    }

    for meta in documents {
        let id_str = format!("{:<width$}", short_id(meta), width = ID_WIDTH);
        let version_str = format!("v{:<4}", meta.current_version);
        let final_marker = if meta.is_final() {
            format!("{} ", FINAL_MARKER)
        } else {
            "  ".to_string()
        };

        let fixed_width = ID_WIDTH + version_str.width() + final_marker.width() + TIME_WIDTH + 2;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let title_display = truncate_to_width(&meta.title, available);
        let padding = available.saturating_sub(title_display.width());

        let time_ago = format_time_ago(meta.modified_at);

        println!(
            "{} {}{}{} {}{}",
            id_str.dimmed(),
            title_display,
            " ".repeat(padding),
            version_str.yellow(),
            final_marker,
            time_ago.dimmed()
        );
    }
}

fn print_history(history: &VersionHistory) {
    for record in history.versions.iter().rev() {
        let version_str = if record.version == history.current_version {
            format!("v{} (current)", record.version).green().to_string()
        } else {
            format!("v{}", record.version).yellow().to_string()
        };
        println!(
            "{:<16} {}  {}",
            version_str,
            record.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            record.comment
        );
    }
}

fn print_templates(templates: &[Template]) {
    for template in templates {
        let category = if template.category.is_empty() {
            String::new()
        } else {
            format!(" [{}]", template.category)
        };
        println!(
            "{} {}{}",
            short_id_raw(&template.id).dimmed(),
            template.name.bold(),
            category.dimmed()
        );
        if !template.description.is_empty() {
            println!("           {}", template.description.dimmed());
        }
    }
}

fn print_template_detail(template: &Template) {
    println!("{} ({})", template.name.bold(), template.id);
    if !template.description.is_empty() {
        println!("{}", template.description);
    }
    if !template.category.is_empty() {
        println!("Category: {}", template.category);
    }
    if !template.document_type.is_empty() {
        println!("Type: {}", template.document_type);
    }
    println!("--------------------------------");
    println!("{}", template.content);
}

fn print_fields(fields: &[FieldSchema]) {
    let mut last_category = "";
    for field in fields {
        if field.category != last_category {
            println!("{}", field.category.bold());
            last_category = &field.category;
        }
        let required = if field.required { " (required)" } else { "" };
        println!(
            "  {:<18} {:<10} {}{}",
            field.name,
            type_label(field.field_type).dimmed(),
            field.description,
            required.yellow()
        );
        if !field.options.is_empty() {
            println!("  {:<18} options: {}", "", field.options.join(", ").dimmed());
        }
    }
}

fn type_label(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text => "text",
        FieldType::TextArea => "textarea",
        FieldType::Email => "email",
        FieldType::Number => "number",
        FieldType::Date => "date",
        FieldType::Dropdown => "dropdown",
    }
}

fn short_id(meta: &Metadata) -> String {
    short_id_raw(&meta.id)
}

fn short_id_raw(id: &uuid::Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: chrono::DateTime<chrono::Utc>) -> String {
    let now = chrono::Utc::now();
    let duration = now.signed_duration_since(timestamp);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
