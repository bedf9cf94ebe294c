mod encoder;
mod indexer;
mod loader;
mod openapi;
mod postman;
mod stubs;
mod versions;

use anyhow::Context;
use encoder::Format;
use indexer::Indexer;
use loader::Source;
use std::{fs, path::PathBuf};
use structopt::StructOpt;
use stubs::StubCreator;
use tg_scraper::Schema;
use versions::Layer;

#[derive(StructOpt)]
#[structopt(name = "tg-scraper", about = "Telegram Bot API schema extractor")]
enum Command {
    /// Export schema as JSON or YAML
    ExportSchema(ExportSchema),
    /// Create Rust stubs from a Bot API schema
    CreateStubs(CreateStubs),
    /// Export schemas and stubs of every archived Bot API version to a directory
    DumpSchemas(DumpSchemas),
}

#[derive(StructOpt)]
struct ExportSchema {
    /// Destination file
    #[structopt(parse(from_os_str))]
    destination: PathBuf,
    /// Export schema as YAML instead of JSON (does not affect `--postman`)
    #[structopt(long)]
    yaml: bool,
    /// Export schema as a Postman-compatible JSON
    #[structopt(long)]
    postman: bool,
    /// Export schema as an OpenAPI-compatible file (takes precedence over `--postman`)
    #[structopt(long)]
    openapi: bool,
    /// Generate a human-readable file
    #[structopt(short, long)]
    readable: bool,
    #[structopt(flatten)]
    layer: LayerArgs,
    /// Read a saved documentation page instead of fetching it
    #[structopt(long, parse(from_os_str))]
    html: Option<PathBuf>,
    /// Fail when the extracted schema has dangling references or methods without return types
    #[structopt(long)]
    strict: bool,
}

#[derive(StructOpt)]
struct CreateStubs {
    /// Destination directory
    #[structopt(parse(from_os_str))]
    destination: PathBuf,
    /// Module path of the generated stubs
    #[structopt(long, default_value = "telegram_api")]
    namespace: String,
    /// Saved JSON schema to use instead of fetching (takes precedence over `--layer`)
    #[structopt(long, parse(from_os_str))]
    json: Option<PathBuf>,
    /// Saved YAML schema to use instead of fetching (takes precedence over `--layer` and `--json`)
    #[structopt(long, parse(from_os_str))]
    yaml: Option<PathBuf>,
    #[structopt(flatten)]
    layer: LayerArgs,
}

#[derive(StructOpt)]
struct DumpSchemas {
    /// Destination directory
    #[structopt(parse(from_os_str))]
    destination: PathBuf,
    /// Module path of the generated stubs
    #[structopt(long, default_value = "telegram_api")]
    namespace: String,
    /// Generate human-readable files
    #[structopt(short, long)]
    readable: bool,
}

#[derive(StructOpt)]
struct LayerArgs {
    /// Bot API version to use
    #[structopt(short, long, default_value = "latest")]
    layer: Layer,
    /// Prefer latest stable version (takes precedence over `--layer`)
    #[structopt(long)]
    prefer_stable: bool,
}

impl LayerArgs {
    fn resolve(&self) -> Layer {
        let layer = if self.prefer_stable {
            Layer::stable()
        } else {
            self.layer.clone()
        };
        log::info!("Using version: {}", layer);
        layer
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    match Command::from_args() {
        Command::ExportSchema(args) => export_schema(args),
        Command::CreateStubs(args) => create_stubs(args),
        Command::DumpSchemas(args) => dump_schemas(args),
    }
}

fn export_schema(args: ExportSchema) -> anyhow::Result<()> {
    let destination = &args.destination;
    let layer = args.layer.resolve();
    let source = match &args.html {
        Some(path) => Source::Html(path),
        None => Source::Layer(&layer),
    };
    let schema = loader::load(source, args.strict)?;

    let format = if args.yaml {
        Format::Yaml
    } else {
        Format::json(args.readable)
    };
    let content = if args.openapi {
        format.encode(&openapi::generate(&schema)?)?
    } else if args.postman {
        Format::json(args.readable).encode(&postman::generate(&schema))?
    } else {
        format.encode(&schema)?
    };

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    log::info!("Saving schema to {}", destination.display());
    fs::write(destination, content)
        .with_context(|| format!("Unable to save file to {}", destination.display()))?;

    Ok(())
}

fn create_stubs(args: CreateStubs) -> anyhow::Result<()> {
    let layer = args.layer.resolve();
    let source = match (&args.yaml, &args.json) {
        (Some(path), _) => Source::Yaml(path),
        (None, Some(path)) => Source::Json(path),
        (None, None) => Source::Layer(&layer),
    };
    let schema = loader::load(source, false)?;

    let mut indexer = Indexer::new(&args.destination);
    add_stubs(&mut indexer, &schema, &args.namespace, None)?;
    log::info!("Saving stubs to {}", args.destination.display());
    indexer.gen()?;

    Ok(())
}

fn dump_schemas(args: DumpSchemas) -> anyhow::Result<()> {
    let mut indexer = Indexer::new(&args.destination);

    for layer in Layer::archived() {
        let stem = layer.file_stem();

        let mut schema = loader::load(Source::Layer(&layer), false)?;
        // archived pages often lack the version marker
        if let Some(version) = layer.version() {
            schema.version = version.clone();
        }

        log::info!("{}: Saving schemas", layer);
        indexer.add(
            &schema,
            vec![
                (Format::json(args.readable), format!("custom/json/{}.json", stem)),
                (Format::Yaml, format!("custom/yaml/{}.yaml", stem)),
            ],
        )?;
        indexer.add(
            &postman::generate(&schema),
            vec![(Format::json(args.readable), format!("postman/{}.json", stem))],
        )?;
        let api = openapi::generate(&schema)
            .with_context(|| format!("Failed to generate {} OpenAPI schema", layer))?;
        indexer.add(
            &api,
            vec![
                (Format::json(args.readable), format!("openapi/json/{}.json", stem)),
                (Format::Yaml, format!("openapi/yaml/{}.yaml", stem)),
            ],
        )?;

        log::info!("{}: Creating stubs", layer);
        add_stubs(&mut indexer, &schema, &args.namespace, Some(stem.as_str()))?;
    }

    indexer.add(
        &schemars::schema_for!(Schema),
        vec![(Format::json(args.readable), "custom/schema.json".to_string())],
    )?;

    log::info!("Saving everything to {}", args.destination.display());
    indexer.gen()?;

    Ok(())
}

fn add_stubs(
    indexer: &mut Indexer,
    schema: &Schema,
    namespace: &str,
    prefix: Option<&str>,
) -> anyhow::Result<()> {
    let creator = StubCreator::new(schema, namespace)?;
    for (path, content) in creator.generate()? {
        let path = match prefix {
            Some(prefix) => format!("stubs/{}/{}", prefix, path),
            None => path,
        };
        indexer.add_raw(path, content);
    }

    Ok(())
}
