//! ScrapeOps CLI: 请求解析预览、执行、凭证测试与端点目录查询的命令行工具
//!
//! Usage:
//!   scrapeops-cli resolve <spec-file>              Print the resolved request (no network)
//!   scrapeops-cli run <spec-file> [--continue-on-fail]
//!   scrapeops-cli test-key                         Check SCRAPEOPS_API_KEY
//!   scrapeops-cli catalog [domain]                 List domains or a domain's operations
//!   scrapeops-cli validate-catalog <path>          Validate a catalog file

use anyhow::{bail, Context};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use scrapeops_rust::catalog::{self, Catalog, CatalogLoader};
use scrapeops_rust::dispatch::{BaseUrls, Dispatcher, Fields, RequestSpec};
use scrapeops_rust::items::{ItemExecutor, WorkItem};
use scrapeops_rust::ScrapeOpsClient;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "resolve" => cmd_resolve(&args[2..]).await,
        "run" => cmd_run(&args[2..]).await,
        "test-key" => cmd_test_key().await,
        "catalog" => cmd_catalog(&args[2..]).await,
        "validate-catalog" => cmd_validate_catalog(&args[2..]).await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"scrapeops-cli - ScrapeOps 命令行工具

USAGE:
    scrapeops-cli <COMMAND> [OPTIONS]

COMMANDS:
    resolve <spec-file>                   Print the resolved request without sending it
    run <spec-file> [--continue-on-fail]  Execute one spec or a list of parameter maps
    test-key                              Verify the API key against the proxy
    catalog [domain]                      List domains, or the operations of one domain
    validate-catalog <path>               Validate a catalog file
    version                               Show version information
    help                                  Show this help message

SPEC FILES (JSON or YAML):
    {{"apiFamily": "dataApi", "domain": "amazon", "operation": "product", ...}}
    {{"apiType": "dataApi", "dataDomain": "amazon", "amazonApiType": "product", ...}}
    [{{"apiType": "proxyApi", "url": "https://example.com"}}, ...]      (run only)

ENVIRONMENT:
    SCRAPEOPS_API_KEY             API key for run / test-key
    SCRAPEOPS_CATALOG_PATH        Alternative catalog file
    SCRAPEOPS_HTTP_TIMEOUT_SECS   HTTP timeout (default 120)
    SCRAPEOPS_HTTP_PROXY          Outbound proxy
    RUST_LOG                      Log filter, e.g. scrapeops_rust=debug"#
    );
}

fn cmd_version() {
    println!("scrapeops-cli {}", env!("CARGO_PKG_VERSION"));
}

async fn load_catalog() -> anyhow::Result<Arc<Catalog>> {
    match std::env::var("SCRAPEOPS_CATALOG_PATH") {
        Ok(path) if !path.trim().is_empty() => Ok(Arc::new(
            CatalogLoader::new().load_from_file(&path).await?,
        )),
        _ => Ok(catalog::builtin()?),
    }
}

async fn client() -> anyhow::Result<ScrapeOpsClient> {
    let client = ScrapeOpsClient::builder()
        .catalog(load_catalog().await?)
        .build()
        .await?;
    Ok(client)
}

async fn read_document(path: &str) -> anyhow::Result<Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {path}"))?;
    let is_json = Path::new(path)
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let doc = if is_json {
        serde_json::from_str(&text)?
    } else {
        serde_yaml::from_str(&text)?
    };
    Ok(doc)
}

/// A spec document is either a serialized `RequestSpec` or a flat host parameter map.
fn spec_from_document(doc: Value) -> anyhow::Result<RequestSpec> {
    match doc {
        Value::Object(map) if map.contains_key("apiFamily") => {
            Ok(serde_json::from_value(Value::Object(map))?)
        }
        Value::Object(map) => {
            let fields: Fields = map.into_iter().collect();
            Ok(RequestSpec::from_parameters(fields, None)?)
        }
        _ => bail!("spec document must be an object"),
    }
}

async fn cmd_resolve(args: &[String]) -> anyhow::Result<()> {
    let Some(path) = args.first() else {
        bail!("usage: scrapeops-cli resolve <spec-file>");
    };
    let spec = spec_from_document(read_document(path).await?)?;
    let dispatcher = Dispatcher::new(load_catalog().await?, BaseUrls::default());
    let target = dispatcher.resolve(&spec)?;
    println!("{}", serde_json::to_string_pretty(&target)?);
    println!("{} {}", target.method, target.url()?);
    Ok(())
}

async fn cmd_run(args: &[String]) -> anyhow::Result<()> {
    let Some(path) = args.first() else {
        bail!("usage: scrapeops-cli run <spec-file> [--continue-on-fail]");
    };
    let continue_on_fail = args.iter().any(|a| a == "--continue-on-fail");
    let doc = read_document(path).await?;
    let client = client().await?;

    match doc {
        Value::Array(entries) => {
            let items = entries
                .into_iter()
                .map(|entry| match entry {
                    Value::Object(map) if map.contains_key("parameters") => {
                        serde_json::from_value::<WorkItem>(Value::Object(map))
                    }
                    Value::Object(map) => Ok(WorkItem {
                        parameters: map.into_iter().collect(),
                        json: Value::Null,
                    }),
                    other => serde_json::from_value::<WorkItem>(other),
                })
                .collect::<Result<Vec<_>, _>>()?;
            let outputs = ItemExecutor::new(&client)
                .continue_on_fail(continue_on_fail)
                .run(&items)
                .await?;
            println!("{}", serde_json::to_string_pretty(&outputs)?);
        }
        doc => {
            let spec = spec_from_document(doc)?;
            let response = client.execute(&spec).await?;
            match response {
                Value::String(text) => println!("{text}"),
                other => println!("{}", serde_json::to_string_pretty(&other)?),
            }
        }
    }
    Ok(())
}

async fn cmd_test_key() -> anyhow::Result<()> {
    let client = client().await?;
    client.test_credentials().await?;
    println!("API key accepted");
    Ok(())
}

async fn cmd_catalog(args: &[String]) -> anyhow::Result<()> {
    let catalog = load_catalog().await?;
    match args.first() {
        None => {
            println!("catalog version {}", catalog.version);
            for domain in &catalog.domains {
                let parser = if domain.parser_path.is_some() { "parser" } else { "-" };
                println!(
                    "  {:<8} {:<8} {:>2} operations  tlds: {}",
                    domain.id,
                    parser,
                    domain.operations.len(),
                    if domain.tlds.is_empty() {
                        "-".to_string()
                    } else {
                        domain.tlds.join(",")
                    }
                );
            }
        }
        Some(id) => {
            let Some(domain) = catalog.domain(id) else {
                bail!("unknown domain {id}; expected one of {}", catalog.domain_ids().join(", "));
            };
            println!("{} ({})", domain.label, domain.id);
            for op in &domain.operations {
                println!("  {:<16} {}", op.id, op.path);
                for mode in &op.modes {
                    let marker = if mode.id == op.default_mode { "*" } else { " " };
                    let binding = match &mode.url_field {
                        Some(field) => format!("url <- {field}"),
                        None => mode
                            .params
                            .iter()
                            .map(|p| {
                                let opt = if p.optional { "?" } else { "" };
                                format!("{}{opt} <- {}", p.key, p.field)
                            })
                            .collect::<Vec<_>>()
                            .join(", "),
                    };
                    println!("    {marker}{:<12} {binding}", mode.id);
                }
            }
        }
    }
    Ok(())
}

async fn cmd_validate_catalog(args: &[String]) -> anyhow::Result<()> {
    let Some(path) = args.first() else {
        bail!("usage: scrapeops-cli validate-catalog <path>");
    };
    let catalog = CatalogLoader::new().load_from_file(path).await?;
    let operations: usize = catalog.domains.iter().map(|d| d.operations.len()).sum();
    println!(
        "✓ {path}: {} domains, {operations} operations",
        catalog.domains.len()
    );
    Ok(())
}
