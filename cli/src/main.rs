//! popkit CLI — explain transaction failures and encode governance setters.
//!
//! # Commands
//! ```text
//! popkit parse-error --error <json|@file> [--abi <file>] [--patterns <file>] [--selectors <file>]
//! popkit templates   [--category <id>]
//! popkit encode      --template <id> --values <json|@file> [--roles <json>] [--projects <json>] [--calldata]
//! popkit functions   [--contract <key>]
//! ```
//!
//! Every command accepts `--json` for machine-readable output. Logging goes to
//! stderr: `--log-level`, `--log-json`, and repeatable `--log-component crate=level`.

use std::collections::HashMap;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use popkit_errors::{AbiDecoder, ErrorParser, JsonAbiDecoder, RevertPatternTable, SelectorTable};
use popkit_setters::{
    CategoryId, ContractKey, PreviewLookup, RawFunctionCatalog, SetterError, SetterRegistry,
};

mod logging;

use logging::{init_tracing, LogConfig};

#[derive(Parser)]
#[command(
    name = "popkit",
    about = "Explain wallet/RPC transaction failures and encode governance setter calls",
    version
)]
struct Cli {
    /// Log level: trace | debug | info | warn | error
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Per-crate level override, repeatable: popkit-errors=debug
    #[arg(long = "log-component", global = true, value_name = "CRATE=LEVEL")]
    log_components: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn a raw transaction error into a category and a user message
    #[command(name = "parse-error")]
    ParseError {
        /// The error as JSON (or a plain string), or @path to a file
        #[arg(long)]
        error: String,
        /// Contract ABI JSON file used to decode custom errors
        #[arg(long)]
        abi: Option<String>,
        /// Extra revert patterns, `[{"pattern": "...", "message": "..."}]`
        #[arg(long)]
        patterns: Option<String>,
        /// Extra selectors, `{"0x12345678": "Name"}`
        #[arg(long)]
        selectors: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List setter categories and templates
    Templates {
        /// Only this category: voting | permissions | emergency | tasks
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate form values and encode a setter template
    Encode {
        /// Template id, e.g. change-quorum-hybrid
        #[arg(long)]
        template: String,
        /// Form values as a JSON object, or @path to a file
        #[arg(long, default_value = "{}")]
        values: String,
        /// Role display names, `{"<id>": "<name>"}`
        #[arg(long)]
        roles: Option<String>,
        /// Project display names, `{"<id>": "<name>"}`
        #[arg(long)]
        projects: Option<String>,
        /// Also print full calldata from the raw function catalog
        #[arg(long)]
        calldata: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List raw contract functions (advanced view)
    Functions {
        /// Only this contract: hybridVoting | directDemocracyVoting | taskManager
        #[arg(long)]
        contract: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig {
        level: cli.log_level.clone(),
        json: cli.log_json,
        ..LogConfig::default()
    };
    for directive in &cli.log_components {
        log_config = log_config.with_component(directive)?;
    }
    init_tracing(&log_config);

    match cli.command {
        Commands::ParseError { error, abi, patterns, selectors, json } => cmd_parse_error(
            &error,
            abi.as_deref(),
            patterns.as_deref(),
            selectors.as_deref(),
            json,
        ),
        Commands::Templates { category, json } => cmd_templates(category.as_deref(), json),
        Commands::Encode { template, values, roles, projects, calldata, json } => cmd_encode(
            &template,
            &values,
            roles.as_deref(),
            projects.as_deref(),
            calldata,
            json,
        ),
        Commands::Functions { contract, json } => cmd_functions(contract.as_deref(), json),
    }
}

// ─── Input helpers ───────────────────────────────────────────────────────────

/// Inline text, or the contents of the file named after a leading `@`.
fn read_arg(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("read file '{path}'")),
        None => Ok(arg.to_string()),
    }
}

fn read_file(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read file '{path}'"))
}

fn parse_name_map(arg: Option<&str>, what: &str) -> Result<HashMap<String, String>> {
    match arg {
        Some(s) => serde_json::from_str(&read_arg(s)?).with_context(|| format!("parse {what} JSON")),
        None => Ok(HashMap::new()),
    }
}

// ─── Command implementations ─────────────────────────────────────────────────

fn cmd_parse_error(
    error_arg: &str,
    abi_path: Option<&str>,
    patterns_path: Option<&str>,
    selectors_path: Option<&str>,
    as_json: bool,
) -> Result<()> {
    let raw = read_arg(error_arg)?;
    // Anything that is not JSON is taken as a bare message.
    let error: Value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));

    let mut patterns = RevertPatternTable::with_defaults();
    if let Some(path) = patterns_path {
        let n = patterns.load_json(&read_file(path)?).context("load revert patterns")?;
        tracing::debug!(count = n, path, "loaded revert patterns");
    }
    let mut selectors = SelectorTable::with_defaults();
    if let Some(path) = selectors_path {
        let n = selectors.load_json(&read_file(path)?).context("load selectors")?;
        tracing::debug!(count = n, path, "loaded selectors");
    }
    let parser = ErrorParser::with_tables(patterns, selectors);

    let decoder = abi_path
        .map(|path| -> Result<JsonAbiDecoder> {
            Ok(JsonAbiDecoder::from_abi_json(&read_file(path)?)?)
        })
        .transpose()?;

    let parsed = match (&decoder, &error) {
        (Some(d), Value::Object(_)) => parser.parse(&error, Some(d as &dyn AbiDecoder)),
        _ => parser.from_any(&error),
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    } else {
        println!("Category:     {}", parsed.category);
        println!("Message:      {}", parsed.user_message);
        println!("Technical:    {}", parsed.technical_message);
        if let Some(decoded) = &parsed.decoded {
            println!("Decoded:      {decoded}");
        }
        println!("Recoverable:  {}", parsed.is_recoverable());
    }
    Ok(())
}

fn cmd_templates(category: Option<&str>, as_json: bool) -> Result<()> {
    let registry = SetterRegistry::new();
    let category = category
        .map(|c| CategoryId::parse(c).ok_or_else(|| anyhow!("unknown category '{c}'")))
        .transpose()?;

    let categories: Vec<_> = registry
        .categories()
        .iter()
        .filter(|c| category.map_or(true, |id| c.id == id))
        .collect();

    if as_json {
        let out = json!({
            "categories": categories,
            "templates": registry.templates(category),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for info in categories {
        println!("{}: {}", info.name, info.description);
        for t in registry.templates(Some(info.id)) {
            let danger = if t.danger_level.is_some() { "  [critical]" } else { "" };
            println!("  {:<30} {}{danger}", t.id, t.name);
            for input in &t.inputs {
                println!("      {:<12} {}", input.name, input.label);
            }
        }
        println!();
    }
    Ok(())
}

fn cmd_encode(
    template_id: &str,
    values_arg: &str,
    roles: Option<&str>,
    projects: Option<&str>,
    with_calldata: bool,
    as_json: bool,
) -> Result<()> {
    let registry = SetterRegistry::new();
    let template = registry
        .template(template_id)
        .ok_or_else(|| anyhow!("unknown template '{template_id}' (see `popkit templates`)"))?;

    let values: Value = serde_json::from_str(&read_arg(values_arg)?).context("parse values JSON")?;
    let lookup = PreviewLookup {
        role_names: parse_name_map(roles, "roles")?,
        project_names: parse_name_map(projects, "projects")?,
    };

    let call = match registry.encode(template, &values) {
        Ok(call) => call,
        Err(SetterError::Validation(issues)) => {
            if as_json {
                println!("{}", serde_json::to_string_pretty(&json!({ "issues": issues }))?);
            } else {
                eprintln!("Invalid values for {template_id}:");
                for issue in &issues {
                    eprintln!("  {issue}");
                }
            }
            bail!("validation failed for template '{template_id}'");
        }
        Err(e) => return Err(e.into()),
    };
    let preview = registry.preview(template, &values, &lookup);
    let calldata = if with_calldata {
        let bytes = RawFunctionCatalog::with_defaults()
            .encode_calldata(&call)
            .context("build calldata")?;
        Some(format!("0x{}", hex::encode(bytes)))
    } else {
        None
    };

    if as_json {
        let out = json!({
            "call": call,
            "preview": preview,
            "calldata": calldata,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Preview:   {preview}");
        println!("Contract:  {}", call.contract);
        println!("Function:  {}", call.function_name);
        println!("Args:");
        for (i, arg) in call.args.iter().enumerate() {
            println!("  [{i}] {arg}");
        }
        if let Some(warning) = &call.warning {
            println!("Warning:   {warning}");
        }
        if let Some(data) = calldata {
            println!("Calldata:  {data}");
        }
    }
    Ok(())
}

fn cmd_functions(contract: Option<&str>, as_json: bool) -> Result<()> {
    let catalog = RawFunctionCatalog::with_defaults();
    let contracts: Vec<ContractKey> = match contract {
        Some(c) => vec![ContractKey::parse(c).ok_or_else(|| anyhow!("unknown contract '{c}'"))?],
        None => ContractKey::ALL.to_vec(),
    };

    if as_json {
        let functions: Vec<_> = contracts.iter().flat_map(|c| catalog.for_contract(*c)).collect();
        println!("{}", serde_json::to_string_pretty(&functions)?);
        return Ok(());
    }

    for key in contracts {
        println!("{key}");
        for f in catalog.for_contract(key) {
            println!("  {:<60} 0x{}", f.signature, hex::encode(f.selector()));
            println!("      {}", f.description);
        }
        println!();
    }
    Ok(())
}
