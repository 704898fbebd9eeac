mod cmd;

use anyhow::{Context, Result};
use cmd::{Command, CommandLineArgs, Parser};
use htup::endpoint::parse_header;
use htup::{store, Config, EndpointDefinition, HttpClient, Method, RequestResult, ResponseBody};
use std::fs;
use std::io::{stdin, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

const DEFAULT_EDITOR: &str = "vi";

fn main() -> ExitCode {
    let args = CommandLineArgs::parse();
    init_tracing(args.verbose());

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,htup=debug"
    } else {
        "warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &CommandLineArgs) -> Result<ExitCode> {
    let mut config = Config::load(args.config())
        .with_context(|| format!("failed to load configuration from {}", args.config()))?;
    if let Some(dir) = args.dir() {
        config = config.with_project_dir(dir);
    }
    store::ensure_project_directory(&config)?;
    let project_dir = config.project_dir();

    match args.subcommand() {
        Command::Send {
            method,
            url,
            body,
            headers,
            json,
        } => {
            let endpoint = build_endpoint(method, url, body.as_deref(), headers)?;
            let client = HttpClient::new(config.media_dir())?;
            print_result(&client.send_endpoint(&endpoint), *json)
        }
        Command::Run { name, json } => {
            let path = store::resolve(project_dir, name)?;
            let endpoint = EndpointDefinition::load(&path)?;
            let client = HttpClient::new(config.media_dir())?;
            print_result(&client.send_endpoint(&endpoint), *json)
        }
        Command::New { name } => {
            let path = store::create_new_file(project_dir, name)?;
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Save {
            name,
            method,
            url,
            body,
            headers,
        } => {
            let path = store::resolve(project_dir, name)?;
            let definition = build_endpoint(method, url, body.as_deref(), headers)?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            store::save(&path, &definition)?;
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { name } => {
            let path = store::resolve(project_dir, name)?;
            println!("{}", EndpointDefinition::load(&path)?.serialize()?);
            Ok(ExitCode::SUCCESS)
        }
        Command::List => {
            for path in list_endpoints(project_dir, config.media_dir())? {
                let name = path.strip_prefix(project_dir).unwrap_or(path.as_path()).display();
                match EndpointDefinition::load(&path) {
                    Ok(endpoint) => println!("{name}\t{}\t{}", endpoint.method, endpoint.url),
                    Err(e) => println!("{name}\t(invalid: {e})"),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Edit { name } => {
            let path = store::resolve(project_dir, name)?;
            edit(&path)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Project { name } => {
            let path = store::create_project(project_dir, name)?;
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Init => {
            let config_path = shellexpand::tilde(args.config()).to_string();
            if Path::new(&config_path).exists() {
                eprintln!("{config_path} already exists, leaving it untouched");
            } else {
                config.put(args.config())?;
                eprintln!("wrote {config_path}");
            }
            println!("{}", project_dir.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_endpoint(
    method: &str,
    url: &str,
    body: Option<&str>,
    headers: &[String],
) -> Result<EndpointDefinition> {
    let method = method.parse::<Method>()?;
    let mut endpoint = EndpointDefinition::new(method, url, read_body(body)?);
    for line in headers {
        let (name, value) = parse_header(line)?;
        endpoint = endpoint.with_header(name, value);
    }
    Ok(endpoint)
}

fn read_body(body: Option<&str>) -> Result<String> {
    match body {
        Some("-") => {
            let mut buffer = String::new();
            stdin()
                .read_to_string(&mut buffer)
                .context("failed to read body from stdin")?;
            Ok(buffer)
        }
        Some(body) => Ok(body.to_string()),
        None => Ok(String::new()),
    }
}

fn print_result(result: &RequestResult, json: bool) -> Result<ExitCode> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        eprintln!("> status: {}", result.status_code);
        eprintln!("> content-type: {}", result.content_type);
        eprintln!("> time: {:.3}s", result.elapsed_seconds);
        match &result.body {
            ResponseBody::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
            ResponseBody::Text(text) => println!("{text}"),
            ResponseBody::Error(description) => eprintln!("{description}"),
            ResponseBody::Empty => {}
        }
        if let Some(path) = &result.media_path {
            eprintln!("> saved: {}", path.display());
        }
    }

    if result.is_transport_failure() {
        eprintln!("request did not complete");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Every file under `root` except hidden ones and anything inside `media_dir`.
fn list_endpoints(root: &Path, media_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries =
            fs::read_dir(&dir).with_context(|| format!("failed to read {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            let hidden = path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with('.'));
            if hidden || path == media_dir {
                continue;
            }
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn edit(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(htup::Error::NotFound(path.to_path_buf()).into());
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| DEFAULT_EDITOR.to_string());
    let status = std::process::Command::new(&editor)
        .arg(path)
        .status()
        .with_context(|| format!("failed to launch editor: {editor}"))?;
    if !status.success() {
        anyhow::bail!("{editor} exited with {status}");
    }

    EndpointDefinition::load(path)
        .with_context(|| format!("{} is not a valid endpoint after editing", path.display()))?;
    Ok(())
}
