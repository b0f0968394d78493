use std::{
    error::Error,
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};

use testforge::{
    detectors::{detect_framework, extract, Framework},
    llm::{
        orchestrator::{generate, handle_json, CaseSource},
        HttpTransport, Provider, ProviderConfig, SynthesisRequest,
    },
    testgen::{test_file_path, write_test_file},
};

#[derive(Parser)]
#[command(
    name = "testforge",
    version,
    about = "Generate jest / mocha / vitest unit tests for JavaScript and TypeScript functions."
)]
struct Cli {
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Write a test file for one function in a source file
    Generate(GenerateArgs),
    /// List the functions found in a source file
    List {
        /// Source file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Answer one JSON synthesis request read from stdin
    Handle,
    /// Show the supported AI providers and whether each is configured
    Providers,
}

#[derive(Args)]
struct GenerateArgs {
    /// Source file, or `-` for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Target framework; detected from package.json when omitted
    #[arg(short, long)]
    framework: Option<Framework>,

    /// Function to test; defaults to the first one found
    #[arg(short = 'F', long = "function")]
    function: Option<String>,

    /// Write the test file here instead of stdout; a directory gets `<function>.test.js`
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Skip the AI provider even when a key is configured
    #[arg(long)]
    heuristic_only: bool,
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        CliCommand::Generate(args) => run_generate(args),
        CliCommand::List { input } => run_list(&input),
        CliCommand::Handle => run_handle(),
        CliCommand::Providers => run_providers(),
    }
}

/* ============================================================
   Subcommands
   ============================================================ */

fn run_generate(args: GenerateArgs) -> Result<ExitCode, Box<dyn Error>> {
    let code = read_input(&args.input)?;
    let framework = args
        .framework
        .unwrap_or_else(|| detect_framework(&search_root(&args.input)));

    let request = SynthesisRequest {
        code,
        framework,
        selected_function: args.function,
    };

    let mut config = ProviderConfig::from_env();
    if args.heuristic_only {
        config = config.map(ProviderConfig::without_api_key);
    }

    let generated = match generate(&request, config, &HttpTransport::default()) {
        Ok(g) => g,
        Err(e) if e.is_input_error() => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    let origin = match generated.source {
        CaseSource::Model => "model",
        CaseSource::Heuristic => "heuristic",
    };
    log::info!(
        "{} {} case(s) for `{}` ({framework})",
        generated.cases.len(),
        origin,
        generated.function.name
    );

    match args.out {
        Some(out) => {
            let path = test_file_path(&out, &generated.function.name);
            write_test_file(&path, &generated.test)?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{}", generated.test),
    }

    Ok(ExitCode::SUCCESS)
}

fn run_list(input: &Path) -> Result<ExitCode, Box<dyn Error>> {
    let code = read_input(input)?;
    let functions = extract(&code);

    if functions.is_empty() {
        eprintln!("{}", testforge::Error::NoFunctions);
        return Ok(ExitCode::FAILURE);
    }

    for f in functions {
        let asyncness = if f.is_async { "async " } else { "" };
        println!("{asyncness}{}({})", f.name, f.params.join(", "));
    }

    Ok(ExitCode::SUCCESS)
}

fn run_handle() -> Result<ExitCode, Box<dyn Error>> {
    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;

    let (response, ok) = handle_json(&raw, ProviderConfig::from_env, &HttpTransport::default());
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn run_providers() -> Result<ExitCode, Box<dyn Error>> {
    let active = ProviderConfig::from_env().ok().map(|c| c.provider);

    for provider in Provider::ALL {
        let info = provider.info();
        let key_var = provider.key_var();
        let configured = std::env::var(&key_var).map(|v| !v.trim().is_empty()).unwrap_or(false);
        let marker = if active == Some(provider) { "*" } else { " " };

        println!(
            "{marker} {:<10} {:<18} {}",
            provider.to_string(),
            info.name,
            info.endpoint
        );
        println!(
            "    models: {}  key: {} ({})",
            info.models.join(", "),
            key_var,
            if configured { "set" } else { "unset" }
        );
    }

    Ok(ExitCode::SUCCESS)
}

/* ============================================================
   Helpers
   ============================================================ */

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(path)
}

fn search_root(input: &Path) -> PathBuf {
    let parent = input.parent().filter(|p| !p.as_os_str().is_empty());
    match parent {
        Some(dir) if input.as_os_str() != "-" => dir.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
