//! signet CLI
//!
//! Resolves which signing config an Android release build will use, from the
//! project's key.properties.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use signet_android::template::write_key_properties_template;
use signet_android::{
    CredentialSet, ResolveOptions, Selection, SigningConfig, SigningConfigs, SigningResolver,
    TracingSink,
};
use signet_cli::output::{format_optional, format_secret, Status};
use signet_core::config::{Config, LogFormat};
use signet_core::error::{exit_codes, Error};
use signet_telemetry::TelemetryConfig;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "signet")]
#[command(about = "Resolve Android release signing from key.properties")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Gradle root project directory (overrides the config file)
    #[arg(long, global = true, env = "SIGNET_PROJECT_ROOT")]
    project_root: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Write logs as JSON lines (overrides the config file)
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which credentials key.properties provides (passwords masked)
    Inspect {
        /// key.properties path
        #[arg(long)]
        properties: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve the signing config for the release variant
    Resolve {
        /// key.properties path
        #[arg(long)]
        properties: Option<PathBuf>,
        /// Build variant to apply the signing config to
        #[arg(long)]
        variant: Option<String>,
        /// Fail instead of falling back to debug signing
        #[arg(long)]
        require_release: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a key.properties template
    Init {
        /// key.properties path
        #[arg(long)]
        properties: Option<PathBuf>,
        /// Keystore path written into the template
        #[arg(long, default_value = "upload-keystore.jks")]
        store_file: String,
        /// Key alias written into the template
        #[arg(long, default_value = "upload")]
        key_alias: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            Status::error(&e.to_string());
            std::process::exit(e.exit_code());
        }
    };

    signet_telemetry::init_with_config(TelemetryConfig::for_cli(
        &config.schema.logging.level,
        cli.verbose,
        cli.quiet,
        cli.log_json || config.schema.logging.format == LogFormat::Json,
    ))?;

    let project_root = cli.project_root.as_deref();

    let exit_code = match cli.command {
        Commands::Inspect { properties, json } => {
            run_inspect(&resolver(&config, project_root, properties), json, cli.quiet)
        }
        Commands::Resolve {
            properties,
            variant,
            require_release,
            json,
        } => {
            let mut resolver = resolver(&config, project_root, properties);
            if let Some(variant) = variant {
                resolver = resolver.with_variant(variant);
            }
            run_resolve(resolver, &config, require_release, json, cli.quiet)
        }
        Commands::Init {
            properties,
            store_file,
            key_alias,
            force,
        } => {
            let resolver = resolver(&config, project_root, properties);
            run_init(resolver.properties_path(), &store_file, &key_alias, force)
        }
    };

    std::process::exit(exit_code);
}

/// Build the resolver from config, letting CLI flags override paths
fn resolver(
    config: &Config,
    project_root: Option<&Path>,
    properties: Option<PathBuf>,
) -> SigningResolver {
    let mut resolver = match project_root {
        Some(root) => SigningResolver::new(root)
            .with_properties(config.properties_path_in(root))
            .with_options(ResolveOptions::from(&config.schema.signing)),
        None => SigningResolver::from_config(config),
    };
    if let Some(path) = properties {
        resolver = resolver.with_properties(path);
    }
    resolver
}

/// Report an error the way the output mode expects and return its exit code
fn fail(err: Error, json: bool) -> i32 {
    if json {
        match serde_json::to_string_pretty(&err.to_report()) {
            Ok(report) => println!("{report}"),
            Err(_) => Status::error(&err.to_string()),
        }
    } else {
        Status::error(&err.to_string());
    }
    err.exit_code()
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => {
            println!("{rendered}");
            exit_codes::SUCCESS
        }
        Err(e) => fail(e.into(), false),
    }
}

#[derive(Serialize)]
struct InspectReport<'a> {
    properties: &'a Path,
    found: bool,
    entries: usize,
    store_file: Option<&'a str>,
    key_alias: Option<&'a str>,
    store_password_len: Option<usize>,
    key_password_len: Option<usize>,
    complete: bool,
    missing: Vec<&'static str>,
}

impl<'a> InspectReport<'a> {
    fn new(properties: &'a Path, credentials: &'a CredentialSet) -> Self {
        Self {
            properties,
            found: credentials.source().is_some(),
            entries: credentials.entries(),
            store_file: credentials.store_file(),
            key_alias: credentials.key_alias(),
            store_password_len: credentials.store_password_len(),
            key_password_len: credentials.key_password_len(),
            complete: credentials.is_complete(),
            missing: credentials.missing_fields(),
        }
    }
}

fn run_inspect(resolver: &SigningResolver, json: bool, quiet: bool) -> i32 {
    let credentials = match resolver.load(&mut TracingSink) {
        Ok(credentials) => credentials,
        Err(e) => return fail(e.into(), json),
    };
    let report = InspectReport::new(resolver.properties_path(), &credentials);

    if json {
        return print_json(&report);
    }
    if quiet {
        return exit_codes::SUCCESS;
    }

    Status::header("key.properties");
    Status::field("path", &report.properties.display().to_string());
    if !report.found {
        Status::warning("key.properties not found; release builds will be debug-signed");
        return exit_codes::SUCCESS;
    }
    Status::field("entries", &report.entries.to_string());
    Status::field("storeFile", &format_optional(report.store_file));
    Status::field("storePassword", &format_secret(report.store_password_len));
    Status::field("keyAlias", &format_optional(report.key_alias));
    Status::field("keyPassword", &format_secret(report.key_password_len));

    if report.complete {
        Status::success("All release signing fields are set");
    } else {
        Status::warning(&format!("Missing: {}", report.missing.join(", ")));
    }

    exit_codes::SUCCESS
}

fn run_resolve(
    resolver: SigningResolver,
    config: &Config,
    require_release: bool,
    json: bool,
    quiet: bool,
) -> i32 {
    let debug = SigningConfig::android_debug(config.debug_keystore())
        .named(resolver.options().debug_config.clone());
    let mut context = SigningConfigs::with_debug(debug);
    let release_config = resolver.options().release_config.clone();

    let resolution = match resolver.resolve(&mut context, &mut TracingSink) {
        Ok(resolution) => resolution,
        Err(e) => return fail(e.into(), json),
    };

    if require_release && resolution.selection == Selection::Debug {
        let reason = if resolution.missing.is_empty() {
            format!("the '{release_config}' signingConfig is unusable")
        } else {
            format!(
                "key.properties is incomplete (missing {})",
                resolution.missing.join(", ")
            )
        };
        return fail(Error::release_signing_required(reason), json);
    }

    if json {
        return print_json(&resolution);
    }

    if !quiet {
        Status::header(&format!("Signing for variant '{}'", resolution.variant));
        Status::field("signingConfig", &resolution.config_name);
        Status::field(
            "storeFile",
            &resolution
                .store_file
                .as_deref()
                .map_or_else(|| "(not set)".to_string(), |p| p.display().to_string()),
        );
        Status::field("keyAlias", &format_optional(resolution.key_alias.as_deref()));
    }

    match resolution.selection {
        Selection::Release => {
            if !quiet {
                Status::success("Release signing applied");
            }
        }
        Selection::Debug => {
            Status::warning("Release builds will be signed with the debug config");
        }
    }

    exit_codes::SUCCESS
}

fn run_init(path: &Path, store_file: &str, key_alias: &str, force: bool) -> i32 {
    match write_key_properties_template(path, store_file, key_alias, force) {
        Ok(()) => {
            Status::success(&format!("Wrote {}", path.display()));
            Status::info("Fill in storePassword and keyPassword, and keep the file out of version control");
            exit_codes::SUCCESS
        }
        Err(e) => fail(e.into(), false),
    }
}
