//! Address Finder - Singapore postal code lookup in the terminal
//!
//! Looks up a postal code through OneMap and fills in the block/street and
//! building fields of an address form. Without a postal code argument it runs
//! an interactive form on stdin.

use address_finder::{
    AddressForm, AddressResolver, Alert, Config, LookupController, LookupState, OneMapResolver,
    Result,
};
use clap::Parser;
use onemap_client::OneMapClient;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

const RESET_COMMAND: &str = ":reset";
const QUIT_COMMAND: &str = ":quit";

#[derive(Debug, Parser)]
#[command(
    name = "address-finder",
    about = "Look up a Singapore postal code and pre-fill the address form"
)]
struct Args {
    /// Postal code to look up; starts the interactive form when omitted
    postal_code: Option<String>,

    /// Print the resolved address record as JSON
    #[arg(long)]
    json: bool,

    /// OneMap search endpoint (overrides ONEMAP_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides ONEMAP_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(base_url) = args.base_url.clone() {
        config.onemap_base_url = base_url;
    }
    if let Some(secs) = args.timeout_secs.filter(|secs| *secs > 0) {
        config.request_timeout = Duration::from_secs(secs);
    }

    init_logging(config.json_logs)?;
    debug!(
        base_url = %config.onemap_base_url,
        timeout_secs = config.request_timeout.as_secs(),
        "Loaded configuration"
    );

    let client = OneMapClient::with_config(&config.onemap_base_url, config.request_timeout)?;
    let controller = LookupController::new(OneMapResolver::new(client));

    match args.postal_code {
        Some(postal_code) => run_once(&controller, &postal_code, args.json).await,
        None => run_interactive(&controller).await,
    }
}

fn init_logging(json: bool) -> Result<()> {
    let env_filter = EnvFilter::from_default_env().add_directive("address_finder=info".parse()?);

    // Logs go to stderr so stdout carries only the form
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

async fn run_once<R>(
    controller: &LookupController<R>,
    postal_code: &str,
    json: bool,
) -> Result<ExitCode>
where
    R: AddressResolver + 'static,
{
    let mut form = AddressForm::new(controller.subscribe());
    form.set_postal_code(postal_code);

    let code = match form.submit() {
        Ok(code) => code,
        Err(err) => {
            show_alert(&Alert::from(&err));
            return Ok(ExitCode::from(2));
        }
    };

    controller.trigger(&code).await;
    if let Some(alert) = form.sync() {
        show_alert(&alert);
        return Ok(ExitCode::FAILURE);
    }

    match form.state() {
        LookupState::Resolved(record) if json => {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        _ => print!("{}", render(&form)),
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_interactive<R>(controller: &LookupController<R>) -> Result<ExitCode>
where
    R: AddressResolver + 'static,
{
    info!("Starting interactive address form");
    println!("Singapore Address Finder");
    println!("Enter a postal code, {RESET_COMMAND} to start over, {QUIT_COMMAND} to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut form = AddressForm::new(controller.subscribe());

    loop {
        let Some(line) = prompt(&mut lines, "Postal Code (e.g. 320078): ").await? else {
            break;
        };

        match line.trim() {
            QUIT_COMMAND => break,
            RESET_COMMAND => {
                controller.reset();
                form = AddressForm::new(controller.subscribe());
                println!("Form cleared.");
                continue;
            }
            _ => {}
        }

        form.set_postal_code(&line);
        if form.postal_code().is_empty() {
            continue;
        }
        if let Some(hint) = form.postal_code_hint() {
            println!("  {hint}");
            continue;
        }
        let code = match form.submit() {
            Ok(code) => code,
            Err(err) => {
                show_alert(&Alert::from(&err));
                continue;
            }
        };

        println!("Finding address...");
        controller.trigger(&code).await;
        if let Some(alert) = form.sync() {
            show_alert(&alert);
            continue;
        }
        if form.state().address().is_none() {
            continue;
        }

        print!("{}", render(&form));
        if let Some(unit) = prompt(&mut lines, "Unit Number (if applicable): ").await? {
            form.set_unit_number(unit.trim());
        }
        print!("{}", render(&form));
    }

    Ok(ExitCode::SUCCESS)
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

fn show_alert(alert: &Alert) {
    eprintln!("[{}] {}", alert.title, alert.message);
}

fn render(form: &AddressForm) -> String {
    let fields = form.fields();
    format!(
        "\n  Postal Code:        {}\n  Block/Street Name:  {}\n  Building Name:      {}\n  Unit Number:        {}\n\n",
        fields.postal_code, fields.block_street, fields.building_name, fields.unit_number
    )
}
