use std::error::Error;
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;

use futures::future::join_all;

use booking_forms::output_record::OutputRecord;
use booking_forms::{Dispatcher, HttpTransport, Page};

use log::{info, warn};

/// Submit the forms of rendered booking pages to the backend.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// HTML pages to load
    #[arg(required = true)]
    pages: Vec<PathBuf>,

    /// Backend the requests are sent to
    #[arg(long, env = "BOOKING_BASE_URL", default_value = "http://127.0.0.1:5000/")]
    base_url: String,

    /// Enter a field value, as `id=value`
    #[arg(long = "set", value_parser = parse_key_value)]
    values: Vec<(String, String)>,

    /// Select options of a select control, as `id=first,second`
    #[arg(long = "select", value_parser = parse_key_value)]
    selections: Vec<(String, String)>,

    /// Only submit the form or button with this element id
    #[arg(long)]
    form: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize the logger
    pretty_env_logger::formatted_builder()
        .filter(None, log::LevelFilter::Info)
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_default())
        .init();

    let args = Args::parse();

    let dispatcher = Dispatcher::new(HttpTransport::new(&args.base_url)?);

    // Report rows go to stdout as CSV
    let writer = csv::Writer::from_writer(std::io::stdout());
    let writer = Arc::new(Mutex::new(writer));

    let mut submissions = Vec::new();
    for path in &args.pages {
        let document = std::fs::read_to_string(path)?;
        let name = path.display().to_string();
        submissions.push(submit_page(&dispatcher, name, document, &args, writer.clone()));
    }

    // Pages are submitted concurrently, in no particular order
    for result in join_all(submissions).await {
        result?;
    }

    // Flush CSV buffer
    writer.lock().map_err(|err| err.to_string())?.flush()?;
    Ok(())
}

async fn submit_page(
    dispatcher: &Dispatcher<HttpTransport>,
    name: String,
    document: String,
    args: &Args,
    writer: Arc<Mutex<csv::Writer<Stdout>>>,
) -> Result<(), String> {
    let mut page = Page::parse(&document);
    for (id, value) in &args.values {
        page.set_value(id.as_str(), value.as_str());
    }
    for (id, options) in &args.selections {
        page.select(id.as_str(), options.split(',').map(str::trim));
    }

    info!("Looking at page {}", name);
    let attempts = dispatcher.submit_all(&mut page, args.form.as_deref()).await;
    if attempts.is_empty() {
        warn!("{} has no form to submit", name);
    }

    let mut writer = writer.lock().map_err(|err| err.to_string())?;
    for attempt in &attempts {
        writer
            .serialize(OutputRecord::from_attempt(&name, attempt))
            .map_err(|err| err.to_string())?;
    }
    Ok(())
}

/// Split a command line `key=value` pair
fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected id=value, got {arg}"))
}
