mod cli;
mod config;
mod errors;
mod logging;
mod session;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use registration::{
    Field, JsonFileStore, SubmissionController, SubmitOutcome, load_record,
};
use tracing::{info, warn};

use crate::cli::{Cli, Cmd, SubmitArgs};
use crate::config::Config;

#[tokio::main]
pub async fn main() -> Result<ExitCode> {
    errors::init()?;
    let args = Cli::parse();
    config::ensure_data_and_config_dirs_exist()?;
    let config = Config::new()?;
    let _log_guard = logging::init(&config.config.data_dir)?;
    info!(
        data_dir = %config.config.data_dir.display(),
        config_dir = %config.config.config_dir.display(),
        "configuration loaded"
    );

    match args.cmd {
        Cmd::Submit(form) => submit(&config, form),
        Cmd::Show => show(&config),
        Cmd::Count { base_url } => {
            let base_url = base_url.unwrap_or_else(|| config.user_count.base_url.clone());
            count(&base_url).await
        }
        Cmd::Session => {
            session::run(controller(&config)?).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn controller(config: &Config) -> Result<SubmissionController> {
    let store = JsonFileStore::open(config.storage_path())?;
    Ok(SubmissionController::new(Box::new(store), &config.form))
}

fn submit(config: &Config, form: SubmitArgs) -> Result<ExitCode> {
    let mut controller = controller(config)?;
    let values = [
        (Field::LastName, form.last_name),
        (Field::FirstName, form.first_name),
        (Field::Email, form.email),
        (Field::Birthday, form.birthday),
        (Field::City, form.city),
        (Field::AddressCode, form.address_code),
    ];
    for (field, value) in values {
        controller.edit(field, value);
    }

    let outcome = controller.submit();
    println!("{}", outcome.message());
    let code = match outcome {
        SubmitOutcome::Accepted(_) => ExitCode::SUCCESS,
        SubmitOutcome::Rejected(_) => ExitCode::FAILURE,
        SubmitOutcome::StorageFailed(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    };
    controller.teardown();
    Ok(code)
}

fn show(config: &Config) -> Result<ExitCode> {
    let store = JsonFileStore::open(config.storage_path())?;
    match load_record(&store, &config.form.storage_key)? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("Aucune inscription enregistrée.");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Failures are reported but never fatal; the form does not depend on them.
async fn count(base_url: &str) -> Result<ExitCode> {
    match user_count::fetch_user_count(base_url).await {
        Ok(count) => {
            println!("{count} users(s) already registered");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            warn!(error = %err, "user count unavailable");
            println!("0 users(s) already registered");
            Ok(ExitCode::SUCCESS)
        }
    }
}
