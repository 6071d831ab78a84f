// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use file_search_client::app::{Action, ActionKind};
use file_search_client::models::auth::SignupForm;
use file_search_client::models::search::{FileResult, FileTypeFilter, SortOrder, StorageType};
use file_search_client::models::settings::ClientSettings;
use file_search_client::runtime::AppRuntime;
use file_search_client::services::accounts::AccountsService;
use file_search_client::services::api::{ApiClient, ApiError};
use file_search_client::services::auth::AuthService;
use file_search_client::services::index_trigger::IndexError;
use file_search_client::services::logging::init_tracing;
use file_search_client::services::result_actions::{cloud_open_url, ActionError, ResultActions};
use file_search_client::services::session::SessionStore;
use file_search_client::VERSION;
use std::path::PathBuf;

const SESSION_EXPIRED: &str = "session expired, please log in";

/// Search files indexed by the file search backend
#[derive(Parser)]
#[command(name = "file-search", version = VERSION, about, long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "FILE_SEARCH_API_URL")]
    api_url: Option<String>,

    /// Session file (defaults to the platform config directory)
    #[arg(long, global = true, env = "FILE_SEARCH_SESSION")]
    session: Option<PathBuf>,

    /// Debug logging unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for files
    Search {
        /// Search text
        query: String,

        /// Only results from this storage
        #[arg(long)]
        service: Option<StorageType>,

        /// Only results of this type
        #[arg(long)]
        file_type: Option<FileTypeFilter>,

        /// Display order: name, type or storage
        #[arg(long, default_value = "name")]
        sort: SortOrder,

        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Reindex files on the backend
    Index {
        /// Return right after the request is accepted
        #[arg(long)]
        no_wait: bool,
    },

    /// Download a local file
    Download {
        filepath: String,

        /// Directory to save into
        #[arg(long, default_value = ".")]
        dest: PathBuf,
    },

    /// Reveal a file in the file manager of the backend machine
    OpenLocation { filepath: String },

    /// Toggle the favorite flag of a file
    Favorite { filepath: String },

    /// Print the provider link of a cloud search hit
    CloudUrl {
        /// Search text
        query: String,

        /// Result id (defaults to the first cloud result)
        #[arg(long)]
        id: Option<i64>,

        /// Open the link in the browser
        #[arg(long)]
        open: bool,
    },

    /// Log in
    Login {
        email: String,

        #[arg(long, env = "FILE_SEARCH_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and log in
    Signup {
        username: String,
        email: String,

        #[arg(long, env = "FILE_SEARCH_PASSWORD", hide_env_values = true)]
        password: String,

        /// Defaults to the password
        #[arg(long)]
        confirm_password: Option<String>,
    },

    /// Log out and forget the saved session
    Logout,

    /// Show the logged in user
    Whoami,

    /// Manage connected cloud accounts
    Accounts {
        #[command(subcommand)]
        command: AccountCommands,
    },
}

#[derive(Subcommand)]
enum AccountCommands {
    /// List connected accounts
    List,
    /// Sync an account now
    Sync { id: i64 },
    /// Disconnect an account
    Disconnect { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = ClientSettings::from_env();
    if let Some(api_url) = cli.api_url {
        settings = settings.with_api_url(api_url);
    }

    let session_path = match cli.session {
        Some(path) => path,
        None => SessionStore::default_path()?,
    };
    let api = ApiClient::new(&settings).context("Failed to create the API client")?;
    let auth = AuthService::new(api, SessionStore::load(session_path));
    tracing::debug!(version = VERSION, backend = %auth.api().base_url(), "starting");

    let mut runtime = AppRuntime::new(auth, &settings);
    let result = run_command(&mut runtime, cli.command).await;
    result.map_err(|e| expire_on_unauthorized(runtime.auth_mut(), e))
}

async fn run_command(runtime: &mut AppRuntime, command: Commands) -> Result<()> {
    let actions = ResultActions::new(runtime.auth().api().clone());
    match command {
        Commands::Search {
            query,
            service,
            file_type,
            sort,
            pages,
        } => {
            run_search(runtime, query, service, file_type, sort, pages).await?;
            for file in runtime.app().results() {
                print_result(file);
            }
        }
        Commands::Index { no_wait } => run_index(runtime, no_wait).await?,
        Commands::CloudUrl { query, id, open } => {
            run_search(runtime, query, None, None, SortOrder::default(), 1).await?;
            cloud_url(runtime.app().results(), id, open)?;
        }
        Commands::Download { filepath, dest } => {
            let path = actions.download(&filepath, &dest).await?;
            println!("Saved {}", path.display());
        }
        Commands::OpenLocation { filepath } => {
            actions.open_file_location(&filepath).await?;
            println!("Opened location of {}", filepath);
        }
        Commands::Favorite { filepath } => {
            match runtime.auth().api().toggle_favorite(&filepath).await? {
                Some(true) => println!("Added {} to favorites", filepath),
                Some(false) => println!("Removed {} from favorites", filepath),
                None => println!("Toggled favorite for {}", filepath),
            }
        }
        Commands::Login { email, password } => {
            let profile = runtime.auth_mut().login(&email, &password).await?;
            println!("Logged in as {}", profile.username.unwrap_or(profile.email));
        }
        Commands::Signup {
            username,
            email,
            password,
            confirm_password,
        } => {
            let form = SignupForm {
                username,
                email,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
            };
            let profile = runtime.auth_mut().signup(form).await?;
            println!("Account created, logged in as {}", profile.email);
        }
        Commands::Logout => {
            runtime.auth_mut().logout().await?;
            println!("Logged out");
        }
        Commands::Whoami => whoami(runtime.auth_mut()).await?,
        Commands::Accounts { command } => run_accounts(runtime.auth_mut(), command).await?,
    }
    Ok(())
}

async fn whoami(auth: &mut AuthService) -> Result<()> {
    if !auth.session().is_logged_in() {
        bail!("not logged in");
    }
    let profile = auth.whoami().await?;
    match profile.username {
        Some(username) => println!("{} <{}> (id {})", username, profile.email, profile.id),
        None => println!("{} (id {})", profile.email, profile.id),
    }
    Ok(())
}

async fn run_accounts(auth: &mut AuthService, command: AccountCommands) -> Result<()> {
    let user_id = match auth.current_user() {
        Some(user) => user.id.clone(),
        None => bail!("not logged in"),
    };
    let accounts = AccountsService::new(auth.api().clone());

    match command {
        AccountCommands::List => {
            let list = accounts.list(&user_id).await?;
            if list.is_empty() {
                println!("No cloud accounts connected");
            }
            for account in list {
                println!(
                    "{:>4}  {:<14} {:<30} last synced: {}",
                    account.id,
                    account.provider,
                    account.email,
                    account.last_synced.as_deref().unwrap_or("never")
                );
            }
        }
        AccountCommands::Sync { id } => {
            let list = accounts.list(&user_id).await?;
            let account = list
                .iter()
                .find(|a| a.id == id)
                .ok_or_else(|| anyhow!("no cloud account with id {}", id))?;
            let report = accounts.sync(account).await?;
            for source in &report.synced {
                println!("synced {}", source);
            }
            for (source, message) in &report.failed {
                eprintln!("error: {} failed: {}", source, message);
            }
            if !report.is_complete() {
                bail!("sync of account {} was incomplete", id);
            }
        }
        AccountCommands::Disconnect { id } => {
            accounts.disconnect(id).await?;
            println!("Disconnected account {}", id);
        }
    }
    Ok(())
}

async fn run_search(
    runtime: &mut AppRuntime,
    query: String,
    service: Option<StorageType>,
    file_type: Option<FileTypeFilter>,
    sort: SortOrder,
    pages: u32,
) -> Result<()> {
    runtime.dispatch(Action::TextChanged(query));
    runtime.dispatch(Action::ServiceFilterChanged(service));
    runtime.dispatch(Action::FileTypeFilterChanged(file_type));
    runtime.dispatch(Action::SortOrderChanged(sort));
    runtime.dispatch(Action::SubmitNow);
    runtime.settle().await;

    for _ in 1..pages {
        let Some(last) = runtime.app().last_visible_candidate() else {
            break;
        };
        if !runtime.app().fetcher().has_more() {
            break;
        }
        runtime.dispatch(Action::LastItemVisible { id: last });
        runtime.settle().await;
    }

    report(runtime)
}

async fn run_index(runtime: &mut AppRuntime, no_wait: bool) -> Result<()> {
    if no_wait {
        let result = runtime.index().start_only().await;
        return match result {
            Ok(()) => {
                println!("Indexing started");
                Ok(())
            }
            Err(e) => {
                let expired = e.is_unauthorized();
                runtime.dispatch(Action::ActionFinished {
                    kind: ActionKind::Index,
                    outcome: Err(e.into()),
                });
                report(runtime)?;
                if expired {
                    bail!(SESSION_EXPIRED);
                }
                Ok(())
            }
        };
    }

    let mut updates = runtime.index().subscribe();
    let progress = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let status = *updates.borrow_and_update();
            eprintln!("index status: {}", status);
        }
    });
    let status = runtime.reindex().await;
    progress.abort();

    report(runtime)?;
    match status {
        Some(status) => {
            println!("Indexing {}", status);
            Ok(())
        }
        None => bail!("indexing failed"),
    }
}

fn cloud_url(results: Vec<&FileResult>, id: Option<i64>, open: bool) -> Result<()> {
    let file = match id {
        Some(id) => results
            .into_iter()
            .find(|f| f.id == id)
            .ok_or_else(|| anyhow!("no result with id {}", id))?,
        None => results
            .into_iter()
            .find(|f| !f.is_local())
            .ok_or_else(|| anyhow!("no cloud results"))?,
    };
    let url = cloud_open_url(file)
        .ok_or_else(|| anyhow!("'{}' has no provider link", file.filename))?;

    println!("{}", url);
    if open {
        open::that(url.as_str()).with_context(|| format!("Failed to open {}", url))?;
    }
    Ok(())
}

/// Print pending notifications; fail if the session expired meanwhile.
fn report(runtime: &mut AppRuntime) -> Result<()> {
    for notification in runtime.take_notifications() {
        eprintln!("{}", notification);
    }
    if runtime.login_required() {
        bail!(SESSION_EXPIRED);
    }
    Ok(())
}

fn print_result(file: &FileResult) {
    let favorite = if file.is_favorite { "*" } else { " " };
    let location = file
        .filepath()
        .map(str::to_string)
        .or_else(|| cloud_open_url(file).map(|u| u.to_string()))
        .unwrap_or_default();
    println!(
        "{:>6} {} {:<13} {}  {}",
        file.id,
        favorite,
        file.storage_type(),
        file.filename,
        location
    );
}

/// Forget the saved session when the backend answered 401.
fn expire_on_unauthorized(auth: &mut AuthService, error: anyhow::Error) -> anyhow::Error {
    let unauthorized = error.chain().any(|cause| {
        cause
            .downcast_ref::<ApiError>()
            .is_some_and(ApiError::is_unauthorized)
            || cause
                .downcast_ref::<ActionError>()
                .is_some_and(ActionError::is_unauthorized)
            || cause
                .downcast_ref::<IndexError>()
                .is_some_and(IndexError::is_unauthorized)
    });
    if !unauthorized {
        return error;
    }
    if let Err(e) = auth.session_expired() {
        tracing::warn!(error = %e, "could not clear the saved session");
    }
    anyhow!(SESSION_EXPIRED)
}
