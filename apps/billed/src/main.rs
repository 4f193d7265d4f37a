use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    session::{save_session, JWT_KEY},
    views::{new_bill_ui, BillsPageState},
    Bills, EmployeeSession, FileSelection, FileSessionStore, HttpBillsClient, Navigate, NewBill,
    NewBillForm, RoutePath, SelectedFile, SessionStore,
};
use shared::domain::Session;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, prepare_api_url};

#[derive(Parser, Debug)]
#[command(name = "billed", about = "Employee expense reports")]
struct Args {
    /// Base URL of the bills API.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Session file holding the signed-in employee.
    #[arg(long, global = true)]
    session_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remember the employee whose bills are listed and submitted.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        jwt: Option<String>,
    },
    /// Print the bill list, most recent first.
    List,
    /// Print the bill list with the receipt of the bill at INDEX opened.
    Show { index: usize },
    /// Print the empty new-bill form.
    Form,
    /// Upload a receipt and submit a new bill.
    New(NewBillArgs),
}

#[derive(ClapArgs, Debug)]
struct NewBillArgs {
    #[arg(long = "type", default_value = "")]
    expense_type: String,
    #[arg(long, default_value = "")]
    name: String,
    /// Expense date, YYYY-MM-DD.
    #[arg(long, default_value = "")]
    date: String,
    #[arg(long, default_value = "")]
    amount: String,
    #[arg(long, default_value = "")]
    vat: String,
    #[arg(long, default_value = "")]
    pct: String,
    #[arg(long, default_value = "")]
    commentary: String,
    /// Receipt image (jpg, jpeg or png).
    #[arg(long)]
    file: Option<PathBuf>,
}

impl NewBillArgs {
    fn fill(&self, form: &mut NewBillForm) {
        form.expense_type = self.expense_type.clone();
        form.name = self.name.clone();
        form.date = self.date.clone();
        form.amount = self.amount.clone();
        form.vat = self.vat.clone();
        form.pct = self.pct.clone();
        form.commentary = self.commentary.clone();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    if let Some(session_path) = args.session_path {
        settings.session_path = session_path;
    }
    let api_url = prepare_api_url(&settings.api_url)?;
    let store = FileSessionStore::new(&settings.session_path);
    info!(api_url = %api_url, session = %store.path().display(), "starting billed");

    match args.command {
        Command::Login { email, jwt } => login(&store, email, jwt),
        Command::List => {
            let (session, client) = employee_context(&api_url, &store)?;
            show_bills(session, client, None).await
        }
        Command::Show { index } => {
            let (session, client) = employee_context(&api_url, &store)?;
            show_bills(session, client, Some(index)).await
        }
        Command::Form => {
            println!("{}", new_bill_ui::render(&NewBillForm::default()));
            Ok(())
        }
        Command::New(fields) => {
            let (session, client) = employee_context(&api_url, &store)?;
            submit_new_bill(session, client, fields).await
        }
    }
}

fn login(store: &FileSessionStore, email: String, jwt: Option<String>) -> Result<()> {
    if email.trim().is_empty() {
        bail!("email must not be empty");
    }
    save_session(store, &Session::employee(email.trim()))
        .with_context(|| format!("failed to write session to '{}'", store.path().display()))?;
    match jwt {
        Some(token) => store.set_item(JWT_KEY, &token)?,
        None => store.remove_item(JWT_KEY)?,
    }
    println!("Signed in as {}", email.trim());
    Ok(())
}

fn employee_context(
    api_url: &str,
    store: &FileSessionStore,
) -> Result<(EmployeeSession, Arc<HttpBillsClient>)> {
    let session = EmployeeSession::from_store(store)
        .context("no usable session; run `billed login --email <email>` first")?;
    let client =
        HttpBillsClient::new(api_url).with_bearer_token(session.bearer_token.clone());
    Ok((session, Arc::new(client)))
}

fn navigator() -> (Navigate, Arc<Mutex<Option<RoutePath>>>) {
    let current = Arc::new(Mutex::new(None));
    let sink = current.clone();
    let navigate: Navigate = Arc::new(move |route| {
        info!(route = %route, "navigate");
        *sink.lock().unwrap_or_else(|e| e.into_inner()) = Some(route);
    });
    (navigate, current)
}

async fn show_bills(
    session: EmployeeSession,
    client: Arc<HttpBillsClient>,
    open: Option<usize>,
) -> Result<()> {
    let (navigate, _) = navigator();
    let mut bills = Bills::new(client, session, navigate);
    let state = bills.load().await;

    if let (Some(index), BillsPageState::Loaded(view)) = (open, &state) {
        let row = view
            .rows()
            .get(index)
            .with_context(|| format!("no bill at index {index} ({} bills)", view.len()))?;
        let url = row
            .file_url
            .clone()
            .with_context(|| format!("bill {} has no receipt", row.id))?;
        bills.handle_click_icon_eye(&url);
    }

    println!("{}", bills.render(&state));
    if let BillsPageState::Error(message) = &state {
        bail!("failed to load bills: {message}");
    }
    Ok(())
}

async fn read_receipt(path: &Path) -> Result<SelectedFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read receipt '{}'", path.display()))?;
    let mime_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());
    Ok(SelectedFile::new(path.to_string_lossy(), mime_type, bytes))
}

async fn submit_new_bill(
    session: EmployeeSession,
    client: Arc<HttpBillsClient>,
    fields: NewBillArgs,
) -> Result<()> {
    let (navigate, current) = navigator();
    let mut new_bill = NewBill::new(client.clone(), client.clone(), session.clone(), navigate);
    fields.fill(new_bill.form_mut());

    if let Some(path) = &fields.file {
        let file = read_receipt(path).await?;
        match new_bill
            .handle_change_file(file)
            .await
            .context("receipt upload failed")?
        {
            FileSelection::Rejected => {
                println!("{}", new_bill.render());
                bail!("receipt must be a jpg, jpeg or png image");
            }
            FileSelection::Accepted(stored) => {
                info!(key = %stored.key, file_url = %stored.file_url, "receipt stored");
            }
        }
    }

    if let Err(err) = new_bill.handle_submit().await {
        println!("{}", new_bill.render());
        return Err(err).context("bill was not submitted");
    }

    let route = *current.lock().unwrap_or_else(|e| e.into_inner());
    if route == Some(RoutePath::Bills) {
        show_bills(session, client, None).await?;
    }
    Ok(())
}
