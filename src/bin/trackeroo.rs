use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
};

use clap::{Parser, Subcommand, ValueEnum};
use time::OffsetDateTime;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use trackeroo::{
    Alert, AlertType, ApiClient, Category, ClientConfig, Dashboard, DeleteOutcome, Error,
    FilterCriteria, LogInForm, RegisterForm, Route, Session, Shell, SortKey, Transaction,
    TransactionEditor, TransactionList, TransactionPage, TransactionType, format_currency,
    format_date, load_dashboard, log_in, parse_date, register,
};

/// A command line client for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The URL the backend API is served from, e.g. "http://localhost:8080/api".
    #[arg(long, env = "TRACKEROO_API_BASE_URL")]
    base_url: Option<String>,

    /// The bearer token printed by `log-in`.
    #[arg(long, env = "TRACKEROO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and print a token to set as TRACKEROO_TOKEN.
    LogIn {
        #[arg(long)]
        email: String,
    },

    /// Create a new account.
    Register {
        #[arg(long, default_value = "")]
        username: String,

        #[arg(long)]
        email: String,
    },

    /// Show the income and expense totals, the totals per category and the
    /// most recent transactions.
    Dashboard,

    /// List transactions, one page at a time.
    List {
        /// Only show transactions of this type.
        #[arg(long = "type")]
        transaction_type: Option<TransactionType>,

        /// Only show transactions in this category, by code or label.
        #[arg(long)]
        category: Option<Category>,

        /// Only show transactions on or after this date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        from: Option<time::Date>,

        /// Only show transactions on or before this date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        to: Option<time::Date>,

        /// Only show transactions whose title contains this text.
        #[arg(long, default_value = "")]
        title: String,

        /// The column to sort by. Repeat a column to reverse its order.
        #[arg(long, value_enum)]
        sort: Vec<SortColumn>,

        /// The page to show, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Add a transaction.
    Add {
        #[command(flatten)]
        fields: TransactionFields,
    },

    /// Change a transaction. Fields that are not given keep their value.
    Edit {
        id: i64,

        #[command(flatten)]
        fields: TransactionFields,
    },

    /// Delete a transaction.
    Delete {
        id: i64,

        /// Delete without asking for confirmation.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Args, Debug)]
struct TransactionFields {
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    amount: Option<String>,

    /// Income or expense.
    #[arg(long = "type")]
    transaction_type: Option<TransactionType>,

    /// The category, by code or label. Defaults to the first category of the type.
    #[arg(long)]
    category: Option<Category>,

    /// The date (YYYY-MM-DD). New transactions default to today.
    #[arg(long)]
    date: Option<String>,

    #[arg(long)]
    note: Option<String>,
}

impl TransactionFields {
    fn apply_to(self, editor: &mut TransactionEditor) -> Result<(), Error> {
        if let Some(transaction_type) = self.transaction_type {
            editor.set_transaction_type(transaction_type);
        }

        if let Some(category) = self.category {
            editor.set_category(category)?;
        }

        if let Some(title) = self.title {
            editor.title = title;
        }

        if let Some(amount) = self.amount {
            editor.amount = amount;
        }

        if let Some(date) = self.date {
            editor.date = date;
        }

        if let Some(note) = self.note {
            editor.note = note;
        }

        Ok(())
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SortColumn {
    Title,
    Date,
    Category,
    Type,
    Amount,
}

impl From<SortColumn> for SortKey {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Title => SortKey::Title,
            SortColumn::Date => SortKey::Date,
            SortColumn::Category => SortKey::Category,
            SortColumn::Type => SortKey::Type,
            SortColumn::Amount => SortKey::Amount,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(alert) => {
            print_alert(&alert);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_filter(filter))
        .init();
}

async fn run(args: Args) -> Result<(), Alert> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }

    let session = match args.token {
        Some(token) => Session::with_token(token),
        None => Session::new(),
    };
    let shell = Shell::new(session.clone());
    let client = ApiClient::new(&config, session)?;

    let result = match args.command {
        Command::LogIn { email } => run_log_in(&client, &shell, email).await,
        Command::Register { username, email } => run_register(&client, username, email).await,
        Command::Dashboard => {
            require(&shell, Route::Dashboard)?;
            run_dashboard(&client, &config.currency_symbol).await
        }
        Command::List {
            transaction_type,
            category,
            from,
            to,
            title,
            sort,
            page,
        } => {
            require(&shell, Route::Transactions)?;
            let criteria = FilterCriteria {
                transaction_type,
                category,
                start: from,
                end: to,
                title,
            };
            let mut list = TransactionList::new(client.clone(), config.page_size);
            run_list(&mut list, criteria, &sort, page, &config.currency_symbol).await
        }
        Command::Add { fields } => {
            require(&shell, Route::Transactions)?;
            let mut list = TransactionList::new(client.clone(), config.page_size);
            run_add(&mut list, fields, &config.currency_symbol).await
        }
        Command::Edit { id, fields } => {
            require(&shell, Route::Transactions)?;
            let mut list = TransactionList::new(client.clone(), config.page_size);
            run_edit(&mut list, id, fields, &config.currency_symbol).await
        }
        Command::Delete { id, yes } => {
            require(&shell, Route::Transactions)?;
            let mut list = TransactionList::new(client.clone(), config.page_size);
            run_delete(&mut list, id, yes, &config.currency_symbol).await
        }
    };

    result.map_err(|alert| {
        if shell.current().session_expired {
            Alert::error(
                alert.message,
                "Run `trackeroo log-in` and set TRACKEROO_TOKEN to the new token.",
            )
        } else {
            alert
        }
    })
}

/// Check that the shell lets the user see `route`.
fn require(shell: &Shell, route: Route) -> Result<(), Alert> {
    if shell.navigate(route.path()) == route {
        return Ok(());
    }

    Err(Alert::error(
        format!("Log in to see the {} page.", route.title().to_lowercase()),
        "Run `trackeroo log-in` and set TRACKEROO_TOKEN to the printed token.",
    ))
}

async fn run_log_in(client: &ApiClient, shell: &Shell, email: String) -> Result<(), Alert> {
    let password = prompt_password("Password: ")?;
    let form = LogInForm { email, password };

    log_in(client, &form).await?;
    shell.logged_in();

    let token = client.session().token().unwrap_or_default();
    print_alert(&Alert::success(
        "Logged in.",
        "Set TRACKEROO_TOKEN to the token below to stay logged in.",
    ));
    println!("{token}");

    Ok(())
}

async fn run_register(client: &ApiClient, username: String, email: String) -> Result<(), Alert> {
    let password = prompt_password("Password: ")?;
    let confirmation = prompt_password("Enter the same password again: ")?;

    if password != confirmation {
        return Err(Alert::error_simple("Passwords must match, try again."));
    }

    let form = RegisterForm {
        username,
        email,
        password,
    };
    register(client, &form).await?;

    print_alert(&Alert::success(
        "Registered.",
        format!("Run `trackeroo log-in --email {}` to log in.", form.email),
    ));

    Ok(())
}

async fn run_dashboard(client: &ApiClient, currency_symbol: &str) -> Result<(), Alert> {
    let dashboard = load_dashboard(client).await?;
    print_dashboard(&dashboard, currency_symbol);

    Ok(())
}

async fn run_list(
    list: &mut TransactionList<ApiClient>,
    criteria: FilterCriteria,
    sort: &[SortColumn],
    page: usize,
    currency_symbol: &str,
) -> Result<(), Alert> {
    list.load().await?;
    list.set_criteria(criteria);

    for column in sort {
        list.set_sort(SortKey::from(*column));
    }

    for _ in 1..page {
        list.next_page();
    }

    print_page(&list.page(), list, currency_symbol);

    Ok(())
}

async fn run_add(
    list: &mut TransactionList<ApiClient>,
    fields: TransactionFields,
    currency_symbol: &str,
) -> Result<(), Alert> {
    let mut editor = TransactionEditor::new();
    editor.open_add();
    editor.date = format_date(today());
    fields.apply_to(&mut editor)?;

    let transaction = list.save(&mut editor).await?;

    print_alert(&Alert::success("Transaction created.", ""));
    print_transaction(transaction, currency_symbol);

    Ok(())
}

async fn run_edit(
    list: &mut TransactionList<ApiClient>,
    id: i64,
    fields: TransactionFields,
    currency_symbol: &str,
) -> Result<(), Alert> {
    list.load().await?;

    let transaction = list
        .transactions()
        .iter()
        .find(|transaction| transaction.id == id)
        .ok_or(Error::NotFound)?;

    let mut editor = TransactionEditor::new();
    editor.open_edit(transaction);
    fields.apply_to(&mut editor)?;

    let transaction = list.save(&mut editor).await?;

    print_alert(&Alert::success("Transaction updated.", ""));
    print_transaction(transaction, currency_symbol);

    Ok(())
}

async fn run_delete(
    list: &mut TransactionList<ApiClient>,
    id: i64,
    yes: bool,
    currency_symbol: &str,
) -> Result<(), Alert> {
    list.load().await?;

    let outcome = list
        .delete(id, |transaction| {
            yes || confirm_delete(transaction, currency_symbol)
        })
        .await?;

    match outcome {
        DeleteOutcome::Deleted => print_alert(&Alert::success("Transaction deleted.", "")),
        DeleteOutcome::Cancelled => println!("Nothing was deleted."),
    }

    Ok(())
}

fn today() -> time::Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

fn prompt_password(prompt: &str) -> Result<String, Alert> {
    rpassword::prompt_password(prompt).map_err(|error| {
        Alert::error(
            "Could not read the password.",
            format!("Could not read password from stdin: {error}"),
        )
    })
}

fn confirm_delete(transaction: &Transaction, currency_symbol: &str) -> bool {
    print_transaction(transaction, currency_symbol);
    print!("Delete this transaction? [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(error) => {
            tracing::warn!("Could not read confirmation from stdin: {error}");
            false
        }
    }
}

fn print_alert(alert: &Alert) {
    match alert.alert_type {
        AlertType::Success => {
            eprintln!("\x1b[32;1m{}\x1b[0m", alert.message);
        }
        AlertType::Error => {
            eprintln!("\x1b[31;1m{}\x1b[0m", alert.message);
        }
    }

    if !alert.details.is_empty() {
        eprintln!("{}", alert.details);
    }
}

fn print_dashboard(dashboard: &Dashboard, currency_symbol: &str) {
    let summary = dashboard.summary;
    println!("Income       {:>14}", format_currency(summary.income, currency_symbol));
    println!("Expenses     {:>14}", format_currency(summary.expense, currency_symbol));
    println!(
        "Net balance  {:>14}",
        format_currency(summary.net_balance, currency_symbol)
    );

    println!();
    println!("By category");
    if dashboard.has_category_data() {
        for category_total in &dashboard.category_totals {
            println!(
                "  {:<16} {:>14}  {}",
                category_total.category.label(),
                format_currency(category_total.total, currency_symbol),
                category_total.color()
            );
        }
    } else {
        println!("  No data available");
    }

    println!();
    println!("Recent transactions");
    if dashboard.recent_transactions.is_empty() {
        println!("  No transactions yet");
    }
    for transaction in &dashboard.recent_transactions {
        print_transaction(transaction, currency_symbol);
    }
}

fn print_page(page: &TransactionPage<'_>, list: &TransactionList<ApiClient>, currency_symbol: &str) {
    let sort = list.sort_config();
    println!(
        "{:>5}  {:<10}  {:<24}  {:<16}  {:<8}  {:>14}",
        "ID",
        format!("Date{}", sort.indicator(SortKey::Date)),
        format!("Title{}", sort.indicator(SortKey::Title)),
        format!("Category{}", sort.indicator(SortKey::Category)),
        format!("Type{}", sort.indicator(SortKey::Type)),
        format!("Amount{}", sort.indicator(SortKey::Amount)),
    );

    if page.is_empty() {
        println!("No transactions found.");
        return;
    }

    for transaction in &page.items {
        print_transaction(transaction, currency_symbol);
    }

    println!();
    println!(
        "Page {} of {} ({} matching)",
        page.current_page, page.total_pages, page.matching_count
    );
}

fn print_transaction(transaction: &Transaction, currency_symbol: &str) {
    let amount = format_currency(transaction.amount, currency_symbol);
    let amount = match transaction.transaction_type {
        TransactionType::Income => format!("+{amount}"),
        TransactionType::Expense => format!("-{amount}"),
    };

    println!(
        "{:>5}  {:<10}  {:<24}  {:<16}  {:<8}  {:>14}",
        transaction.id,
        format_date(transaction.date),
        transaction.title,
        transaction.category.label(),
        transaction.transaction_type.label(),
        amount
    );

    if let Some(note) = &transaction.note {
        println!("{:>5}  {note}", "");
    }
}
