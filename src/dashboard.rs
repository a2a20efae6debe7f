//! The dashboard: income and expense totals, totals per category and the
//! most recent transactions.
//!
//! The three datasets are fetched at the same time and the dashboard is only
//! shown once all of them arrived. If any request fails, nothing is shown.

use numfmt::{Formatter, Precision};

use crate::{
    Error,
    backend::{CategoryTotals, ExpenseBackend, Summary},
    transaction::{Category, Transaction},
};

/// The number of transactions shown in the dashboard's recent transactions.
pub const RECENT_TRANSACTION_COUNT: usize = 5;

/// The total amount for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryTotal {
    /// The category the amounts were summed for.
    pub category: Category,
    /// The sum of the amounts.
    pub total: f64,
}

impl CategoryTotal {
    /// The colour of the category's slice in the chart.
    pub fn color(&self) -> &'static str {
        self.category.color()
    }
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// The income, expense and net balance totals.
    pub summary: Summary,
    /// The totals per category, largest first.
    pub category_totals: Vec<CategoryTotal>,
    /// The most recent transactions, newest first.
    pub recent_transactions: Vec<Transaction>,
}

impl Dashboard {
    /// Whether there is anything to draw in the category chart.
    pub fn has_category_data(&self) -> bool {
        self.category_totals
            .iter()
            .map(|category_total| category_total.total)
            .sum::<f64>()
            > 0.0
    }
}

/// Fetch the summary, the category totals and the transactions concurrently
/// and build the dashboard from them.
///
/// # Errors
/// Returns [Error::SessionExpired] if the backend rejected the credential and
/// [Error::DashboardUnavailable] if any other request failed.
pub async fn load_dashboard<B>(backend: &B) -> Result<Dashboard, Error>
where
    B: ExpenseBackend,
{
    let result = tokio::try_join!(
        backend.summary(),
        backend.category_totals(),
        backend.list_transactions(),
    );

    let (summary, category_totals, transactions) = match result {
        Ok(data) => data,
        Err(Error::SessionExpired) => return Err(Error::SessionExpired),
        Err(error) => {
            tracing::error!("Failed to fetch dashboard data: {error}");
            return Err(Error::DashboardUnavailable);
        }
    };

    Ok(Dashboard {
        summary,
        category_totals: sort_category_totals(category_totals),
        recent_transactions: recent_transactions(&transactions, RECENT_TRANSACTION_COUNT),
    })
}

/// The `count` newest transactions, newest first.
///
/// Transactions on the same date keep their original order.
pub fn recent_transactions(transactions: &[Transaction], count: usize) -> Vec<Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted.into_iter().take(count).cloned().collect()
}

fn sort_category_totals(totals: CategoryTotals) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();

    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    totals
}

/// Format `amount` with the currency `symbol` and two decimal places, e.g.
/// "$1,234.50" or "-$12.00".
///
/// Amounts are rounded to whole cents first, so anything under half a cent
/// is shown as zero.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let cents = (amount * 100.0).round();
    if cents == 0.0 || !cents.is_finite() {
        return format!("{symbol}0.00");
    }

    let sign = if cents < 0.0 { "-" } else { "" };
    let amount = cents.abs() / 100.0;

    let formatted = match Formatter::new().separator(',') {
        Ok(formatter) => {
            let formatter = formatter.precision(Precision::Decimals(2));
            pad_decimals(formatter.fmt_string(amount))
        }
        Err(error) => {
            tracing::debug!("Could not create a number formatter: {error:?}");
            format!("{amount:.2}")
        }
    };

    format!("{sign}{symbol}{formatted}")
}

/// numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3", so add
/// them back.
fn pad_decimals(formatted: String) -> String {
    match formatted.rsplit_once('.') {
        Some((_, decimals)) if decimals.len() >= 2 => formatted,
        Some((_, decimals)) => format!("{formatted}{}", "0".repeat(2 - decimals.len())),
        None => format!("{formatted}.00"),
    }
}
