//! Orders transactions by a single column.

use std::cmp::Ordering;

use crate::transaction::Transaction;

/// The column to sort transactions by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Sort by title, ignoring case.
    Title,
    /// Sort by date, oldest first.
    Date,
    /// Sort by category code.
    Category,
    /// Sort by transaction type code.
    Type,
    /// Sort by amount, smallest first.
    Amount,
}

/// Whether to sort smallest or largest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// The arrow shown next to the active column's header.
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// The active sort column and direction.
///
/// Only one column is sorted on at a time. The default is the most recent
/// transactions first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    /// The column to sort by.
    pub key: SortKey,
    /// The order to sort in.
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::Date,
            direction: SortDirection::Descending,
        }
    }
}

impl SortConfig {
    /// Select the column `key`, e.g. after its header was clicked.
    ///
    /// Selecting the active column flips the direction, selecting any other
    /// column sorts by it in ascending order.
    pub fn select(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.toggled(),
            }
        } else {
            Self {
                key,
                direction: SortDirection::Ascending,
            }
        }
    }

    /// The indicator for the header of `key`: an arrow for the active column
    /// and nothing for every other column.
    pub fn indicator(&self, key: SortKey) -> &'static str {
        if self.key == key {
            self.direction.arrow()
        } else {
            ""
        }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let ordering = match self.key {
            SortKey::Title => compare_text(&a.title, &b.title),
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Category => compare_text(a.category.code(), b.category.code()),
            SortKey::Type => compare_text(a.transaction_type.code(), b.transaction_type.code()),
            SortKey::Amount => a.amount.total_cmp(&b.amount),
        };

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Compare text ignoring case, falling back to the exact text so that the
/// order is total. Empty text sorts before everything else.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort `transactions` by `config`.
///
/// The sort is stable, so transactions that are equal under the active column
/// keep their relative order.
pub fn apply_sort<'a>(
    mut transactions: Vec<&'a Transaction>,
    config: SortConfig,
) -> Vec<&'a Transaction> {
    transactions.sort_by(|a, b| config.compare(a, b));
    transactions
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        test_utils::transaction,
        transaction::{
            Category, FilterCriteria, SortConfig, SortDirection, SortKey, Transaction,
            apply_filters, apply_sort,
        },
    };

    fn ids(transactions: &[&Transaction]) -> Vec<i64> {
        transactions.iter().map(|transaction| transaction.id).collect()
    }

    #[test]
    fn default_is_newest_first() {
        let transactions = vec![
            transaction(1, "Groceries", 100.0, Category::Food, date!(2024 - 01 - 05)),
            transaction(2, "Pay", 50.0, Category::Salary, date!(2024 - 01 - 10)),
        ];

        let got = apply_sort(
            apply_filters(&transactions, &FilterCriteria::default()),
            SortConfig::default(),
        );

        assert_eq!(ids(&got), vec![2, 1]);
    }

    #[test]
    fn select_toggles_active_key_and_resets_new_key() {
        let config = SortConfig::default();

        let toggled = config.select(SortKey::Date);
        assert_eq!(toggled.direction, SortDirection::Ascending);

        let toggled_again = toggled.select(SortKey::Date);
        assert_eq!(toggled_again.direction, SortDirection::Descending);

        let new_key = toggled_again.select(SortKey::Amount);
        assert_eq!(
            new_key,
            SortConfig {
                key: SortKey::Amount,
                direction: SortDirection::Ascending
            }
        );
    }

    #[test]
    fn indicator_only_on_active_key() {
        let config = SortConfig {
            key: SortKey::Title,
            direction: SortDirection::Ascending,
        };

        assert_eq!(config.indicator(SortKey::Title), "↑");
        assert_eq!(config.select(SortKey::Title).indicator(SortKey::Title), "↓");
        assert_eq!(config.indicator(SortKey::Amount), "");
    }

    #[test]
    fn sorts_amount_numerically() {
        let transactions = vec![
            transaction(1, "a", 100.0, Category::Food, date!(2024 - 01 - 01)),
            transaction(2, "b", 9.5, Category::Food, date!(2024 - 01 - 01)),
            transaction(3, "c", 20.0, Category::Food, date!(2024 - 01 - 01)),
        ];
        let config = SortConfig {
            key: SortKey::Amount,
            direction: SortDirection::Ascending,
        };

        let got = apply_sort(transactions.iter().collect(), config);

        assert_eq!(ids(&got), vec![2, 3, 1]);
    }

    #[test]
    fn empty_title_sorts_first_and_case_is_ignored() {
        let transactions = vec![
            transaction(1, "banana", 1.0, Category::Food, date!(2024 - 01 - 01)),
            transaction(2, "Apple", 1.0, Category::Food, date!(2024 - 01 - 01)),
            transaction(3, "", 1.0, Category::Food, date!(2024 - 01 - 01)),
            transaction(4, "cherry", 1.0, Category::Food, date!(2024 - 01 - 01)),
        ];
        let config = SortConfig {
            key: SortKey::Title,
            direction: SortDirection::Ascending,
        };

        let got = apply_sort(transactions.iter().collect(), config);

        assert_eq!(ids(&got), vec![3, 2, 1, 4]);
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let transactions = vec![
            transaction(1, "a", 5.0, Category::Rent, date!(2024 - 01 - 01)),
            transaction(2, "b", 5.0, Category::Food, date!(2024 - 01 - 02)),
            transaction(3, "c", 1.0, Category::Rent, date!(2024 - 01 - 03)),
            transaction(4, "d", 5.0, Category::Rent, date!(2024 - 01 - 04)),
        ];

        let ascending = apply_sort(
            transactions.iter().collect(),
            SortConfig {
                key: SortKey::Category,
                direction: SortDirection::Ascending,
            },
        );
        let descending = apply_sort(
            transactions.iter().collect(),
            SortConfig {
                key: SortKey::Category,
                direction: SortDirection::Descending,
            },
        );

        assert_eq!(ids(&ascending), vec![2, 1, 3, 4]);
        assert_eq!(ids(&descending), vec![1, 3, 4, 2]);
    }

    #[test]
    fn sorts_by_type_code() {
        let transactions = vec![
            transaction(1, "Pay", 1.0, Category::Salary, date!(2024 - 01 - 01)),
            transaction(2, "Food", 1.0, Category::Food, date!(2024 - 01 - 01)),
        ];
        let config = SortConfig {
            key: SortKey::Type,
            direction: SortDirection::Ascending,
        };

        let got = apply_sort(transactions.iter().collect(), config);

        assert_eq!(ids(&got), vec![2, 1]);
    }

    #[test]
    fn toggling_direction_keeps_the_same_elements() {
        let transactions = vec![
            transaction(1, "a", 3.0, Category::Food, date!(2024 - 01 - 03)),
            transaction(2, "b", 1.0, Category::Food, date!(2024 - 01 - 01)),
            transaction(3, "c", 2.0, Category::Food, date!(2024 - 01 - 02)),
        ];
        let config = SortConfig {
            key: SortKey::Date,
            direction: SortDirection::Ascending,
        };

        let ascending = apply_sort(transactions.iter().collect(), config);
        let descending = apply_sort(transactions.iter().collect(), config.select(SortKey::Date));

        let mut reversed = ids(&descending);
        reversed.reverse();
        assert_eq!(ids(&ascending), reversed);
    }
}
