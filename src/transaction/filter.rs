//! Narrows a list of transactions down to the ones matching a set of criteria.

use time::Date;

use crate::transaction::{Category, Transaction, TransactionType};

/// The criteria for filtering transactions.
///
/// Every criterion is optional and unset criteria match everything, so the
/// default criteria match every transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Only keep transactions of this type.
    pub transaction_type: Option<TransactionType>,
    /// Only keep transactions in this category.
    pub category: Option<Category>,
    /// Only keep transactions on or after this date.
    pub start: Option<Date>,
    /// Only keep transactions on or before this date.
    pub end: Option<Date>,
    /// Only keep transactions whose title contains this text, ignoring case.
    ///
    /// An empty string matches every title.
    pub title: String,
}

impl FilterCriteria {
    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.transaction_type.is_none()
            && self.category.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.title.is_empty()
    }

    /// Whether `transaction` satisfies every criterion that is set.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if self
            .transaction_type
            .is_some_and(|transaction_type| transaction.transaction_type != transaction_type)
        {
            return false;
        }

        if self
            .category
            .is_some_and(|category| transaction.category != category)
        {
            return false;
        }

        if self.start.is_some_and(|start| transaction.date < start) {
            return false;
        }

        if self.end.is_some_and(|end| transaction.date > end) {
            return false;
        }

        self.title.is_empty()
            || transaction
                .title
                .to_lowercase()
                .contains(&self.title.to_lowercase())
    }
}

/// Keep the transactions that match `criteria`, in their original order.
pub fn apply_filters<'a>(
    transactions: &'a [Transaction],
    criteria: &FilterCriteria,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|transaction| criteria.matches(transaction))
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        test_utils::transaction,
        transaction::{Category, FilterCriteria, Transaction, TransactionType, apply_filters},
    };

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            transaction(1, "Coffee", 4.5, Category::Food, date!(2024 - 01 - 01)),
            transaction(2, "Pay day", 3000.0, Category::Salary, date!(2024 - 01 - 15)),
            transaction(3, "Weekly shop", 82.0, Category::Groceries, date!(2024 - 01 - 20)),
            transaction(4, "Side gig", 250.0, Category::Freelance, date!(2024 - 02 - 03)),
            transaction(5, "coffee beans", 18.0, Category::Groceries, date!(2024 - 02 - 10)),
            transaction(6, "", 12.0, Category::OtherExpense, date!(2024 - 02 - 11)),
        ]
    }

    fn ids(transactions: &[&Transaction]) -> Vec<i64> {
        transactions.iter().map(|transaction| transaction.id).collect()
    }

    #[test]
    fn empty_criteria_keeps_everything_in_order() {
        let transactions = sample_transactions();

        let got = apply_filters(&transactions, &FilterCriteria::default());

        assert_eq!(ids(&got), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn filters_by_type() {
        let transactions = vec![
            transaction(1, "Groceries", 100.0, Category::Food, date!(2024 - 01 - 05)),
            transaction(2, "Pay", 50.0, Category::Salary, date!(2024 - 01 - 10)),
        ];
        let criteria = FilterCriteria {
            transaction_type: Some(TransactionType::Expense),
            ..Default::default()
        };

        let got = apply_filters(&transactions, &criteria);

        assert_eq!(ids(&got), vec![1]);
    }

    #[test]
    fn title_search_ignores_case() {
        let transactions = sample_transactions();
        let criteria = FilterCriteria {
            title: "COFFEE".to_owned(),
            ..Default::default()
        };

        let got = apply_filters(&transactions, &criteria);

        assert_eq!(ids(&got), vec![1, 5]);
    }

    #[test]
    fn date_range_is_inclusive() {
        let transactions = sample_transactions();
        let criteria = FilterCriteria {
            start: Some(date!(2024 - 01 - 15)),
            end: Some(date!(2024 - 02 - 03)),
            ..Default::default()
        };

        let got = apply_filters(&transactions, &criteria);

        assert_eq!(ids(&got), vec![2, 3, 4]);
    }

    #[test]
    fn combines_criteria() {
        let transactions = sample_transactions();
        let criteria = FilterCriteria {
            transaction_type: Some(TransactionType::Expense),
            category: Some(Category::Groceries),
            start: Some(date!(2024 - 02 - 01)),
            title: "bean".to_owned(),
            ..Default::default()
        };

        let got = apply_filters(&transactions, &criteria);

        assert_eq!(ids(&got), vec![5]);
    }

    #[test]
    fn start_after_end_matches_nothing() {
        let transactions = sample_transactions();
        let criteria = FilterCriteria {
            start: Some(date!(2024 - 03 - 01)),
            end: Some(date!(2024 - 01 - 01)),
            ..Default::default()
        };

        assert!(apply_filters(&transactions, &criteria).is_empty());
    }

    #[test]
    fn every_combination_keeps_exactly_the_matching_transactions() {
        let transactions = sample_transactions();
        let types = [None, Some(TransactionType::Income), Some(TransactionType::Expense)];
        let categories = [None, Some(Category::Groceries), Some(Category::Salary)];
        let starts = [None, Some(date!(2024 - 01 - 15))];
        let ends = [None, Some(date!(2024 - 02 - 03))];
        let titles = ["", "co", "PAY"];

        for transaction_type in types {
            for category in categories {
                for start in starts {
                    for end in ends {
                        for title in titles {
                            let criteria = FilterCriteria {
                                transaction_type,
                                category,
                                start,
                                end,
                                title: title.to_owned(),
                            };

                            let got = apply_filters(&transactions, &criteria);

                            let want: Vec<i64> = transactions
                                .iter()
                                .filter(|t| {
                                    transaction_type.is_none_or(|tt| t.transaction_type == tt)
                                        && category.is_none_or(|c| t.category == c)
                                        && start.is_none_or(|s| t.date >= s)
                                        && end.is_none_or(|e| t.date <= e)
                                        && t.title.to_lowercase().contains(&title.to_lowercase())
                                })
                                .map(|t| t.id)
                                .collect();
                            assert_eq!(ids(&got), want, "criteria: {criteria:?}");
                        }
                    }
                }
            }
        }
    }
}
