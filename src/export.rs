// 📤 CSV Export - one file per account group
//
// <output_dir>/<group>.csv, UTF-8 with BOM, ';' delimited, header row:
//   date;payee;amount;currency;type;category;note
// Groups without transactions produce no file.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::accounts::{AccountGroup, GroupedTransactions};
use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const DELIMITER: u8 = b';';

/// A file produced by `write_groups`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub group: AccountGroup,
    pub path: PathBuf,
    pub transactions: usize,
}

impl WrittenFile {
    /// Line shown to the user after a file is written
    pub fn announcement(&self) -> String {
        format!(
            "Created {} with {} transactions.",
            self.path.display(),
            self.transactions
        )
    }
}

/// Output path for a group inside `output_dir`
pub fn group_path(output_dir: &Path, group: &AccountGroup) -> PathBuf {
    output_dir.join(format!("{}.csv", group))
}

/// Write every non-empty group to its own CSV file
pub fn write_groups(groups: &GroupedTransactions, output_dir: &Path) -> Result<Vec<WrittenFile>> {
    let mut written = Vec::new();

    for (group, transactions) in groups {
        if transactions.is_empty() {
            debug!(group = %group, "no transactions, skipping file");
            continue;
        }

        let path = group_path(output_dir, group);
        write_group(&path, transactions)?;
        info!(group = %group, path = %path.display(), count = transactions.len(), "wrote ledger");

        written.push(WrittenFile {
            group: group.clone(),
            path,
            transactions: transactions.len(),
        });
    }

    Ok(written)
}

/// Write one group's transactions to `path`, replacing any existing file
pub fn write_group(path: &Path, transactions: &[Transaction]) -> Result<()> {
    let to_error = |source: csv::Error| LedgerError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(|e| to_error(e.into()))?;
    file.write_all(UTF8_BOM).map_err(|e| to_error(e.into()))?;

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(file);

    for tx in transactions {
        wtr.serialize(tx.to_record()).map_err(to_error)?;
    }
    wtr.flush().map_err(|e| to_error(e.into()))?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AccountBook;
    use crate::category::{Category, CategorySlot};
    use crate::transaction::Direction;
    use chrono::NaiveDate;
    use std::fs;

    fn create_test_transaction(group: AccountGroup, amount: f64, note: &str) -> Transaction {
        Transaction {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(14, 5, 0)
                .unwrap(),
            counterparty: "Carrefour".to_string(),
            amount,
            currency: "EGP".to_string(),
            direction: if amount > 0.0 { Direction::Income } else { Direction::Expense },
            category: CategorySlot::Classified(Category::FoodAndDrink),
            note: note.to_string(),
            account_group: group,
        }
    }

    #[test]
    fn test_write_group_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let tx = create_test_transaction(AccountGroup::cib_current_debit(), -150.0, "paid; thanks");

        write_group(&path, &[tx]).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("date;payee;amount;currency;type;category;note"));
        assert_eq!(
            lines.next(),
            Some("2024-03-01 14:05:00;Carrefour;-150.00;EGP;Expense;Food & Drink;\"paid; thanks\"")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_groups_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = AccountBook::new();
        book.record(create_test_transaction(AccountGroup::banque_misr(), 500.0, "in"));
        book.record(create_test_transaction(AccountGroup::banque_misr(), -20.0, "out"));
        let groups = book.finalize();

        let written = write_groups(&groups, dir.path()).unwrap();

        assert_eq!(written.len(), 1);
        assert_eq!(written[0].group, AccountGroup::banque_misr());
        assert_eq!(written[0].transactions, 2);
        assert!(dir.path().join("Banque_Misr.csv").exists());
        assert!(!dir.path().join("CIB_Current_Debit.csv").exists());
        assert_eq!(
            written[0].announcement(),
            format!("Created {} with 2 transactions.", dir.path().join("Banque_Misr.csv").display())
        );
    }

    #[test]
    fn test_write_group_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_group(&path, &[]).unwrap_err();
        assert!(matches!(err, LedgerError::WriteOutput { .. }));
    }

    #[test]
    fn test_group_path() {
        let path = group_path(Path::new("/tmp/ledgers"), &AccountGroup::cib_credit_card("4821"));
        assert_eq!(path, PathBuf::from("/tmp/ledgers/CIB_Credit_Card_4821.csv"));
    }
}
