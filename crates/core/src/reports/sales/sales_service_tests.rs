#[cfg(test)]
mod tests {
    use crate::errors::Result;
    use crate::reports::sales::{SalesDataService, SalesDataServiceTrait};
    use crate::transactions::{
        InventoryItemRef, TransactionRecord, TransactionRepositoryTrait, TransactionType,
    };
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // --- Mock TransactionRepository ---
    struct MockTransactionRepository {
        transactions: Arc<Mutex<Vec<TransactionRecord>>>,
    }

    impl MockTransactionRepository {
        fn new(transactions: Vec<TransactionRecord>) -> Self {
            Self {
                transactions: Arc::new(Mutex::new(transactions)),
            }
        }
    }

    #[async_trait]
    impl TransactionRepositoryTrait for MockTransactionRepository {
        async fn get_transactions_in_range(
            &self,
            start_date: Option<NaiveDate>,
            end_date: Option<NaiveDate>,
        ) -> Result<Vec<TransactionRecord>> {
            Ok(self
                .transactions
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.in_range(start_date, end_date))
                .cloned()
                .collect())
        }

        async fn get_transactions_by_types(
            &self,
            types: &[TransactionType],
            start_date: Option<NaiveDate>,
            end_date: Option<NaiveDate>,
        ) -> Result<Vec<TransactionRecord>> {
            Ok(self
                .transactions
                .lock()
                .unwrap()
                .iter()
                .filter(|t| types.contains(&t.transaction_type) && t.in_range(start_date, end_date))
                .cloned()
                .collect())
        }
    }

    fn sale(
        id: &str,
        (year, month, day): (i32, u32, u32),
        amount: Decimal,
        item: Option<(&str, Option<&str>)>,
    ) -> TransactionRecord {
        TransactionRecord {
            id: id.to_string(),
            transaction_type: TransactionType::Sale,
            date: Utc.with_ymd_and_hms(year, month, day, 14, 0, 0).unwrap(),
            amount,
            inventory_item: item.map(|(name, category)| InventoryItemRef {
                id: format!("item-{}", name),
                name: name.to_string(),
                category: category.map(str::to_string),
            }),
        }
    }

    #[tokio::test]
    async fn test_sale_records_are_projected_and_ordered() {
        let service = SalesDataService::new(Arc::new(MockTransactionRepository::new(vec![
            sale("tx-3", (2023, 2, 1), dec!(60), Some(("Pine", Some("Tree")))),
            sale("tx-1", (2023, 1, 5), dec!(100), Some(("Fern", Some("Plant")))),
            sale("tx-2", (2023, 1, 20), dec!(40), Some(("Mulch", None))),
        ])));

        let records = service.get_sale_records(None, None).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].transaction_id, "tx-1");
        assert_eq!(records[0].product_name, "Fern");
        assert_eq!(records[1].product_category, None);
        assert_eq!(records[2].transaction_id, "tx-3");
    }

    #[tokio::test]
    async fn test_sales_without_items_are_dropped() {
        let service = SalesDataService::new(Arc::new(MockTransactionRepository::new(vec![
            sale("tx-1", (2023, 1, 5), dec!(100), Some(("Fern", Some("Plant")))),
            sale("tx-2", (2023, 1, 6), dec!(15), None),
        ])));

        let records = service.get_sale_records(None, None).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transaction_id, "tx-1");
    }

    #[tokio::test]
    async fn test_csv_export() {
        let service = SalesDataService::new(Arc::new(MockTransactionRepository::new(vec![sale(
            "tx-1",
            (2023, 1, 5),
            dec!(100),
            Some(("Fern", Some("Plant"))),
        )])));

        let records = service.get_sale_records(None, None).await.unwrap();
        let csv = service.export_csv(&records).unwrap();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("transaction_id,date,amount,product_name,product_category")
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("tx-1,2023-01-05T14:00:00"));
        assert!(row.ends_with(",100,Fern,Plant"));
        assert_eq!(lines.next(), None);
    }
}
