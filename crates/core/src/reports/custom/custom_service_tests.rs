#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};
    use crate::reports::custom::{
        AggregateField, AggregateKind, AggregateSpec, CustomReportRequest, CustomReportService,
        CustomReportServiceTrait, GroupField, OrderBy, OutputFormat, ReportStatus, SortDirection,
    };
    use crate::reports::{ReportError, UnmatchedPolicy};
    use crate::transactions::{
        InventoryItemRef, TransactionRecord, TransactionRepositoryTrait, TransactionType,
    };
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
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

    fn record(
        id: &str,
        transaction_type: TransactionType,
        (year, month, day): (i32, u32, u32),
        amount: Decimal,
        item: Option<(&str, Option<&str>)>,
    ) -> TransactionRecord {
        TransactionRecord {
            id: id.to_string(),
            transaction_type,
            date: Utc.with_ymd_and_hms(year, month, day, 8, 0, 0).unwrap(),
            amount,
            inventory_item: item.map(|(name, category)| InventoryItemRef {
                id: format!("item-{}", name),
                name: name.to_string(),
                category: category.map(str::to_string),
            }),
        }
    }

    fn sample_ledger() -> Vec<TransactionRecord> {
        vec![
            record(
                "tx-1",
                TransactionType::Sale,
                (2023, 1, 5),
                dec!(100),
                Some(("Pine", Some("Tree"))),
            ),
            record(
                "tx-2",
                TransactionType::Sale,
                (2023, 1, 20),
                dec!(40),
                Some(("Fern", Some("Plant"))),
            ),
            record(
                "tx-3",
                TransactionType::Sale,
                (2023, 2, 5),
                dec!(60),
                Some(("Pine", Some("Tree"))),
            ),
            record("tx-4", TransactionType::Expense, (2023, 1, 7), dec!(25), None),
        ]
    }

    fn request(
        group_by: Vec<GroupField>,
        order_by: Vec<OrderBy>,
        aggregates: Vec<AggregateSpec>,
    ) -> CustomReportRequest {
        CustomReportRequest {
            report_type: "financial".to_string(),
            start_date: None,
            end_date: None,
            data_sources: vec![TransactionType::Sale, TransactionType::Expense],
            group_by,
            order_by,
            aggregates,
            output_format: OutputFormat::Json,
        }
    }

    fn service_for(transactions: Vec<TransactionRecord>) -> CustomReportService {
        CustomReportService::new(Arc::new(MockTransactionRepository::new(transactions)))
    }

    #[tokio::test]
    async fn test_groups_by_cartesian_field_combination() {
        let service = service_for(sample_ledger());
        let request = request(
            vec![GroupField::Type, GroupField::Month],
            Vec::new(),
            vec![
                AggregateSpec {
                    field: AggregateField::Amount,
                    kind: AggregateKind::Sum,
                },
                AggregateSpec {
                    field: AggregateField::Amount,
                    kind: AggregateKind::Count,
                },
            ],
        );

        let report = service.create_custom_report(&request).await.unwrap();
        assert_eq!(report.status, ReportStatus::Completed);
        assert_eq!(report.title, "Financial report");
        assert_eq!(report.columns, ["amount_sum", "amount_count"]);

        // Default emission order is ascending over the composite key.
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].keys, ["EXPENSE", "2023-01"]);
        assert_eq!(report.rows[1].keys, ["SALE", "2023-01"]);
        assert_eq!(report.rows[2].keys, ["SALE", "2023-02"]);

        let january_sales = &report.rows[1];
        assert_eq!(january_sales.values["amount_sum"], dec!(140));
        assert_eq!(january_sales.values["amount_count"], dec!(2));
    }

    #[tokio::test]
    async fn test_average_aggregate_guards_empty_groups() {
        let service = service_for(sample_ledger());
        let request = request(
            vec![GroupField::Product],
            Vec::new(),
            vec![AggregateSpec {
                field: AggregateField::Amount,
                kind: AggregateKind::Average,
            }],
        );

        let report = service.create_custom_report(&request).await.unwrap();
        let pine = report
            .rows
            .iter()
            .find(|row| row.keys == ["Pine"])
            .expect("Pine group");
        assert_eq!(pine.values["amount_average"], dec!(80));
        // The expense has no product, so it cannot join any group.
        assert_eq!(report.skipped, 1);
    }

    #[tokio::test]
    async fn test_order_by_aggregate_column_descending() {
        let service = service_for(sample_ledger());
        let request = request(
            vec![GroupField::Product],
            vec![OrderBy::parse("-amount_sum")],
            vec![AggregateSpec {
                field: AggregateField::Amount,
                kind: AggregateKind::Sum,
            }],
        );

        let report = service.create_custom_report(&request).await.unwrap();
        let keys: Vec<&str> = report
            .rows
            .iter()
            .map(|row| row.keys[0].as_str())
            .collect();
        assert_eq!(keys, ["Pine", "Fern"]);
    }

    #[tokio::test]
    async fn test_unknown_order_field_is_an_error() {
        let service = service_for(sample_ledger());
        let request = request(
            vec![GroupField::Product],
            vec![OrderBy {
                field: "quantity".to_string(),
                direction: SortDirection::Ascending,
            }],
            vec![AggregateSpec {
                field: AggregateField::Amount,
                kind: AggregateKind::Sum,
            }],
        );

        let err = service.create_custom_report(&request).await.unwrap_err();
        match err {
            Error::Report(ReportError::UnknownOrderField(field)) => assert_eq!(field, "quantity"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fail_policy_marks_report_failed() {
        let service = service_for(sample_ledger()).with_policy(UnmatchedPolicy::Fail);
        let request = request(
            vec![GroupField::Product],
            Vec::new(),
            vec![AggregateSpec {
                field: AggregateField::Amount,
                kind: AggregateKind::Sum,
            }],
        );

        let report = service.create_custom_report(&request).await.unwrap();
        assert_eq!(report.status, ReportStatus::Failed);
        assert!(report.rows.is_empty());
    }

    #[test]
    fn test_from_raw_parses_the_stringly_surface() {
        let aggregate_functions: HashMap<String, String> =
            [("amount".to_string(), "sum".to_string())].into();

        let request = CustomReportRequest::from_raw(
            "operational",
            NaiveDate::from_ymd_opt(2023, 1, 1),
            NaiveDate::from_ymd_opt(2023, 12, 31),
            &["Sales".to_string(), "Purchases".to_string()],
            &["type".to_string(), "month".to_string()],
            &["-amount_sum".to_string()],
            &aggregate_functions,
            "CSV",
        )
        .unwrap();

        assert_eq!(
            request.data_sources,
            [TransactionType::Sale, TransactionType::Purchase]
        );
        assert_eq!(request.group_by, [GroupField::Type, GroupField::Month]);
        assert_eq!(request.order_by[0].field, "amount_sum");
        assert_eq!(request.order_by[0].direction, SortDirection::Descending);
        assert_eq!(request.output_format, OutputFormat::Csv);
    }

    #[test]
    fn test_from_raw_rejects_unknown_values() {
        let aggregates: HashMap<String, String> =
            [("amount".to_string(), "sum".to_string())].into();

        let unknown_source = CustomReportRequest::from_raw(
            "financial",
            None,
            None,
            &["Payroll".to_string()],
            &[],
            &[],
            &aggregates,
            "JSON",
        );
        assert!(matches!(
            unknown_source,
            Err(ReportError::UnknownDataSource(_))
        ));

        let unknown_field = CustomReportRequest::from_raw(
            "financial",
            None,
            None,
            &["Sales".to_string()],
            &["region".to_string()],
            &[],
            &aggregates,
            "JSON",
        );
        assert!(matches!(
            unknown_field,
            Err(ReportError::UnknownGroupField(_))
        ));

        let bad_aggregates: HashMap<String, String> =
            [("amount".to_string(), "median".to_string())].into();
        let unknown_function = CustomReportRequest::from_raw(
            "financial",
            None,
            None,
            &["Sales".to_string()],
            &[],
            &[],
            &bad_aggregates,
            "JSON",
        );
        assert!(matches!(
            unknown_function,
            Err(ReportError::UnknownAggregateFunction(_))
        ));

        let unknown_format = CustomReportRequest::from_raw(
            "financial",
            None,
            None,
            &["Sales".to_string()],
            &[],
            &[],
            &aggregates,
            "XML",
        );
        assert!(matches!(
            unknown_format,
            Err(ReportError::UnknownOutputFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_csv_rendering() {
        let service = service_for(sample_ledger());
        let request = request(
            vec![GroupField::Product],
            vec![OrderBy::parse("-amount_sum")],
            vec![AggregateSpec {
                field: AggregateField::Amount,
                kind: AggregateKind::Sum,
            }],
        );

        let report = service.create_custom_report(&request).await.unwrap();
        let csv = service.render_report(&report, OutputFormat::Csv).unwrap();
        assert_eq!(csv, "product,amount_sum\nPine,160\nFern,40\n");
    }

    #[tokio::test]
    async fn test_json_rendering_round_trips() {
        let service = service_for(sample_ledger());
        let request = request(
            vec![GroupField::Type],
            Vec::new(),
            vec![AggregateSpec {
                field: AggregateField::Amount,
                kind: AggregateKind::Count,
            }],
        );

        let report = service.create_custom_report(&request).await.unwrap();
        let json = service.render_report(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "completed");
        assert_eq!(value["groupBy"][0], "type");
        assert_eq!(value["rows"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_report_is_deterministic_apart_from_identity() {
        let service = service_for(sample_ledger());
        let request = request(
            vec![GroupField::Type, GroupField::Month],
            Vec::new(),
            vec![AggregateSpec {
                field: AggregateField::Amount,
                kind: AggregateKind::Sum,
            }],
        );

        let first = service.create_custom_report(&request).await.unwrap();
        let second = service.create_custom_report(&request).await.unwrap();
        assert_eq!(first.rows, second.rows);
        assert_eq!(first.columns, second.columns);
        assert_eq!(first.skipped, second.skipped);
    }
}
