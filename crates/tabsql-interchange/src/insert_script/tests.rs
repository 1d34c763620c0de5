use super::*;
use indoc::indoc;
use tabsql_core::{GeneratorConfig, TabsqlError, UnknownReferencePolicy, Value};
use tabsql_schema::{parse_schema, resolve_table_order};

const SHOP_SCHEMA: &str = indoc! {"
    CREATE TABLE orders (
        id INT PRIMARY KEY,
        customer_id INT,
        total DECIMAL(10, 2),
        placed_at DATETIME,
        FOREIGN KEY (customer_id) REFERENCES customers(id)
    );

    CREATE TABLE customers (
        id INT PRIMARY KEY,
        name VARCHAR(100)
    );

    ALTER TABLE orders ADD CONSTRAINT uq_orders UNIQUE (customer_id, placed_at);
"};

fn text_row(values: &[&str]) -> Vec<Value> {
    values
        .iter()
        .map(|v| if v.is_empty() { Value::Null } else { Value::from(*v) })
        .collect()
}

fn script_for(writer: &InsertScriptWriter<'_>, order: &TableOrder) -> Result<String> {
    let mut buffer = Vec::new();
    writer.write(order, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn render(catalog: &SchemaCatalog, records: &RecordSet) -> Result<String> {
    let order = resolve_table_order(catalog, UnknownReferencePolicy::Ignore)?;
    let formatter = ValueFormatter::from_config(&GeneratorConfig::default());
    script_for(&InsertScriptWriter::new(catalog, records, &formatter), &order)
}

mod section_layout_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_exact_section_for_one_row() {
        let catalog =
            parse_schema("CREATE TABLE users (id INT, name VARCHAR(50), signup DATETIME);").unwrap();
        let mut records = RecordSet::new();
        records.insert(
            "users",
            TableRecords::new(vec!["name".into(), "signup".into()])
                .with_row(text_row(&["O'Brien", "2024-01-05 10:00:00"])),
        );

        let expected = concat!(
            "-----------------------------------------------------\n",
            "--- Inserting data into table users ---\n",
            "-----------------------------------------------------\n",
            "\n",
            "INSERT INTO `users` (`id`, `name`, `signup`) VALUES\n",
            "(1, 'O''Brien', '2024-01-05 10:00:00');\n",
            "\n",
            "---------------------------------------------------\n",
            "\n",
        );
        assert_eq!(render(&catalog, &records).unwrap(), expected);
    }

    #[test]
    fn table_without_records_gets_banner_only() {
        let catalog = parse_schema(indoc! {"
            CREATE TABLE a (id INT);
            CREATE TABLE b (id INT, a_id INT REFERENCES a(id));
        "})
        .unwrap();
        let mut records = RecordSet::new();
        records.insert(
            "b",
            TableRecords::new(vec!["a_id".into()]).with_row(text_row(&["1"])),
        );

        let expected = concat!(
            "-----------------------------------------------------\n",
            "--- Inserting data into table a ---\n",
            "-----------------------------------------------------\n",
            "\n",
            "-----------------------------------------------------\n",
            "--- Inserting data into table b ---\n",
            "-----------------------------------------------------\n",
            "\n",
            "INSERT INTO `b` (`id`, `a_id`) VALUES\n",
            "(1, 1);\n",
            "\n",
            "---------------------------------------------------\n",
            "\n",
        );
        assert_eq!(render(&catalog, &records).unwrap(), expected);
    }

    #[test]
    fn header_only_records_count_as_no_records() {
        let catalog = parse_schema("CREATE TABLE a (id INT, v TEXT);").unwrap();
        let mut records = RecordSet::new();
        records.insert("a", TableRecords::new(vec!["v".into()]));

        let script = render(&catalog, &records).unwrap();
        assert!(!script.contains("INSERT INTO"));
        assert!(script.contains("--- Inserting data into table a ---"));
    }

    #[test]
    fn identifiers_with_backticks_are_escaped() {
        let catalog = parse_schema("CREATE TABLE `od``d` (`we``ird` TEXT);").unwrap();
        let mut records = RecordSet::new();
        records.insert(
            "od`d",
            TableRecords::new(vec!["we`ird".into()]).with_row(text_row(&["x"])),
        );
        let script = render(&catalog, &records).unwrap();
        assert!(script.contains("INSERT INTO `od``d` (`we``ird`) VALUES\n('x');"), "{script}");
    }
}

mod ordering_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shop_records() -> RecordSet {
        let mut records = RecordSet::new();
        records.insert(
            "orders",
            TableRecords::new(vec![
                "id".into(),
                "customer_id".into(),
                "total".into(),
                "placed_at".into(),
            ])
            .with_row(text_row(&["100", "2", "19.90", "2024-03-01T08:30:00"]))
            .with_row(text_row(&["101", "1", "", ""])),
        );
        records.insert(
            "customers",
            TableRecords::new(vec!["id".into(), "name".into()])
                .with_row(text_row(&["9", "Ann"]))
                .with_row(text_row(&["9", "Bob"])),
        );
        records
    }

    #[test]
    fn referenced_tables_come_first_and_constraints_last() {
        let catalog = parse_schema(SHOP_SCHEMA).unwrap();
        let script = render(&catalog, &shop_records()).unwrap();

        let customers = script.find("INSERT INTO `customers`").unwrap();
        let orders = script.find("INSERT INTO `orders`").unwrap();
        let alter = script.find("ALTER TABLE orders ADD").unwrap();
        assert!(customers < orders);
        assert!(orders < alter);
        assert!(script.ends_with(
            "ALTER TABLE orders ADD CONSTRAINT uq_orders UNIQUE (customer_id, placed_at);\n"
        ));
    }

    #[test]
    fn surrogate_key_follows_row_position() {
        let catalog = parse_schema(SHOP_SCHEMA).unwrap();
        let script = render(&catalog, &shop_records()).unwrap();

        assert!(script.contains("(1, 'Ann'),\n(2, 'Bob');"), "{script}");
        assert!(
            script.contains("(1, 2, 19.9, '2024-03-01 08:30:00'),\n(2, 1, NULL, NULL);"),
            "{script}"
        );
    }

    #[test]
    fn summary_reports_what_was_written() {
        let catalog = parse_schema(indoc! {"
            CREATE TABLE customers (id INT, name TEXT);
            CREATE TABLE audit (id INT, event TEXT);
            ALTER TABLE customers ADD UNIQUE (name);
        "})
        .unwrap();
        let mut records = shop_records();
        records.insert("stray", TableRecords::new(vec!["x".into()]).with_row(text_row(&["1"])));

        let order = resolve_table_order(&catalog, UnknownReferencePolicy::Ignore).unwrap();
        let formatter = ValueFormatter::from_config(&GeneratorConfig::default());
        let mut out = Vec::new();
        let summary = InsertScriptWriter::new(&catalog, &records, &formatter)
            .write(&order, &mut out)
            .unwrap();

        assert_eq!(
            summary,
            ScriptSummary {
                tables_written: vec!["customers".to_string()],
                tables_without_records: vec!["audit".to_string()],
                tables_skipped: vec!["orders".to_string(), "stray".to_string()],
                rows_written: 2,
                constraints_written: 1,
            }
        );
        let script = String::from_utf8(out).unwrap();
        assert!(!script.contains("stray"));
        assert!(!script.contains("`orders`"));
    }
}

mod failure_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn coercion_failure_aborts_before_the_section_is_written() {
        let catalog = parse_schema(indoc! {"
            CREATE TABLE a (id INT, label TEXT);
            CREATE TABLE b (id INT, qty INT);
        "})
        .unwrap();
        let mut records = RecordSet::new();
        records.insert("a", TableRecords::new(vec!["label".into()]).with_row(text_row(&["ok"])));
        records.insert(
            "b",
            TableRecords::new(vec!["qty".into()])
                .with_row(text_row(&["3"]))
                .with_row(text_row(&["three"])),
        );

        let order = resolve_table_order(&catalog, UnknownReferencePolicy::Ignore).unwrap();
        let formatter = ValueFormatter::from_config(&GeneratorConfig::default());
        let mut out = Vec::new();
        let err = InsertScriptWriter::new(&catalog, &records, &formatter)
            .write(&order, &mut out)
            .unwrap_err();

        assert!(matches!(
            err,
            TabsqlError::TypeCoercion { ref table, row: 2, .. } if table == "b"
        ));
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("INSERT INTO `a`"));
        assert!(!written.contains("table b"));
    }

    #[test]
    fn disabled_surrogate_key_keeps_source_ids() {
        let catalog = parse_schema("CREATE TABLE a (id INT, v TEXT);").unwrap();
        let mut records = RecordSet::new();
        records.insert(
            "a",
            TableRecords::new(vec!["id".into(), "v".into()]).with_row(text_row(&["42", "x"])),
        );
        let order = resolve_table_order(&catalog, UnknownReferencePolicy::Ignore).unwrap();
        let formatter = ValueFormatter::new(None);
        let script =
            script_for(&InsertScriptWriter::new(&catalog, &records, &formatter), &order).unwrap();
        assert!(script.contains("(42, 'x');"));
    }
}

mod schema_less_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inferred_catalog_uses_record_headers_and_order() {
        let mut records = RecordSet::new();
        records.insert(
            "people",
            TableRecords::new(vec!["id".into(), "age".into(), "score".into(), "name".into()])
                .with_row(vec![
                    Value::from("x"),
                    Value::from("31"),
                    Value::from("1.5"),
                    Value::from("Ann"),
                ])
                .with_row(vec![Value::Null, Value::from("40"), Value::from("2"), Value::Null]),
        );
        let catalog = records.infer_catalog();
        let order = TableOrder::from_names(records.table_names());
        let formatter = ValueFormatter::from_config(&GeneratorConfig::default());

        let script =
            script_for(&InsertScriptWriter::new(&catalog, &records, &formatter), &order).unwrap();
        assert!(
            script.contains(indoc! {"
                INSERT INTO `people` (`id`, `age`, `score`, `name`) VALUES
                (1, 31, 1.5, 'Ann'),
                (2, 40, 2.0, NULL);
            "}),
            "{script}"
        );
    }
}
