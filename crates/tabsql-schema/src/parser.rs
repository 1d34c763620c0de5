//! Schema text parser
//!
//! Recognises a restricted DDL subset and nothing more:
//! - `CREATE TABLE <name> (<columns and constraints>)` for column types and foreign keys
//! - `ALTER TABLE <name> ADD <constraint>` for constraints applied after the data load
//!
//! Any other statement in the text is skipped.

use indexmap::IndexMap;
use serde::Serialize;
use std::iter::Peekable;
use std::str::CharIndices;
use tabsql_core::{ColumnType, Result, TabsqlError};

/// Parsed definition of one table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableSchema {
    name: String,
    columns: IndexMap<String, ColumnType>,
    references: Vec<String>,
}

impl TableSchema {
    /// Create an empty table definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a column. A repeated name keeps its original position and takes the new type.
    pub fn add_column(&mut self, name: impl Into<String>, column_type: ColumnType) {
        let name = name.into();
        if let Some(previous) = self.columns.insert(name.clone(), column_type) {
            tracing::warn!(
                table = %self.name,
                column = %name,
                previous = %previous,
                "column declared twice, keeping the last type"
            );
        }
    }

    /// Add an outgoing foreign-key target. Duplicates are ignored.
    pub fn add_reference(&mut self, table: impl Into<String>) {
        let table = table.into();
        if !self.references.contains(&table) {
            self.references.push(table);
        }
    }

    /// Builder form of [`TableSchema::add_column`]
    pub fn with_column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.add_column(name, column_type);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column name to type, in declaration order
    pub fn columns(&self) -> &IndexMap<String, ColumnType> {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column_type(&self, column: &str) -> Option<ColumnType> {
        self.columns.get(column).copied()
    }

    /// Tables this table holds foreign keys to, in declaration order
    pub fn references(&self) -> &[String] {
        &self.references
    }
}

/// A constraint re-applied after all rows are inserted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostConstraint {
    pub table: String,
    pub constraint: String,
}

impl PostConstraint {
    pub fn new(table: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            constraint: constraint.into(),
        }
    }

    /// Render as `ALTER TABLE <table> ADD <constraint>;`
    pub fn to_sql(&self) -> String {
        format!("ALTER TABLE {} ADD {};", self.table, self.constraint)
    }
}

/// Every table and post-load constraint found in one schema text
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaCatalog {
    tables: IndexMap<String, TableSchema>,
    constraints: Vec<PostConstraint>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse schema text into a catalog
    pub fn parse(text: &str) -> Result<Self> {
        parse_schema(text)
    }

    /// Add or replace a table definition. A replaced table keeps its discovery position.
    pub fn insert_table(&mut self, table: TableSchema) {
        let name = table.name().to_string();
        if self.tables.insert(name.clone(), table).is_some() {
            tracing::warn!(table = %name, "table defined more than once, keeping the last definition");
        }
    }

    pub fn add_constraint(&mut self, constraint: PostConstraint) {
        self.constraints.push(constraint);
    }

    pub fn get(&self, table: &str) -> Option<&TableSchema> {
        self.tables.get(table)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Tables in discovery order
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.values()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn constraints(&self) -> &[PostConstraint] {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Parse schema text into a [`SchemaCatalog`]
pub fn parse_schema(text: &str) -> Result<SchemaCatalog> {
    let tokens = tokenize(text)?;
    let mut catalog = SchemaCatalog::new();

    for statement in split_statements(&tokens)? {
        parse_statement(statement, text, &mut catalog)?;
    }

    tracing::debug!(
        tables = catalog.len(),
        constraints = catalog.constraints().len(),
        "parsed schema"
    );
    Ok(catalog)
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident { quoted: bool },
    Number,
    Str,
    Symbol(char),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    /// Identifier or literal content with quotes removed
    text: String,
    /// Byte span in the source, quotes included
    start: usize,
    end: usize,
    line: usize,
}

impl Token {
    fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == (TokenKind::Ident { quoted: false }) && self.text.eq_ignore_ascii_case(keyword)
    }

    fn is_ident(&self) -> bool {
        matches!(self.kind, TokenKind::Ident { .. })
    }

    fn is_symbol(&self, c: char) -> bool {
        self.kind == TokenKind::Symbol(c)
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> TabsqlError {
    TabsqlError::Parse {
        line,
        message: message.into(),
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut line = 1;

    while let Some((start, c)) = chars.next() {
        let token_line = line;
        match c {
            '\n' => line += 1,
            c if c.is_whitespace() => {}
            '-' if matches!(chars.peek(), Some(&(_, '-'))) => {
                while let Some(&(_, next)) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '/' if matches!(chars.peek(), Some(&(_, '*'))) => {
                chars.next();
                let mut previous = '\0';
                let mut closed = false;
                for (_, next) in chars.by_ref() {
                    if next == '\n' {
                        line += 1;
                    }
                    if previous == '*' && next == '/' {
                        closed = true;
                        break;
                    }
                    previous = next;
                }
                if !closed {
                    return Err(parse_error(token_line, "unterminated block comment"));
                }
            }
            '\'' => {
                let (text, end) = read_quoted(&mut chars, '\'', &mut line)
                    .ok_or_else(|| parse_error(token_line, "unterminated string literal"))?;
                tokens.push(Token {
                    kind: TokenKind::Str,
                    text,
                    start,
                    end,
                    line: token_line,
                });
            }
            '"' | '`' | '[' => {
                let close = if c == '[' { ']' } else { c };
                let (text, end) = read_quoted(&mut chars, close, &mut line)
                    .ok_or_else(|| parse_error(token_line, "unterminated quoted identifier"))?;
                tokens.push(Token {
                    kind: TokenKind::Ident { quoted: true },
                    text,
                    start,
                    end,
                    line: token_line,
                });
            }
            c if c.is_alphabetic() || c == '_' => {
                let end = read_word(&mut chars, start + c.len_utf8(), |n| {
                    n.is_alphanumeric() || n == '_' || n == '$'
                });
                tokens.push(Token {
                    kind: TokenKind::Ident { quoted: false },
                    text: text[start..end].to_string(),
                    start,
                    end,
                    line: token_line,
                });
            }
            c if c.is_ascii_digit() => {
                let end = read_word(&mut chars, start + c.len_utf8(), |n| {
                    n.is_ascii_alphanumeric() || n == '.'
                });
                tokens.push(Token {
                    kind: TokenKind::Number,
                    text: text[start..end].to_string(),
                    start,
                    end,
                    line: token_line,
                });
            }
            other => tokens.push(Token {
                kind: TokenKind::Symbol(other),
                text: other.to_string(),
                start,
                end: start + other.len_utf8(),
                line: token_line,
            }),
        }
    }

    Ok(tokens)
}

/// Consume a quoted run up to `close`. A doubled closing quote is an escaped quote.
/// Returns the unquoted content and the byte offset just past the closing quote.
fn read_quoted(
    chars: &mut Peekable<CharIndices<'_>>,
    close: char,
    line: &mut usize,
) -> Option<(String, usize)> {
    let mut value = String::new();
    while let Some((idx, c)) = chars.next() {
        if c == close {
            if matches!(chars.peek(), Some(&(_, next)) if next == close) {
                chars.next();
                value.push(close);
                continue;
            }
            return Some((value, idx + c.len_utf8()));
        }
        if c == '\n' {
            *line += 1;
        }
        value.push(c);
    }
    None
}

fn read_word(
    chars: &mut Peekable<CharIndices<'_>>,
    mut end: usize,
    accept: impl Fn(char) -> bool,
) -> usize {
    while let Some(&(idx, next)) = chars.peek() {
        if !accept(next) {
            break;
        }
        end = idx + next.len_utf8();
        chars.next();
    }
    end
}

/// Split the token stream at top-level semicolons
fn split_statements(tokens: &[Token]) -> Result<Vec<&[Token]>> {
    let mut statements = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;

    for (idx, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Symbol('(') => depth += 1,
            TokenKind::Symbol(')') => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| parse_error(token.line, "unbalanced ')'"))?;
            }
            TokenKind::Symbol(';') if depth == 0 => {
                if idx > start {
                    statements.push(&tokens[start..idx]);
                }
                start = idx + 1;
            }
            _ => {}
        }
    }

    if depth > 0 {
        let line = tokens.get(start).map(|t| t.line).unwrap_or(1);
        return Err(parse_error(line, "unclosed '(' in statement"));
    }
    if start < tokens.len() {
        statements.push(&tokens[start..]);
    }

    Ok(statements)
}

// ============================================================================
// Statements
// ============================================================================

struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn line(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_keyword(keyword)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_symbol(&mut self, c: char) -> bool {
        if self.peek().is_some_and(|t| t.is_symbol(c)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// `ident ('.' ident)*`, quotes stripped, segments joined with '.'
    fn qualified_name(&mut self) -> Option<String> {
        let first = self.peek().filter(|t| t.is_ident())?;
        self.pos += 1;
        let mut name = first.text.clone();
        while self.peek().is_some_and(|t| t.is_symbol('.')) {
            let segment = self.tokens.get(self.pos + 1).filter(|t| t.is_ident())?;
            name.push('.');
            name.push_str(&segment.text);
            self.pos += 2;
        }
        Some(name)
    }

    /// Tokens between the '(' at the cursor and its matching ')'
    fn parenthesized(&mut self) -> Option<&'a [Token]> {
        if !self.peek()?.is_symbol('(') {
            return None;
        }
        let open = self.pos;
        let mut depth = 0usize;
        for (offset, token) in self.tokens[open..].iter().enumerate() {
            if token.is_symbol('(') {
                depth += 1;
            } else if token.is_symbol(')') {
                depth -= 1;
                if depth == 0 {
                    let close = open + offset;
                    self.pos = close + 1;
                    return Some(&self.tokens[open + 1..close]);
                }
            }
        }
        None
    }

    fn rest(&self) -> &'a [Token] {
        &self.tokens[self.pos.min(self.tokens.len())..]
    }
}

fn parse_statement(tokens: &[Token], source: &str, catalog: &mut SchemaCatalog) -> Result<()> {
    let mut cursor = Cursor::new(tokens);

    if cursor.eat_keyword("CREATE") {
        if cursor.eat_keyword("OR") && !cursor.eat_keyword("REPLACE") {
            return Err(parse_error(cursor.line(), "expected OR REPLACE"));
        }
        while ["TEMPORARY", "TEMP", "GLOBAL", "LOCAL", "UNLOGGED"]
            .iter()
            .any(|kw| cursor.eat_keyword(kw))
        {}
        if !cursor.eat_keyword("TABLE") {
            if let Some(kind) = cursor.peek() {
                tracing::debug!(line = kind.line, object = %kind.text, "skipping CREATE statement");
            }
            return Ok(());
        }
        if cursor.eat_keyword("IF") && !(cursor.eat_keyword("NOT") && cursor.eat_keyword("EXISTS")) {
            return Err(parse_error(cursor.line(), "expected IF NOT EXISTS"));
        }
        let name = cursor
            .qualified_name()
            .ok_or_else(|| parse_error(cursor.line(), "expected table name after CREATE TABLE"))?;
        let Some(body) = cursor.parenthesized() else {
            tracing::debug!(table = %name, "CREATE TABLE without a column list, skipping");
            return Ok(());
        };
        catalog.insert_table(parse_table_body(name, body));
    } else if cursor.eat_keyword("ALTER") && cursor.eat_keyword("TABLE") {
        cursor.eat_keyword("ONLY");
        if cursor.eat_keyword("IF") && !cursor.eat_keyword("EXISTS") {
            return Err(parse_error(cursor.line(), "expected IF EXISTS"));
        }
        let name = cursor
            .qualified_name()
            .ok_or_else(|| parse_error(cursor.line(), "expected table name after ALTER TABLE"))?;
        if cursor.eat_keyword("ADD") {
            let constraint = render_tokens(cursor.rest(), source);
            if constraint.is_empty() {
                return Err(parse_error(cursor.line(), "empty ALTER TABLE ... ADD clause"));
            }
            tracing::trace!(table = %name, constraint = %constraint, "collected post-load constraint");
            catalog.add_constraint(PostConstraint::new(name, constraint));
        }
    } else if let Some(first) = tokens.first() {
        tracing::trace!(line = first.line, keyword = %first.text, "skipping statement");
    }

    Ok(())
}

/// Type names that take a parenthesized argument list, e.g. `VARCHAR(20)`
const PARAMETERIZED_TYPES: &[&str] = &[
    "CHAR", "CHARACTER", "NCHAR", "VARCHAR", "NVARCHAR", "VARCHAR2", "BINARY", "VARBINARY",
    "BIT", "INT", "INTEGER", "BIGINT", "SMALLINT", "TINYINT", "MEDIUMINT", "FLOAT", "DOUBLE",
    "REAL", "DECIMAL", "DEC", "NUMERIC", "FIXED", "NUMBER", "DATETIME", "TIMESTAMP", "TIME",
    "ENUM", "SET",
];

/// Whether a table element is a constraint or index clause rather than a column.
///
/// Constraint keywords are also valid unquoted column names (`key VARCHAR(20)`),
/// so each keyword is only taken as a clause when the tokens after it say so.
fn is_table_constraint(definition: &[Token]) -> bool {
    let Some(first) = definition.first() else {
        return false;
    };
    let second = definition.get(1);
    let third = definition.get(2);
    let second_is = |kw: &str| second.is_some_and(|t| t.is_keyword(kw));
    let second_opens = second.is_some_and(|t| t.is_symbol('('));

    if first.is_keyword("PRIMARY") || first.is_keyword("FOREIGN") {
        second_is("KEY")
    } else if first.is_keyword("UNIQUE") || first.is_keyword("CHECK") {
        second_opens || second_is("KEY") || second_is("INDEX")
    } else if first.is_keyword("KEY") || first.is_keyword("INDEX") {
        second_opens
            || (second.is_some_and(|t| {
                t.is_ident() && !PARAMETERIZED_TYPES.iter().any(|ty| t.is_keyword(ty))
            }) && third.is_some_and(|t| t.is_symbol('(')))
    } else if first.is_keyword("FULLTEXT") || first.is_keyword("SPATIAL") {
        second_opens || second_is("KEY") || second_is("INDEX")
    } else if first.is_keyword("EXCLUDE") {
        second_opens || second_is("USING")
    } else if first.is_keyword("CONSTRAINT") {
        ["PRIMARY", "FOREIGN", "UNIQUE", "CHECK", "EXCLUDE"]
            .iter()
            .any(|kw| second_is(kw) || third.is_some_and(|t| t.is_keyword(kw)))
    } else {
        false
    }
}

fn parse_table_body(name: String, body: &[Token]) -> TableSchema {
    let mut table = TableSchema::new(name);

    for definition in split_definitions(body) {
        let Some(first) = definition.first() else {
            continue;
        };

        if is_table_constraint(definition) {
            if let Some(target) = references_target(definition) {
                table.add_reference(target);
            }
            continue;
        }

        match definition {
            [column, type_token, ..] if column.is_ident() && type_token.is_ident() => {
                table.add_column(
                    column.text.clone(),
                    ColumnType::from_type_token(&type_token.text),
                );
                if let Some(target) = references_target(&definition[2..]) {
                    table.add_reference(target);
                }
            }
            _ => {
                tracing::trace!(table = %table.name(), line = first.line, "ignoring table element");
            }
        }
    }

    table
}

/// Split a column list at commas that are not nested in parentheses
fn split_definitions(body: &[Token]) -> Vec<&[Token]> {
    let mut definitions = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, token) in body.iter().enumerate() {
        if token.is_symbol('(') {
            depth += 1;
        } else if token.is_symbol(')') {
            depth = depth.saturating_sub(1);
        } else if token.is_symbol(',') && depth == 0 {
            definitions.push(&body[start..idx]);
            start = idx + 1;
        }
    }
    definitions.push(&body[start..]);

    definitions
}

/// The table named after `REFERENCES`, if the element has one
fn references_target(tokens: &[Token]) -> Option<String> {
    let position = tokens.iter().position(|t| t.is_keyword("REFERENCES"))?;
    Cursor::new(&tokens[position + 1..]).qualified_name()
}

/// Rebuild source text for a token run, collapsing inter-token whitespace and comments
fn render_tokens(tokens: &[Token], source: &str) -> String {
    let mut out = String::new();
    let mut previous_end = None;
    for token in tokens {
        if previous_end.is_some_and(|end| end < token.start) {
            out.push(' ');
        }
        out.push_str(&source[token.start..token.end]);
        previous_end = Some(token.end);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_columns_in_declaration_order() {
        let catalog = parse_schema(indoc! {"
            CREATE TABLE users (
                id INT PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                balance DECIMAL(10, 2),
                signup DATETIME
            );
        "})
        .unwrap();

        let users = catalog.get("users").unwrap();
        let columns: Vec<(&str, ColumnType)> = users
            .columns()
            .iter()
            .map(|(name, ty)| (name.as_str(), *ty))
            .collect();
        assert_eq!(
            columns,
            vec![
                ("id", ColumnType::Integer),
                ("name", ColumnType::Text),
                ("balance", ColumnType::Float),
                ("signup", ColumnType::DateTime),
            ]
        );
        assert!(users.references().is_empty());
    }

    #[test]
    fn collects_table_level_foreign_keys() {
        let catalog = parse_schema(indoc! {"
            CREATE TABLE orders (
                id INT,
                customer_id INT,
                product_id INT,
                PRIMARY KEY (id),
                FOREIGN KEY (customer_id) REFERENCES customers(id),
                CONSTRAINT fk_product FOREIGN KEY (product_id) REFERENCES products (id)
            );
        "})
        .unwrap();

        let orders = catalog.get("orders").unwrap();
        assert_eq!(orders.references(), ["customers", "products"]);
        assert_eq!(
            orders.column_names().collect::<Vec<_>>(),
            vec!["id", "customer_id", "product_id"]
        );
    }

    #[test]
    fn collects_inline_references() {
        let catalog = parse_schema(
            "CREATE TABLE orders (id INT, customer_id INT REFERENCES customers(id));",
        )
        .unwrap();
        assert_eq!(catalog.get("orders").unwrap().references(), ["customers"]);
    }

    #[test]
    fn duplicate_references_are_recorded_once() {
        let catalog = parse_schema(indoc! {"
            CREATE TABLE transfers (
                from_account INT,
                to_account INT,
                FOREIGN KEY (from_account) REFERENCES accounts(id),
                FOREIGN KEY (to_account) REFERENCES accounts(id)
            );
        "})
        .unwrap();
        assert_eq!(catalog.get("transfers").unwrap().references(), ["accounts"]);
    }

    #[test]
    fn strips_identifier_quotes_and_if_not_exists() {
        let catalog = parse_schema(indoc! {r#"
            CREATE TABLE IF NOT EXISTS `order items` (
                `order id` INT,
                "qty" SMALLINT,
                [note] TEXT
            );
        "#})
        .unwrap();
        let table = catalog.get("order items").unwrap();
        assert_eq!(table.column_type("order id"), Some(ColumnType::Integer));
        assert_eq!(table.column_type("qty"), Some(ColumnType::Integer));
        assert_eq!(table.column_type("note"), Some(ColumnType::Text));
    }

    #[test]
    fn tolerates_comments_blank_lines_and_other_statements() {
        let catalog = parse_schema(indoc! {"
            -- customers first
            DROP TABLE IF EXISTS customers;


            /* multi
               line */
            CREATE TABLE customers (
                id INT, -- surrogate
                name TEXT DEFAULT 'n/a; (none)'
            );
            CREATE INDEX idx_name ON customers (name);
            INSERT INTO customers VALUES (1, 'x');
            CREATE TABLE orders (id INT, customer_id INT,
                FOREIGN KEY (customer_id) REFERENCES customers(id))
        "})
        .unwrap();

        assert_eq!(catalog.table_names().collect::<Vec<_>>(), vec!["customers", "orders"]);
        assert_eq!(
            catalog.get("customers").unwrap().column_names().collect::<Vec<_>>(),
            vec!["id", "name"]
        );
    }

    #[test]
    fn collects_alter_table_add_statements() {
        let catalog = parse_schema(indoc! {"
            CREATE TABLE a (id INT);
            ALTER TABLE a ADD CONSTRAINT fk_a_b
                FOREIGN KEY (b_id)   REFERENCES b(id);
            ALTER TABLE a DROP COLUMN old;
        "})
        .unwrap();

        assert_eq!(
            catalog.constraints(),
            [PostConstraint::new(
                "a",
                "CONSTRAINT fk_a_b FOREIGN KEY (b_id) REFERENCES b(id)"
            )]
        );
        assert_eq!(
            catalog.constraints()[0].to_sql(),
            "ALTER TABLE a ADD CONSTRAINT fk_a_b FOREIGN KEY (b_id) REFERENCES b(id);"
        );
        // Deferred constraints do not add ordering edges.
        assert!(catalog.get("a").unwrap().references().is_empty());
    }

    #[test]
    fn constraint_keywords_are_valid_column_names() {
        let catalog = parse_schema(indoc! {"
            CREATE TABLE settings (
                id INT,
                key VARCHAR(20),
                index INT,
                unique TEXT,
                check DECIMAL(4, 1),
                value TEXT,
                KEY idx_key (key),
                INDEX (value),
                UNIQUE KEY uq_key (key),
                CHECK (check > 0)
            );
        "})
        .unwrap();

        let settings = catalog.get("settings").unwrap();
        assert_eq!(
            settings.column_names().collect::<Vec<_>>(),
            vec!["id", "key", "index", "unique", "check", "value"]
        );
        assert_eq!(settings.column_type("key"), Some(ColumnType::Text));
        assert_eq!(settings.column_type("index"), Some(ColumnType::Integer));
        assert_eq!(settings.column_type("check"), Some(ColumnType::Float));
    }

    #[test]
    fn create_or_replace_table_is_parsed() {
        let catalog = parse_schema(indoc! {"
            CREATE OR REPLACE TABLE t (id INT, parent_id INT REFERENCES p(id));
            CREATE OR REPLACE VIEW v AS SELECT 1;
        "})
        .unwrap();
        assert_eq!(catalog.table_names().collect::<Vec<_>>(), vec!["t"]);
        assert_eq!(catalog.get("t").unwrap().references(), ["p"]);
    }

    #[test]
    fn empty_text_yields_empty_catalog() {
        let catalog = parse_schema("  \n\n ").unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.constraints().is_empty());
    }

    #[test]
    fn reports_unbalanced_parentheses_with_line() {
        let err = parse_schema("CREATE TABLE t (\n  id INT,\n  name TEXT\n;").unwrap_err();
        match err {
            TabsqlError::Parse { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reports_unterminated_string() {
        let err = parse_schema("CREATE TABLE t (\n name TEXT DEFAULT 'oops\n);").unwrap_err();
        assert!(matches!(err, TabsqlError::Parse { line: 2, .. }));
    }

    #[test]
    fn redefined_table_keeps_discovery_position() {
        let catalog = parse_schema(indoc! {"
            CREATE TABLE a (x INT);
            CREATE TABLE b (y INT);
            CREATE TABLE a (z TEXT);
        "})
        .unwrap();
        assert_eq!(catalog.table_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(catalog.get("a").unwrap().column_type("z"), Some(ColumnType::Text));
        assert_eq!(catalog.get("a").unwrap().column_type("x"), None);
    }
}
