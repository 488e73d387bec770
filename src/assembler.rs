//! Low-level SQL clause assembly.
//!
//! [`QueryBuilder`] accumulates fragments into clause buckets that are
//! tagged by kind, then renders them once in fixed clause order (statement
//! keyword, projection, SET, FROM, WHERE). Clause order in the output is
//! therefore a structural invariant, not a property of the call sequence.
//!
//! The builder is purely mechanical: it knows nothing about schemas,
//! classifiers or payloads, and it never deduplicates or reorders what the
//! caller feeds it. Comma placement inside the projection list is the
//! caller's responsibility via [`QueryBuilder::append_comma`].
//!
//! Identifiers and literals are interpolated without escaping, mirroring the
//! trusted-metadata contract of the original system. This is a known
//! injection risk at this layer; execution against untrusted input must
//! parameterize instead.

use serde_json::Value;

/// Statement keyword the builder opens with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// `select …`
    Select,
    /// `insert into …`
    InsertInto,
    /// `update …`
    Update,
}

/// One fragment of the projection list.
#[derive(Debug, Clone)]
enum Segment {
    Item(String),
    Comma,
    OpenBrace,
    CloseBrace,
}

/// One source in the FROM list.
#[derive(Debug, Clone)]
enum FromSource {
    Table(String),
    Function { name: String, args: Vec<String> },
}

/// Render a payload value as a SQL literal.
///
/// Numbers stay bare; everything else is single-quoted. Arrays and objects
/// fall back to their JSON text, quoted. String content is interpolated
/// verbatim (no quote escaping), per the trusted-payload contract.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{s}'"),
        Value::Bool(b) => format!("'{b}'"),
        Value::Array(_) | Value::Object(_) => format!("'{value}'"),
    }
}

/// Accumulates clause fragments and renders them as one statement.
///
/// Created per compile call, mutated during that call, consumed by
/// [`QueryBuilder::build`]. Never reused.
#[derive(Debug)]
pub struct QueryBuilder {
    keyword: Keyword,
    targets: Vec<String>,
    projection: Vec<Segment>,
    sets: Vec<String>,
    from: Vec<FromSource>,
    predicates: Vec<String>,
    row_source: Option<String>,
}

impl QueryBuilder {
    /// Start an empty statement under the given keyword.
    pub fn new(keyword: Keyword) -> Self {
        Self {
            keyword,
            targets: Vec::new(),
            projection: Vec::new(),
            sets: Vec::new(),
            from: Vec::new(),
            predicates: Vec::new(),
            row_source: None,
        }
    }

    /// Mark the SELECT list as `*`.
    pub fn select_all_columns(&mut self) {
        self.projection.push(Segment::Item("*".to_string()));
    }

    /// Append a target table (the INSERT/UPDATE subject).
    ///
    /// Duplicates are accepted as-is; preventing them is the caller's job.
    pub fn add_table(&mut self, name: &str) {
        self.targets.push(name.to_string());
    }

    /// Append a table to the FROM list.
    pub fn add_from_table(&mut self, name: &str) {
        self.from.push(FromSource::Table(name.to_string()));
    }

    /// Use a call expression `name(p1, p2, …)` as a FROM source.
    ///
    /// Parameters are rendered as literals; used for stored-procedure-backed
    /// reads.
    pub fn add_from_function(&mut self, name: &str, params: &[Value]) {
        self.from.push(FromSource::Function {
            name: name.to_string(),
            args: params.iter().map(literal).collect(),
        });
    }

    /// Append `table.column` to the projection list.
    pub fn add_column(&mut self, table: &str, column: &str) {
        self.projection.push(Segment::Item(format!("{table}.{column}")));
    }

    /// Append a bare identifier or fragment to the projection list.
    pub fn append(&mut self, text: &str) {
        self.projection.push(Segment::Item(text.to_string()));
    }

    /// Append a rendered literal to the projection list.
    pub fn append_value(&mut self, value: &Value) {
        self.projection.push(Segment::Item(literal(value)));
    }

    /// Separate two projection items.
    ///
    /// The caller must only call this between items, never after the last
    /// one; no trailing-comma stripping happens at render time.
    pub fn append_comma(&mut self) {
        self.projection.push(Segment::Comma);
    }

    /// Open the parenthesized column list of an INSERT.
    pub fn open_brace(&mut self) {
        self.projection.push(Segment::OpenBrace);
    }

    /// Close the parenthesized column list of an INSERT.
    pub fn close_brace(&mut self) {
        self.projection.push(Segment::CloseBrace);
    }

    /// Append a `column = literal` SET assignment.
    pub fn add_filter_set(&mut self, column: &str, value: &Value) {
        self.sets.push(format!("{column} = {}", literal(value)));
    }

    /// Append a SET assignment resolved through a lookup table.
    ///
    /// Renders `column = (select key_column from table where table."name" =
    /// literal)`, deriving the stored key from the supplied display value.
    pub fn add_filter_set_column(
        &mut self,
        column: &str,
        table: &str,
        key_column: &str,
        display_column: &str,
        value: &Value,
    ) {
        self.sets.push(format!(
            "{column} = (select {key_column} from {table} where {table}.\"{display_column}\" = {})",
            literal(value)
        ));
    }

    /// Append an AND-joined `table."column" = literal` predicate.
    pub fn add_filter_where(&mut self, table: &str, column: &str, value: &Value) {
        self.predicates
            .push(format!("{table}.\"{column}\" = {}", literal(value)));
    }

    /// Append an AND-joined predicate with a pre-rendered right-hand side.
    ///
    /// Used for row identifiers that arrive as trusted, already-SQL text.
    pub fn add_filter_where_raw(&mut self, table: &str, column: &str, rhs: &str) {
        self.predicates.push(format!("{table}.\"{column}\" = {rhs}"));
    }

    /// Append an AND-joined join condition `a.col = b.col`.
    pub fn add_filter_where_table(
        &mut self,
        left_table: &str,
        left_column: &str,
        right_table: &str,
        right_column: &str,
    ) {
        self.predicates.push(format!(
            "{left_table}.{left_column} = {right_table}.{right_column}"
        ));
    }

    /// Attach a nested statement that produces the INSERT row.
    pub fn set_row_source(&mut self, sql: String) {
        self.row_source = Some(sql);
    }

    fn render_projection(&self) -> String {
        let mut out = String::new();
        for segment in &self.projection {
            match segment {
                Segment::Item(text) => out.push_str(text),
                Segment::Comma => out.push_str(", "),
                Segment::OpenBrace => out.push('('),
                Segment::CloseBrace => out.push(')'),
            }
        }
        out
    }

    fn render_from(&self) -> String {
        self.from
            .iter()
            .map(|source| match source {
                FromSource::Table(name) => name.clone(),
                FromSource::Function { name, args } => {
                    format!("{name}({})", args.join(", "))
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Finalize the statement.
    ///
    /// Clauses render in fixed order regardless of the order fragments were
    /// added. Consuming `self` makes the single-finalization lifecycle a
    /// compile-time guarantee.
    pub fn build(self) -> String {
        let mut out = String::new();

        match self.keyword {
            Keyword::Select => {
                out.push_str("select ");
                out.push_str(&self.render_projection());
            }
            Keyword::InsertInto => {
                out.push_str("insert into ");
                out.push_str(&self.targets.join(", "));
                if !self.projection.is_empty() {
                    out.push(' ');
                    out.push_str(&self.render_projection());
                }
            }
            Keyword::Update => {
                out.push_str("update ");
                out.push_str(&self.targets.join(", "));
                out.push_str(" set ");
                out.push_str(&self.sets.join(", "));
            }
        }

        if !self.from.is_empty() {
            out.push_str(" from ");
            out.push_str(&self.render_from());
        }

        if !self.predicates.is_empty() {
            out.push_str(" where ");
            out.push_str(&self.predicates.join(" and "));
        }

        if let Some(row_source) = &self.row_source {
            out.push(' ');
            out.push_str(row_source);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn literal_quotes_everything_but_numbers() {
        assert_eq!(literal(&json!("Ann")), "'Ann'");
        assert_eq!(literal(&json!(4)), "4");
        assert_eq!(literal(&json!(3.5)), "3.5");
        assert_eq!(literal(&json!(true)), "'true'");
        assert_eq!(literal(&json!(null)), "null");
        assert_eq!(literal(&json!(["a", 1])), "'[\"a\",1]'");
    }

    #[test]
    fn select_renders_projection_from_where_in_order() {
        let mut builder = QueryBuilder::new(Keyword::Select);
        // Predicates and FROM sources registered before the projection must
        // still land in their own clauses.
        builder.add_filter_where("c_university", "name", &json!("YSU"));
        builder.add_from_table("c_university");
        builder.append_value(&json!("Ann"));
        builder.append_comma();
        builder.add_column("c_university", "universityid");

        assert_eq!(
            builder.build(),
            "select 'Ann', c_university.universityid from c_university \
             where c_university.\"name\" = 'YSU'"
        );
    }

    #[test]
    fn select_without_from_sources_omits_the_clause() {
        let mut builder = QueryBuilder::new(Keyword::Select);
        builder.append_value(&json!("a"));
        builder.append_comma();
        builder.append_value(&json!(2));

        assert_eq!(builder.build(), "select 'a', 2");
    }

    #[test]
    fn select_all_columns_projects_a_star() {
        let mut builder = QueryBuilder::new(Keyword::Select);
        builder.select_all_columns();
        builder.add_from_table("student");

        assert_eq!(builder.build(), "select * from student");
    }

    #[test]
    fn from_functions_render_call_expressions() {
        let mut builder = QueryBuilder::new(Keyword::Select);
        builder.select_all_columns();
        builder.add_from_function("getcolumns", &[json!("student"), json!(1)]);

        assert_eq!(builder.build(), "select * from getcolumns('student', 1)");
    }

    #[test]
    fn insert_wraps_the_column_list_and_appends_the_row_source() {
        let mut builder = QueryBuilder::new(Keyword::InsertInto);
        builder.add_table("student");
        builder.open_brace();
        builder.append("firstname");
        builder.append_comma();
        builder.append("universityid");
        builder.close_brace();
        builder.set_row_source("select 'Ann', 7".to_string());

        assert_eq!(
            builder.build(),
            "insert into student (firstname, universityid) select 'Ann', 7"
        );
    }

    #[test]
    fn update_renders_set_assignments_then_the_filter() {
        let mut builder = QueryBuilder::new(Keyword::Update);
        builder.add_table("student");
        builder.add_filter_set("firstname", &json!("Ann"));
        builder.add_filter_set_column("universityid", "c_university", "universityid", "name", &json!("YSU"));
        builder.add_filter_where_raw("student", "studentid", "7");

        assert_eq!(
            builder.build(),
            "update student set firstname = 'Ann', \
             universityid = (select universityid from c_university where c_university.\"name\" = 'YSU') \
             where student.\"studentid\" = 7"
        );
    }

    #[test]
    fn update_from_sources_render_between_set_and_where() {
        // The alternative UPDATE … FROM modeling stays expressible.
        let mut builder = QueryBuilder::new(Keyword::Update);
        builder.add_table("student");
        builder.add_filter_set("universityid", &json!(3));
        builder.add_from_table("c_university");
        builder.add_filter_where("c_university", "name", &json!("YSU"));

        assert_eq!(
            builder.build(),
            "update student set universityid = 3 from c_university \
             where c_university.\"name\" = 'YSU'"
        );
    }

    #[test]
    fn join_conditions_render_unquoted_column_pairs() {
        let mut builder = QueryBuilder::new(Keyword::Select);
        builder.add_column("student", "firstname");
        builder.add_from_table("student");
        builder.add_from_table("c_university");
        builder.add_filter_where_table("student", "universityid", "c_university", "universityid");

        assert_eq!(
            builder.build(),
            "select student.firstname from student, c_university \
             where student.universityid = c_university.universityid"
        );
    }
}
