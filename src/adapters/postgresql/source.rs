//! PostgreSQL row source
//!
//! Builds one parameterized SELECT per export and maps the result into
//! domain records. Relation names come from validated configuration; every
//! filter value is bound as a parameter.

use super::client::PostgresClient;
use super::models::{customer_from_row, transaction_from_row};
use crate::adapters::traits::RowSource;
use crate::config::schema::SourceConfig;
use crate::domain::{ExportFilter, ExportKind, ExportScope, RekapError, Result, RowSet};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::time::Instant;
use tokio_postgres::types::ToSql;

/// Bound value of a generated query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Text(String),
    Timestamp(NaiveDateTime),
    BigInt(i64),
}

impl QueryParam {
    fn as_sql(&self) -> &(dyn ToSql + Sync) {
        match self {
            QueryParam::Text(v) => v,
            QueryParam::Timestamp(v) => v,
            QueryParam::BigInt(v) => v,
        }
    }
}

/// SQL text plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

/// Which database a query runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Database {
    Primary,
    Secondary,
}

/// Row source reading from the primary and optional secondary database
pub struct PostgresRowSource {
    primary: Arc<PostgresClient>,
    secondary: Option<Arc<PostgresClient>>,
    relations: SourceConfig,
}

impl PostgresRowSource {
    pub fn new(
        primary: Arc<PostgresClient>,
        secondary: Option<Arc<PostgresClient>>,
        relations: SourceConfig,
    ) -> Self {
        Self {
            primary,
            secondary,
            relations,
        }
    }

    /// Database that serves `kind` for `filter`
    ///
    /// Customer records live in the secondary database when
    /// `source.customers_from_secondary` is set and one is configured.
    pub fn database_for(&self, kind: ExportKind, filter: &ExportFilter) -> Database {
        let wants_secondary = filter.use_secondary
            || (kind == ExportKind::Customers
                && self.relations.customers_from_secondary
                && self.secondary.is_some());

        if wants_secondary {
            Database::Secondary
        } else {
            Database::Primary
        }
    }

    fn client(&self, database: Database) -> Result<&PostgresClient> {
        match database {
            Database::Primary => Ok(&self.primary),
            Database::Secondary => self.secondary.as_deref().ok_or_else(|| {
                RekapError::Configuration(
                    "secondary database requested but [postgresql.secondary] is not configured"
                        .to_string(),
                )
            }),
        }
    }
}

#[async_trait]
impl RowSource for PostgresRowSource {
    async fn fetch_rows(&self, kind: ExportKind, filter: &ExportFilter) -> Result<RowSet> {
        let database = self.database_for(kind, filter);
        let client = self.client(database)?;
        let query = build_query(kind, database, filter, &self.relations);

        let params: Vec<&(dyn ToSql + Sync)> =
            query.params.iter().map(QueryParam::as_sql).collect();

        let started = Instant::now();
        let rows = client.query(&query.sql, &params).await?;

        tracing::info!(
            kind = %kind,
            database = ?database,
            scope = ?filter.scope,
            rows = rows.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Rows fetched"
        );

        match kind {
            ExportKind::Transactions => rows
                .iter()
                .map(transaction_from_row)
                .collect::<Result<Vec<_>>>()
                .map(RowSet::Transactions),
            ExportKind::Customers => rows
                .iter()
                .map(customer_from_row)
                .collect::<Result<Vec<_>>>()
                .map(RowSet::Customers),
        }
    }

    async fn test_connection(&self) -> Result<()> {
        self.primary.test_connection().await?;
        if let Some(ref secondary) = self.secondary {
            secondary.test_connection().await?;
        }
        Ok(())
    }
}

/// Builds the SELECT for one export
///
/// The date window is always bound first, followed by the scope id and the
/// positive limit/offset values.
pub fn build_query(
    kind: ExportKind,
    database: Database,
    filter: &ExportFilter,
    relations: &SourceConfig,
) -> SelectQuery {
    let (from, alias) = match kind {
        ExportKind::Transactions => {
            let relation = match database {
                Database::Primary => &relations.transaction_relation,
                Database::Secondary => &relations.secondary_transaction_relation,
            };
            (transaction_from(relation, relations), "t")
        }
        ExportKind::Customers => (format!("{} c", relations.customer_relation), "c"),
    };

    let columns = match kind {
        ExportKind::Transactions => transaction_columns(database),
        ExportKind::Customers => customer_columns(),
    };

    let (start, end) = filter.dates.window();
    let mut params = vec![QueryParam::Timestamp(start), QueryParam::Timestamp(end)];
    let mut sql = format!(
        "SELECT {columns} FROM {from} WHERE {alias}.created_at BETWEEN $1::timestamp AND $2::timestamp"
    );

    if let Some(id) = filter.scope.id() {
        params.push(QueryParam::Text(id.to_string()));
        let predicate = scope_predicate(&filter.scope, alias, params.len(), relations);
        sql.push_str(&format!(" AND {predicate}"));
    }

    if let Some(pagination) = filter.pagination {
        if pagination.limit > 0 {
            params.push(QueryParam::BigInt(to_i64(pagination.limit)));
            sql.push_str(&format!(" LIMIT ${}", params.len()));
        }
        if pagination.offset > 0 {
            params.push(QueryParam::BigInt(to_i64(pagination.offset)));
            sql.push_str(&format!(" OFFSET ${}", params.len()));
        }
    }

    SelectQuery { sql, params }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Predicate matching the scope id bound at `$placeholder`
fn scope_predicate(
    scope: &ExportScope,
    alias: &str,
    placeholder: usize,
    relations: &SourceConfig,
) -> String {
    let column = match scope {
        ExportScope::Regional(_) => {
            return format!(
                "{alias}.unit_upi::text IN (SELECT id_unit_upi::text FROM {upi} \
                 WHERE id_regional::text = ${placeholder})",
                upi = relations.sub_region_relation,
            );
        }
        ExportScope::Region(_) | ExportScope::National => "unit_upi",
        ExportScope::Area(_) => "unit_ap",
        ExportScope::Unit(_) => "unit_up",
    };
    format!("{alias}.{column}::text = ${placeholder}")
}

fn transaction_from(relation: &str, relations: &SourceConfig) -> String {
    // unit_upi is stored as text on the transaction side
    format!(
        "{relation} t \
         JOIN {upi} upi ON t.unit_upi = upi.id_unit_upi::text \
         JOIN {ap} ap ON t.unit_ap = ap.id_unit_ap \
         JOIN {up} up ON t.unit_up = up.id_unit_up",
        upi = relations.sub_region_relation,
        ap = relations.area_relation,
        up = relations.unit_relation,
    )
}

fn transaction_columns(database: Database) -> String {
    let meter = match database {
        Database::Primary => "t.meter_number",
        Database::Secondary => "t.meter_id",
    };
    [
        "t.name::text AS name".to_string(),
        "t.consumer_name::text AS consumer_name".to_string(),
        "t.type::text AS type".to_string(),
        "t.amount::text AS amount".to_string(),
        "t.status_code::text AS status_code".to_string(),
        format!("{meter}::text AS meter_number"),
        "t.title::text AS title".to_string(),
        "t.payment_gateway::text AS payment_gateway".to_string(),
        "t.created_at::text AS created_at".to_string(),
        "t.token::text AS token".to_string(),
        "upi.id_unit_upi::text AS unit_upi".to_string(),
        "ap.id_unit_ap::text AS unit_ap".to_string(),
        "up.id_unit_up::text AS unit_up".to_string(),
        "upi.nama_unit_upi::text AS nama_unit_upi".to_string(),
        "ap.nama_unit_ap::text AS nama_unit_ap".to_string(),
        "up.nama_unit_up::text AS nama_unit_up".to_string(),
    ]
    .join(", ")
}

fn customer_columns() -> String {
    super::models::CUSTOMER_COLUMNS
        .iter()
        .map(|column| format!("c.{column}::text AS {column}"))
        .collect::<Vec<_>>()
        .join(", ")
}
