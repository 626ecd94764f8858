//! # Customer Repository
//!
//! Database operations for customers. Phone numbers are stored in their
//! bare 10-digit form so lookups match however the number was typed.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::optional_timestamp;
use stitch_core::validation::{normalize_phone, validate_customer_name};
use stitch_core::{Customer, CustomerMeasurements};

const CUSTOMER_COLUMNS: &str = "id, name, phone, email, measurements, created_at";

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: String,
    name: String,
    phone: String,
    email: Option<String>,
    measurements: Option<String>,
    created_at: Option<i64>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = DbError;

    fn try_from(row: CustomerRow) -> DbResult<Self> {
        let measurements = row
            .measurements
            .as_deref()
            .map(serde_json::from_str::<CustomerMeasurements>)
            .transpose()
            .map_err(|e| DbError::decode(format!("customer {} measurements: {}", row.id, e)))?;

        Ok(Customer {
            name: row.name,
            phone: row.phone,
            email: row.email,
            measurements,
            created_at: optional_timestamp("created_at", row.created_at)?,
            id: row.id,
        })
    }
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {} FROM customers WHERE id = ?1", CUSTOMER_COLUMNS);
        let row: Option<CustomerRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Customer::try_from).transpose()
    }

    /// Inserts a new customer.
    ///
    /// The name and phone are validated first and the phone is stored
    /// normalized. Bad input comes back as `Validation` and nothing is written.
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        validate_customer_name(&customer.name)
            .map_err(|e| DbError::validation(e.to_string()))?;
        let phone = normalize_phone(&customer.phone)
            .map_err(|e| DbError::validation(e.to_string()))?;

        debug!(id = %customer.id, "Inserting customer");

        let measurements = customer
            .measurements
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, email, measurements, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.id)
        .bind(customer.name.trim())
        .bind(phone)
        .bind(&customer.email)
        .bind(measurements)
        .bind(customer.created_at.map(|d| d.timestamp()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Finds customers by mobile number, newest first.
    ///
    /// Returns an empty list when `phone` is not a valid mobile number.
    pub async fn find_by_phone(&self, phone: &str) -> DbResult<Vec<Customer>> {
        let Ok(phone) = normalize_phone(phone) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "SELECT {} FROM customers WHERE phone = ?1 ORDER BY created_at DESC",
            CUSTOMER_COLUMNS
        );
        let rows: Vec<CustomerRow> = sqlx::query_as(&sql)
            .bind(phone)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    /// Customers by name.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Customer>> {
        let sql = format!(
            "SELECT {} FROM customers ORDER BY name COLLATE NOCASE LIMIT ?1",
            CUSTOMER_COLUMNS
        );
        let rows: Vec<CustomerRow> = sqlx::query_as(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    /// Number of customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::{TimeZone, Utc};
    use stitch_core::Measurements;

    fn customer(id: &str, name: &str, phone: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            email: None,
            measurements: None,
            created_at: Some(Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_insert_normalizes_phone() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let mut asha = customer("c1", "Asha Kulkarni", "+91 98220-12345");
        asha.measurements = Some(CustomerMeasurements::Structured(
            Measurements::new().with("blouseLength", "15"),
        ));
        repo.insert(&asha).await.unwrap();

        let loaded = repo.get_by_id("c1").await.unwrap().unwrap();
        assert_eq!(loaded.phone, "9822012345");
        assert_eq!(loaded.measurements, asha.measurements);
        assert_eq!(loaded.created_at, asha.created_at);

        let found = repo.find_by_phone("09822012345").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "c1");
        assert!(repo.find_by_phone("12").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_rejects_bad_input() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let err = repo.insert(&customer("c1", "", "9822012345")).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let err = repo.insert(&customer("c2", "Ravi", "12345")).await.unwrap_err();
        match err {
            DbError::Validation(msg) => assert!(msg.starts_with("phone"), "{msg}"),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_free_form_measurements_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let mut ravi = customer("c2", "ravi Menon", "9812345678");
        ravi.measurements = Some(CustomerMeasurements::FreeForm(
            "chest 40, waist 34".to_string(),
        ));
        repo.insert(&ravi).await.unwrap();
        repo.insert(&customer("c1", "Asha", "9822012345")).await.unwrap();

        let all = repo.list(10).await.unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Asha", "ravi Menon"]);
        assert!(matches!(
            all[1].measurements,
            Some(CustomerMeasurements::FreeForm(_))
        ));
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }
}
