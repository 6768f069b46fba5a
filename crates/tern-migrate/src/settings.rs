//! The application settings row populated by the seed loader.

use chrono::NaiveDateTime;
use tern_db::Connection;

/// Base name of the settings table; the configured prefix is prepended.
pub const SETTINGS_TABLE: &str = "settings";

/// Primary key of the seeded default row.
pub const DEFAULT_SETTINGS_ID: i32 = 1;

/// One row of the settings table.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub id: i32,
    pub currency: String,
    pub tax_fee: f64,
    pub reminder_tax_profile_expired: i32,
    pub valid_account_expired: i32,
    /// One of `days`, `months`, `years`
    pub account_expired_period: String,
    pub logo_image: String,
    pub favicon: String,
    pub password_length: i32,
    pub password_invalid: i32,
    pub password_expiration_count: i32,
    /// One of `days`, `months`, `years`
    pub password_expired_period: String,
    pub expiration_reminder_day: i32,
    pub password_cycle: i32,
    pub complexity_numeric: bool,
    pub complexity_alphabet: bool,
    pub complexity_uppercase: bool,
    pub complexity_symbol: bool,
    pub updated_at: Option<NaiveDateTime>,
}

impl Settings {
    /// Baseline settings whose logo and favicon both point at `image`.
    pub fn defaults(image: &str) -> Self {
        Self {
            id: DEFAULT_SETTINGS_ID,
            currency: "IDR".to_string(),
            tax_fee: 1.0,
            reminder_tax_profile_expired: 1,
            valid_account_expired: 30,
            account_expired_period: "days".to_string(),
            logo_image: image.to_string(),
            favicon: image.to_string(),
            password_length: 8,
            password_invalid: 3,
            password_expiration_count: 12,
            password_expired_period: "days".to_string(),
            expiration_reminder_day: 1,
            password_cycle: 0,
            complexity_numeric: true,
            complexity_alphabet: false,
            complexity_uppercase: false,
            complexity_symbol: false,
            updated_at: None,
        }
    }

    /// Insert this row into `table`.
    pub fn insert(&self, conn: &Connection, table: &str) -> duckdb::Result<usize> {
        conn.execute(
            &format!(
                "INSERT INTO {table} (
                     id, currency, tax_fee, reminder_tax_profile_expired, valid_account_expired,
                     account_expired_period, logo_image, favicon, password_length,
                     password_invalid, password_expiration_count, password_expired_period,
                     expiration_reminder_day, password_cycle, complexity_numeric,
                     complexity_alphabet, complexity_uppercase, complexity_symbol, updated_at
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            ),
            duckdb::params![
                self.id,
                self.currency,
                self.tax_fee,
                self.reminder_tax_profile_expired,
                self.valid_account_expired,
                self.account_expired_period,
                self.logo_image,
                self.favicon,
                self.password_length,
                self.password_invalid,
                self.password_expiration_count,
                self.password_expired_period,
                self.expiration_reminder_day,
                self.password_cycle,
                self.complexity_numeric,
                self.complexity_alphabet,
                self.complexity_uppercase,
                self.complexity_symbol,
                self.updated_at.map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string()),
            ],
        )
    }

    /// Read the row with `id` from `table`, if present.
    #[cfg(test)]
    pub(crate) fn load(conn: &Connection, table: &str, id: i32) -> duckdb::Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, currency, tax_fee, reminder_tax_profile_expired, valid_account_expired,
                    account_expired_period, logo_image, favicon, password_length,
                    password_invalid, password_expiration_count, password_expired_period,
                    expiration_reminder_day, password_cycle, complexity_numeric,
                    complexity_alphabet, complexity_uppercase, complexity_symbol,
                    CAST(updated_at AS VARCHAR)
             FROM {table} WHERE id = ?"
        ))?;
        let mut rows = stmt.query_map(duckdb::params![id], |row| {
            let updated_at: Option<String> = row.get(18)?;
            Ok(Settings {
                id: row.get(0)?,
                currency: row.get(1)?,
                tax_fee: row.get(2)?,
                reminder_tax_profile_expired: row.get(3)?,
                valid_account_expired: row.get(4)?,
                account_expired_period: row.get(5)?,
                logo_image: row.get(6)?,
                favicon: row.get(7)?,
                password_length: row.get(8)?,
                password_invalid: row.get(9)?,
                password_expiration_count: row.get(10)?,
                password_expired_period: row.get(11)?,
                expiration_reminder_day: row.get(12)?,
                password_cycle: row.get(13)?,
                complexity_numeric: row.get(14)?,
                complexity_alphabet: row.get(15)?,
                complexity_uppercase: row.get(16)?,
                complexity_symbol: row.get(17)?,
                updated_at: updated_at
                    .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok()),
            })
        })?;
        rows.next().transpose()
    }
}

/// DDL for the settings table, with column defaults matching [`Settings::defaults`].
pub fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
             id INTEGER PRIMARY KEY,
             currency VARCHAR,
             tax_fee DOUBLE,
             reminder_tax_profile_expired INTEGER,
             valid_account_expired INTEGER,
             account_expired_period VARCHAR DEFAULT 'days'
                 CHECK (account_expired_period IN ('days', 'months', 'years')),
             logo_image VARCHAR,
             favicon VARCHAR,
             password_length INTEGER,
             password_invalid INTEGER DEFAULT 3,
             password_expiration_count INTEGER,
             password_expired_period VARCHAR DEFAULT 'days'
                 CHECK (password_expired_period IN ('days', 'months', 'years')),
             expiration_reminder_day INTEGER,
             password_cycle INTEGER DEFAULT 0,
             complexity_numeric BOOLEAN DEFAULT false,
             complexity_alphabet BOOLEAN DEFAULT false,
             complexity_uppercase BOOLEAN DEFAULT false,
             complexity_symbol BOOLEAN DEFAULT false,
             updated_at TIMESTAMP
         );"
    )
}
