use crate::schema::*;
use anyhow::{Context, Result};
use common::{
    req::{DatabaseStats, Notification, SensorInfo},
    GasLevel, GasReading,
};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::{debug, info};

// keep in sync with schema.rs
const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS gas_readings (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    sensor_id TEXT NOT NULL,
    timestamp BIGINT NOT NULL,
    co DOUBLE,
    co2 DOUBLE,
    so2 DOUBLE,
    ch4 DOUBLE,
    butane DOUBLE,
    lpg DOUBLE,
    smoke DOUBLE
);
CREATE INDEX IF NOT EXISTS gas_readings_by_timestamp ON gas_readings (timestamp);
CREATE TABLE IF NOT EXISTS notifications (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    sensor_id TEXT NOT NULL,
    alert_type TEXT NOT NULL,
    gas TEXT NOT NULL,
    alert_value DOUBLE NOT NULL,
    message TEXT NOT NULL,
    timestamp BIGINT NOT NULL
);
CREATE TABLE IF NOT EXISTS sensor_metadata (
    sensor_id TEXT PRIMARY KEY NOT NULL,
    last_seen BIGINT NOT NULL,
    ip_address TEXT,
    firmware_version TEXT NOT NULL
);
";

pub const UNKNOWN: &str = "unknown";
pub const GAS_ALERT: &str = "gas_alert";

#[derive(Debug, Default, Insertable)]
#[diesel(table_name=gas_readings)]
pub struct NewGasReading {
    pub sensor_id: String,
    pub timestamp: i64,      // ms since epoch
    pub co: Option<f64>,     // ppm
    pub co2: Option<f64>,    // ppm
    pub so2: Option<f64>,    // ppm
    pub ch4: Option<f64>,    // ppm
    pub butane: Option<f64>, // ppm
    pub lpg: Option<f64>,    // ppm
    pub smoke: Option<f64>,  // ppm
}

impl NewGasReading {
    pub fn new(sensor_id: &str, timestamp: i64, reading: &GasReading) -> Self {
        Self {
            sensor_id: sensor_id.to_owned(),
            timestamp,
            co: reading.co,
            co2: reading.co2,
            so2: reading.so2,
            ch4: reading.ch4,
            butane: reading.butane,
            lpg: reading.lpg,
            smoke: reading.smoke,
        }
    }
}

#[derive(Debug, Queryable)]
#[allow(unused)]
pub struct GasReadingRow {
    pub id: i32,
    pub sensor_id: String,
    pub timestamp: i64,
    pub co: Option<f64>,
    pub co2: Option<f64>,
    pub so2: Option<f64>,
    pub ch4: Option<f64>,
    pub butane: Option<f64>,
    pub lpg: Option<f64>,
    pub smoke: Option<f64>,
}

impl From<GasReadingRow> for GasReading {
    fn from(row: GasReadingRow) -> Self {
        GasReading {
            timestamp: Some(row.timestamp),
            co: row.co,
            co2: row.co2,
            so2: row.so2,
            ch4: row.ch4,
            butane: row.butane,
            lpg: row.lpg,
            smoke: row.smoke,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name=notifications)]
pub struct NewNotification {
    pub sensor_id: String,
    pub alert_type: String,
    pub gas: String,
    pub alert_value: f64,
    pub message: String,
    pub timestamp: i64,
}

impl NewNotification {
    pub fn gas_alert(sensor_id: &str, level: &GasLevel, message: &str, timestamp: i64) -> Self {
        Self {
            sensor_id: sensor_id.to_owned(),
            alert_type: GAS_ALERT.to_owned(),
            gas: level.gas.key().to_owned(),
            alert_value: level.value,
            message: message.to_owned(),
            timestamp,
        }
    }
}

#[derive(Debug, Queryable)]
pub struct NotificationRow {
    pub id: i32,
    pub sensor_id: String,
    pub alert_type: String,
    pub gas: String,
    pub alert_value: f64,
    pub message: String,
    pub timestamp: i64,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = anyhow::Error;

    fn try_from(row: NotificationRow) -> Result<Self> {
        Ok(Notification {
            id: row.id,
            sensor_id: row.sensor_id,
            alert_type: row.alert_type,
            gas: row.gas.parse()?,
            alert_value: row.alert_value,
            message: row.message,
            timestamp: row.timestamp,
        })
    }
}

#[derive(Debug, Clone, Insertable, Queryable)]
#[diesel(table_name=sensor_metadata)]
pub struct SensorRow {
    pub sensor_id: String,
    pub last_seen: i64, // ms since epoch
    pub ip_address: Option<String>,
    pub firmware_version: String,
}

impl From<SensorRow> for SensorInfo {
    fn from(row: SensorRow) -> Self {
        SensorInfo {
            sensor_id: row.sensor_id,
            last_seen: row.last_seen,
            ip_address: row.ip_address,
            firmware_version: row.firmware_version,
        }
    }
}

pub struct Db {
    conn: SqliteConnection,
}

impl Db {
    pub fn connect(database_url: &str) -> Result<Self> {
        let mut conn = SqliteConnection::establish(database_url)
            .with_context(|| format!("cannot open database {database_url}"))?;
        conn.batch_execute(CREATE_TABLES)
            .context("cannot create tables")?;
        info!("Connected to {database_url}");

        Ok(Self { conn })
    }

    /// Stores one device upload: the reading, its notifications and the
    /// sensor's last-seen record, all or nothing.
    pub fn record_ingest(
        &mut self,
        reading: &NewGasReading,
        alerts: &[NewNotification],
        sensor: Option<&SensorRow>,
    ) -> Result<()> {
        self.conn.transaction::<_, anyhow::Error, _>(|conn| {
            diesel::insert_into(gas_readings::table)
                .values(reading)
                .execute(conn)?;

            if !alerts.is_empty() {
                diesel::insert_into(notifications::table)
                    .values(alerts)
                    .execute(conn)?;
            }

            // firmware version is only recorded the first time a sensor shows up
            if let Some(sensor) = sensor {
                diesel::insert_into(sensor_metadata::table)
                    .values(sensor)
                    .on_conflict(sensor_metadata::sensor_id)
                    .do_update()
                    .set((
                        sensor_metadata::last_seen.eq(sensor.last_seen),
                        sensor_metadata::ip_address.eq(sensor.ip_address.clone()),
                    ))
                    .execute(conn)?;
            }

            Ok(())
        })?;
        debug!(
            "Stored reading of {} with {} alerts",
            reading.sensor_id,
            alerts.len()
        );

        Ok(())
    }

    /// Newest first.
    pub fn latest_readings(&mut self, limit: i64) -> Result<Vec<GasReading>> {
        let rows = gas_readings::table
            .order((gas_readings::timestamp.desc(), gas_readings::id.desc()))
            .limit(limit)
            .load::<GasReadingRow>(&mut self.conn)?;

        Ok(rows.into_iter().map(GasReading::from).collect())
    }

    /// Readings with `from <= timestamp < to`, oldest first.
    pub fn readings_between(&mut self, from: i64, to: i64) -> Result<Vec<GasReading>> {
        let rows = gas_readings::table
            .filter(gas_readings::timestamp.ge(from))
            .filter(gas_readings::timestamp.lt(to))
            .order((gas_readings::timestamp.asc(), gas_readings::id.asc()))
            .load::<GasReadingRow>(&mut self.conn)?;

        Ok(rows.into_iter().map(GasReading::from).collect())
    }

    /// Newest first.
    pub fn notifications_since(&mut self, since: i64) -> Result<Vec<Notification>> {
        let rows = notifications::table
            .filter(notifications::timestamp.gt(since))
            .order((notifications::timestamp.desc(), notifications::id.desc()))
            .load::<NotificationRow>(&mut self.conn)?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    pub fn sensors(&mut self) -> Result<Vec<SensorInfo>> {
        let rows = sensor_metadata::table
            .order(sensor_metadata::sensor_id.asc())
            .load::<SensorRow>(&mut self.conn)?;

        Ok(rows.into_iter().map(SensorInfo::from).collect())
    }

    pub fn stats(&mut self) -> Result<DatabaseStats> {
        Ok(DatabaseStats {
            gas_readings: gas_readings::table
                .count()
                .get_result(&mut self.conn)?,
            notifications: notifications::table
                .count()
                .get_result(&mut self.conn)?,
            sensor_metadata: sensor_metadata::table
                .count()
                .get_result(&mut self.conn)?,
        })
    }
}
