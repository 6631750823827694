// keep in sync with CREATE_TABLES in db.rs

diesel::table! {
    gas_readings (id) {
        id -> Integer,
        sensor_id -> Text,
        timestamp -> BigInt,
        co -> Nullable<Double>,
        co2 -> Nullable<Double>,
        so2 -> Nullable<Double>,
        ch4 -> Nullable<Double>,
        butane -> Nullable<Double>,
        lpg -> Nullable<Double>,
        smoke -> Nullable<Double>,
    }
}

diesel::table! {
    notifications (id) {
        id -> Integer,
        sensor_id -> Text,
        alert_type -> Text,
        gas -> Text,
        alert_value -> Double,
        message -> Text,
        timestamp -> BigInt,
    }
}

diesel::table! {
    sensor_metadata (sensor_id) {
        sensor_id -> Text,
        last_seen -> BigInt,
        ip_address -> Nullable<Text>,
        firmware_version -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(gas_readings, notifications, sensor_metadata,);
