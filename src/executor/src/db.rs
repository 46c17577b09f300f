use gateway_common::AppError;
use mysql_async::prelude::Queryable;
use mysql_async::{Pool, Row, TxOpts, Value as SqlValue};
use serde_json::{json, Map, Value as JsonValue};

fn driver_err(e: mysql_async::Error) -> AppError {
    AppError::Driver(e.to_string())
}

/// `mysql_async::Value` carries the server's text/binary protocol
/// encoding; this maps each variant to the closest JSON representation so
/// `{result: [{col: val, ...}, ...]}` round-trips cleanly through
/// `serde_json`.
fn sql_value_to_json(value: &SqlValue) -> JsonValue {
    match value {
        SqlValue::NULL => JsonValue::Null,
        SqlValue::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => JsonValue::String(s.to_string()),
            Err(_) => JsonValue::String(hex::encode(bytes)),
        },
        SqlValue::Int(i) => json!(i),
        SqlValue::UInt(u) => json!(u),
        SqlValue::Float(f) => json!(f),
        SqlValue::Double(d) => json!(d),
        SqlValue::Date(year, month, day, hour, minute, second, micros) => {
            JsonValue::String(format!(
                "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{micros:06}"
            ))
        }
        SqlValue::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if *negative { "-" } else { "" };
            JsonValue::String(format!(
                "{sign}{days}d {hours:02}:{minutes:02}:{seconds:02}.{micros:06}"
            ))
        }
    }
}

fn row_to_json(row: Row) -> JsonValue {
    let mut map = Map::new();
    for (idx, column) in row.columns_ref().iter().enumerate() {
        let value = row.as_ref(idx).cloned().unwrap_or(SqlValue::NULL);
        map.insert(column.name_str().into_owned(), sql_value_to_json(&value));
    }
    JsonValue::Object(map)
}

/// Reads fetch all rows without committing; writes run inside an explicit
/// transaction and commit before returning, giving each kind the right
/// transactional semantics (spec §4.4).
pub async fn execute(pool: &Pool, kind: &str, query: &str) -> Result<JsonValue, AppError> {
    let mut conn = pool.get_conn().await.map_err(driver_err)?;
    if kind == "select" {
        let rows: Vec<Row> = conn.query(query).await.map_err(driver_err)?;
        let result: Vec<JsonValue> = rows.into_iter().map(row_to_json).collect();
        Ok(json!({ "result": result }))
    } else {
        let mut tx = conn.start_transaction(TxOpts::default()).await.map_err(driver_err)?;
        tx.query_drop(query).await.map_err(driver_err)?;
        tx.commit().await.map_err(driver_err)?;
        Ok(json!({ "message": "Query executed successfully" }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_and_nulls_round_trip() {
        assert_eq!(sql_value_to_json(&SqlValue::Int(-7)), json!(-7));
        assert_eq!(sql_value_to_json(&SqlValue::UInt(7)), json!(7));
        assert_eq!(sql_value_to_json(&SqlValue::NULL), JsonValue::Null);
    }

    #[test]
    fn utf8_bytes_become_strings() {
        let value = SqlValue::Bytes(b"User1".to_vec());
        assert_eq!(sql_value_to_json(&value), json!("User1"));
    }

    #[test]
    fn non_utf8_bytes_fall_back_to_hex() {
        let value = SqlValue::Bytes(vec![0xff, 0x00, 0x10]);
        assert_eq!(sql_value_to_json(&value), json!("ff0010"));
    }
}
