//! Rendering of command results as JSON, raw JSON, or aligned tables.
//!
//! Tables unwrap the `code/message/data` envelope: the data is tabulated and a
//! non-OK status is shown above it.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    match value {
        Value::Object(map) if is_envelope(&map) => Ok(render_envelope(map)),
        Value::Array(items) => Ok(render_array_table(&items)),
        Value::Object(map) => Ok(render_object_table(map)),
        scalar => Ok(table::render_entity_table(
            &["value"],
            &[vec![value_to_cell(&scalar)]],
            options(),
        )),
    }
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    map.contains_key("code") && map.contains_key("message") && map.contains_key("data")
}

fn render_envelope(mut map: Map<String, Value>) -> String {
    let code = map.get("code").and_then(Value::as_i64).unwrap_or_default();
    let data = map.remove("data").unwrap_or(Value::Null);
    let mut out = String::new();
    if code != 0 {
        let message = map.get("message").map_or_else(String::new, value_to_cell);
        let _ = write!(out, "code {code}: {message}");
    }
    let body = match data {
        Value::Null => String::new(),
        Value::Array(items) => render_allocation_or_array(&items),
        Value::Object(obj) => render_object_table(obj),
        Value::String(text) => text,
        scalar => value_to_cell(&scalar),
    };
    if !body.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&body);
    }
    if let Some(request_id) = map.get("request_id").and_then(Value::as_str) {
        let _ = write!(out, "\nrequest_id: {request_id}");
    }
    out
}

/// Allocation results (`[{item, data: [host..]}]`) flatten into one row per host.
fn render_allocation_or_array(items: &[Value]) -> String {
    let is_allocation = !items.is_empty()
        && items
            .iter()
            .all(|item| item.get("item").is_some() && item.get("data").is_some_and(Value::is_array));
    if !is_allocation {
        return render_array_table(items);
    }

    let headers = ["group", "bk_host_id", "ip", "city", "sub_zone_id", "rack_id", "status"];
    let mut rows = Vec::new();
    for item in items {
        let group = item.get("item").map_or_else(String::new, value_to_cell);
        for host in item.get("data").and_then(Value::as_array).into_iter().flatten() {
            let mut row = vec![group.clone()];
            row.extend(
                headers[1..]
                    .iter()
                    .map(|key| host.get(*key).map_or_else(|| String::from("-"), value_to_cell)),
            );
            rows.push(row);
        }
    }
    table::render_entity_table(&headers, &rows, options())
}

fn render_object_table(map: Map<String, Value>) -> String {
    let mut entries = map.into_iter().collect::<Vec<_>>();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    let rows = entries
        .into_iter()
        .map(|(key, value)| vec![key, value_to_cell(&value)])
        .collect::<Vec<_>>();
    table::render_entity_table(&["key", "value"], &rows, options())
}

fn render_array_table(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_entity_table(&["value"], &rows, options());
    }

    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    if headers.is_empty() {
        return String::from("(no columns)");
    }

    headers.sort();

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| {
                    map.get(header)
                        .map_or_else(|| String::from("-"), value_to_cell)
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_entity_table(&header_refs, &rows, options())
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use rms_core::model::{GroupAllocation, HostRecord};
    use rms_core::responses::{Response, SortedDetail, codes};
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        id: &'static str,
        value: u32,
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = Example { id: "x", value: 7 };
        let out = render(&value, OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "x");
        assert_eq!(parsed["value"], 7);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let value = Response::ok(Example { id: "x", value: 7 });
        let out = render(&value, OutputFormat::Raw).expect("raw render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["data"]["id"], "x");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_render_for_object_is_tabular() {
        let value = Example { id: "x", value: 7 };
        let out = render(&value, OutputFormat::Table).expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.contains("key")));
        assert!(out.contains("id"));
        assert!(out.contains("value"));
    }

    #[test]
    fn table_render_flattens_allocations() {
        let host = |id: i64| HostRecord {
            bk_host_id: id,
            ip: format!("10.0.0.{id}"),
            ..HostRecord::default()
        };
        let groups = vec![GroupAllocation {
            item: "backend".into(),
            data: vec![host(1), host(2)],
        }];
        let out = render(&Response::ok(groups).with_request_id("req-1"), OutputFormat::Table)
            .expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("group"));
        assert!(lines[2].contains("10.0.0.1"));
        assert!(lines[3].contains("10.0.0.2"));
        assert_eq!(lines.last().copied(), Some("request_id: req-1"));
    }

    #[test]
    fn table_render_shows_error_status() {
        let value: Response<Vec<SortedDetail>> =
            Response::error(codes::INSUFFICIENT_RESOURCE, "no hosts");
        let out = render(&value, OutputFormat::Table).expect("table render should work");
        assert_eq!(out, "code 2: no hosts");
    }

    #[test]
    fn table_render_sorts_columns() {
        let rows = vec![SortedDetail {
            group_mark: "g".into(),
            priority: 2,
            affinity: "NONE".into(),
            count: 1,
        }];
        let out = render(&Response::ok(rows), OutputFormat::Table).expect("table render");
        let header = out.lines().next().unwrap_or_default();
        let group_at = header.find("group_mark").expect("group column");
        let priority_at = header.find("priority").expect("priority column");
        assert!(group_at < priority_at);
    }
}
