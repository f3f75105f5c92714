//! Line-oriented presentation layer.
//!
//! # Responsibility
//! - Parse one action per input line and dispatch it to the core.
//! - Print the resulting collection snapshot, or the typed failure, as
//!   JSON.
//!
//! All state lives in the session store owned by `main`; closing the
//! program ends the session and discards it unless the user exported a
//! snapshot first.

use log::info;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use studyhub_core::{
    dispatch, Action, FieldValue, Record, RecordAddress, SessionStore,
};
use uuid::Uuid;

fn main() {
    init_logging();
    println!("studyhub {} (type `help` for commands)", studyhub_core::core_version());

    let mut store = SessionStore::new();
    let stdin = io::stdin();
    let mut out = io::stdout();

    loop {
        print!("studyhub> ");
        let _ = out.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                eprintln!("error: {err}");
                break;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        match run_command(&mut store, line) {
            Ok(Some(output)) => println!("{output}"),
            Ok(None) => {}
            Err(message) => println!("error: {message}"),
        }
    }

    info!("event=session_end module=cli status=ok");
}

fn init_logging() {
    let log_dir = std::env::var("STUDYHUB_LOG_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("studyhub-logs"));
    if let Err(message) = studyhub_core::init_logging(
        studyhub_core::default_log_level(),
        &log_dir.to_string_lossy(),
    ) {
        eprintln!("logging disabled: {message}");
    }
}

fn run_command(store: &mut SessionStore, line: &str) -> Result<Option<String>, String> {
    let mut parts = line.splitn(2, ' ');
    let command = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or("").trim();

    match command {
        "help" => Ok(Some(usage().to_string())),
        "collections" => Ok(Some(store.collection_names().join("\n"))),
        "list" => {
            let collection = required(rest, "list <collection>")?;
            apply(store, Action::Get {
                collection: collection.to_string(),
            })
        }
        "append" => {
            let (collection, payload) = split_arg(rest, "append <collection> <fields-json>")?;
            let fields: BTreeMap<String, FieldValue> = serde_json::from_str(payload)
                .map_err(|err| format!("invalid fields payload: {err}"))?;
            let mut record = Record::new();
            record.fields = fields;
            apply(store, Action::Append {
                collection: collection.to_string(),
                record,
            })
        }
        "update" => {
            let (collection, rest) = split_arg(rest, "update <collection> <id|#pos> <field> <value-json>")?;
            let (address, rest) = split_arg(rest, "update <collection> <id|#pos> <field> <value-json>")?;
            let (field, payload) = split_arg(rest, "update <collection> <id|#pos> <field> <value-json>")?;
            let value: FieldValue = serde_json::from_str(payload)
                .map_err(|err| format!("invalid value payload: {err}"))?;
            apply(store, Action::UpdateAt {
                collection: collection.to_string(),
                address: parse_address(address)?,
                field: field.to_string(),
                value,
            })
        }
        "remove" => {
            let (collection, address) = split_arg(rest, "remove <collection> <id|#pos>")?;
            apply(store, Action::RemoveAt {
                collection: collection.to_string(),
                address: parse_address(address)?,
            })
        }
        "clear" => {
            let collection = required(rest, "clear <collection>")?;
            apply(store, Action::Clear {
                collection: collection.to_string(),
            })
        }
        "export" => {
            let path = required(rest, "export <path>")?;
            let payload = store.export_snapshot().map_err(|err| err.to_string())?;
            std::fs::write(path, payload).map_err(|err| err.to_string())?;
            Ok(Some(format!("session exported to {path}")))
        }
        "import" => {
            let path = required(rest, "import <path>")?;
            let payload = std::fs::read_to_string(path).map_err(|err| err.to_string())?;
            *store = SessionStore::import_snapshot(&payload).map_err(|err| err.to_string())?;
            Ok(Some(format!("session imported from {path}")))
        }
        other => Err(format!("unknown command `{other}`; type `help`")),
    }
}

fn apply(store: &mut SessionStore, action: Action) -> Result<Option<String>, String> {
    let snapshot = dispatch(store, action).map_err(|err| err.to_string())?;
    serde_json::to_string_pretty(&snapshot)
        .map(Some)
        .map_err(|err| err.to_string())
}

fn parse_address(value: &str) -> Result<RecordAddress, String> {
    if let Some(position) = value.strip_prefix('#') {
        let index: usize = position
            .parse()
            .map_err(|_| format!("invalid position `{value}`"))?;
        return Ok(RecordAddress::Position(index));
    }
    Uuid::parse_str(value)
        .map(RecordAddress::Id)
        .map_err(|_| format!("invalid record id `{value}`"))
}

fn required<'a>(value: &'a str, usage: &str) -> Result<&'a str, String> {
    if value.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(value)
    }
}

fn split_arg<'a>(value: &'a str, usage: &str) -> Result<(&'a str, &'a str), String> {
    let mut parts = value.splitn(2, ' ');
    let first = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or("").trim();
    if first.is_empty() || rest.is_empty() {
        return Err(format!("usage: {usage}"));
    }
    Ok((first, rest))
}

fn usage() -> &'static str {
    "commands:
  collections                                    list referenced collections
  list <collection>                              print a collection snapshot
  append <collection> <fields-json>              add a record
  update <collection> <id|#pos> <field> <json>   overwrite one field
  remove <collection> <id|#pos>                  delete a record
  clear <collection>                             empty a collection
  export <path> / import <path>                  session-boundary snapshot
  quit                                           end the session

field values are tagged JSON, e.g. {\"kind\":\"text\",\"value\":\"read ch. 4\"}"
}
