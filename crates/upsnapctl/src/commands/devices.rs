//! Device command handlers.

use serde::Serialize;

use upsnap_api::{DeviceAdapter, DeviceFields, Record, Session, Transport};

use crate::cli::{DeviceSpec, DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, DetailRow};

// ── View ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct DeviceView<'a> {
    id: &'a str,
    #[serde(flatten)]
    fields: &'a DeviceFields,
}

fn detail(v: &DeviceView<'_>) -> Vec<DetailRow> {
    let f = v.fields;
    vec![
        DetailRow::new("ID", v.id),
        DetailRow::new("Name", f.name.as_str()),
        DetailRow::new("IP", f.ip.as_str()),
        DetailRow::new("MAC", f.mac.as_str()),
        DetailRow::new("Netmask", f.netmask.as_str()),
        DetailRow::new("Description", f.description.as_deref().unwrap_or("-")),
        DetailRow::new("Link", f.link.as_deref().unwrap_or("-")),
        DetailRow::new(
            "Groups",
            if f.groups.is_empty() {
                "-".to_owned()
            } else {
                f.groups.join(", ")
            },
        ),
    ]
}

fn show(global: &GlobalOpts, id: &str, fields: &DeviceFields) {
    let view = DeviceView { id, fields };
    let out = output::render_single(&global.output, &view, detail, |v| v.id.to_owned());
    output::print_output(&out, global.quiet);
}

fn desired(spec: DeviceSpec) -> DeviceFields {
    DeviceFields {
        name: spec.name,
        ip: spec.ip,
        mac: spec.mac,
        netmask: spec.netmask,
        description: spec.description,
        link: spec.link,
        groups: spec.groups,
    }
    .normalized()
}

fn not_found(id: &str) -> CliError {
    CliError::NotFound {
        resource_type: "Device".into(),
        identifier: id.into(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    transport: &Transport,
    session: &Session,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let adapter = DeviceAdapter::new(transport.clone());

    match args.command {
        DevicesCommand::Create(spec) => {
            let mut record = Record::new();
            let id = record
                .create(&adapter, session, desired(spec))
                .await?
                .to_owned();
            if let Some(fields) = record.fields() {
                show(global, &id, fields);
            }
            Ok(())
        }

        DevicesCommand::Get { id } => {
            let mut record = Record::adopt(id.as_str());
            let found = record.refresh(&adapter, session).await?;
            match record.fields() {
                Some(fields) if found => {
                    show(global, &id, fields);
                    Ok(())
                }
                _ => Err(not_found(&id)),
            }
        }

        DevicesCommand::Update { id, spec } => {
            let mut record = Record::adopt(id.as_str());
            let stored = record.update(&adapter, session, &desired(spec)).await?;
            show(global, &id, stored);
            Ok(())
        }

        DevicesCommand::Delete { id } => {
            let mut record: Record<DeviceFields> = Record::adopt(id.as_str());
            record.delete(&adapter, session).await?;
            output::print_output(&format!("Deleted device {id}"), global.quiet);
            Ok(())
        }
    }
}
