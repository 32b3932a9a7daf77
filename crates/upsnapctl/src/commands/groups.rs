//! Device group command handlers.

use serde::Serialize;

use upsnap_api::{DeviceGroupAdapter, DeviceGroupFields, Record, Session, Transport};

use crate::cli::{GlobalOpts, GroupsArgs, GroupsCommand};
use crate::error::CliError;
use crate::output::{self, DetailRow};

#[derive(Serialize)]
struct GroupView<'a> {
    id: &'a str,
    #[serde(flatten)]
    fields: &'a DeviceGroupFields,
}

fn detail(v: &GroupView<'_>) -> Vec<DetailRow> {
    vec![
        DetailRow::new("ID", v.id),
        DetailRow::new("Name", v.fields.name.as_str()),
    ]
}

fn show(global: &GlobalOpts, id: &str, fields: &DeviceGroupFields) {
    let view = GroupView { id, fields };
    let out = output::render_single(&global.output, &view, detail, |v| v.id.to_owned());
    output::print_output(&out, global.quiet);
}

pub async fn handle(
    transport: &Transport,
    session: &Session,
    args: GroupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let adapter = DeviceGroupAdapter::new(transport.clone());

    match args.command {
        GroupsCommand::Create { name } => {
            let mut record = Record::new();
            let id = record
                .create(&adapter, session, DeviceGroupFields::new(name))
                .await?
                .to_owned();
            if let Some(fields) = record.fields() {
                show(global, &id, fields);
            }
            Ok(())
        }

        GroupsCommand::Get { id } => {
            let mut record = Record::adopt(id.as_str());
            let found = record.refresh(&adapter, session).await?;
            match record.fields() {
                Some(fields) if found => {
                    show(global, &id, fields);
                    Ok(())
                }
                _ => Err(CliError::NotFound {
                    resource_type: "Device group".into(),
                    identifier: id,
                }),
            }
        }

        GroupsCommand::Update { id, name } => {
            let mut record = Record::adopt(id.as_str());
            let stored = record
                .update(&adapter, session, &DeviceGroupFields::new(name))
                .await?;
            show(global, &id, stored);
            Ok(())
        }

        GroupsCommand::Delete { id } => {
            let mut record: Record<DeviceGroupFields> = Record::adopt(id.as_str());
            record.delete(&adapter, session).await?;
            output::print_output(&format!("Deleted device group {id}"), global.quiet);
            Ok(())
        }
    }
}
