use osmolink_frame::HexDump;
use osmolink_proto::{identify, Model};
use serde::Serialize;

use crate::cmd::{parse_hex, IdentifyArgs};
use crate::exit::{CliResult, FAILURE, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct IdentifyOutput {
    recognized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    manufacturer_code: Option<String>,
}

pub fn run(args: IdentifyArgs, format: OutputFormat) -> CliResult<i32> {
    let data = parse_hex(&args.data)?;
    let model = identify(&data);

    let out = IdentifyOutput {
        recognized: model.is_some(),
        model,
        name: model.map(Model::name),
        manufacturer_code: model.map(|m| HexDump(&m.manufacturer_code()).to_string()),
    };
    print_identify(&out, model, format);

    Ok(if model.is_some() { SUCCESS } else { FAILURE })
}

fn print_identify(out: &IdentifyOutput, model: Option<Model>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => match (out.name, &out.manufacturer_code) {
            (Some(name), Some(code)) => println!("{name} (model code {code})"),
            _ => println!("unrecognized"),
        },
        OutputFormat::Raw => {
            if let Some(model) = model {
                println!("{}", model.short_name());
            }
        }
    }
}
