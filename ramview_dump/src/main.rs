use std::process;

use clap::{App, Arg};
use kefex_import::{
    import_ramview_project, Datapool, DatapoolKind, ElementValue, RamViewImport,
};
use log::LevelFilter;

type Error = Box<dyn std::error::Error>;
type Result<T> = std::result::Result<T, Error>;

pub fn main() {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let matches = App::new("ramview_dump")
        .about("Imports a legacy RAMView project and dumps the resulting datapool")
        .arg(
            Arg::with_name("def")
                .long("def")
                .value_name("FILE")
                .help("path to the project .def file")
                .required(true),
        )
        .arg(
            Arg::with_name("kind")
                .long("kind")
                .value_name("KIND")
                .help("destination datapool kind: ram (diagnostic) or eeprom (non-volatile)")
                .default_value("ram"),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("print the datapool and report as JSON"),
        )
        .get_matches();

    let def_path = matches.value_of("def").unwrap_or_default();
    let kind = match matches.value_of("kind").unwrap_or("ram") {
        "ram" => DatapoolKind::Diagnostic,
        "eeprom" => DatapoolKind::NonVolatile,
        other => {
            eprintln!("unknown kind \"{}\" (expected ram or eeprom)", other);
            process::exit(2);
        }
    };

    let result = run(def_path, kind, matches.is_present("json"));
    if let Err(error) = result {
        eprintln!("error: {}", error);
        process::exit(1);
    }
}

fn run(def_path: &str, kind: DatapoolKind, json: bool) -> Result<()> {
    let imported = import_ramview_project(def_path.as_ref(), kind)?;
    if json {
        print_json(&imported)?;
    } else {
        print_text(&imported.datapool);
        if !imported.report.is_empty() {
            println!();
            println!("Import notes:");
            for line in imported.report.lines() {
                println!("  - {}", line);
            }
        }
    }
    Ok(())
}

fn print_json(imported: &RamViewImport) -> Result<()> {
    let output = serde_json::json!({
        "datapool": &imported.datapool,
        "report": &imported.report,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text(datapool: &Datapool) {
    println!(
        "Datapool {} v{}.{}.{} ({:?})",
        datapool.name, datapool.version[0], datapool.version[1], datapool.version[2], datapool.kind
    );
    if !datapool.comment.is_empty() {
        println!("  {}", datapool.comment);
    }
    for list in &datapool.lists {
        println!(
            "List {} ({} elements, data sets: {})",
            list.name,
            list.elements.len(),
            list.data_set_names.join(", ")
        );
        for element in &list.elements {
            let type_text = if element.is_array {
                format!("{:?}[{}]", element.element_type, element.array_size)
            } else {
                format!("{:?}", element.element_type)
            };
            println!(
                "  {}: {} min={} max={} factor={} {}",
                element.name,
                type_text,
                format_values(&element.min),
                format_values(&element.max),
                element.factor,
                element.unit
            );
            for (set, values) in element.data_set_values.iter().enumerate() {
                let set_name = list
                    .data_set_names
                    .get(set)
                    .map(String::as_str)
                    .unwrap_or("?");
                println!("    {} = {}", set_name, format_values(values));
            }
        }
    }
}

fn format_values(values: &[ElementValue]) -> String {
    let parts: Vec<String> = values
        .iter()
        .map(|value| match value {
            ElementValue::Int(n) => n.to_string(),
            ElementValue::Float(r) => r.to_string(),
        })
        .collect();
    parts.join(";")
}
